//! Environment-driven configuration.
//!
//! Every value has a default; `FXPULSE_*` variables override them. A `.env`
//! file is honoured when the binaries call `dotenvy::dotenv()` first.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::core::runtime::RuntimeConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("inconsistent configuration: {0}")]
    Inconsistent(String),
}

pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Lookback periods for the indicator calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub ema_period: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    pub volume_recent: usize,
    pub volume_average_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_fast: 8,
            sma_slow: 18,
            ema_period: 20,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            volume_recent: 3,
            volume_average_period: 20,
        }
    }
}

impl IndicatorConfig {
    /// Shortest series for which every indicator is defined
    pub fn required_lookback(&self) -> usize {
        [
            self.sma_fast,
            self.sma_slow,
            self.ema_period,
            self.rsi_period + 1,
            self.macd_slow + self.macd_signal - 1,
            self.bollinger_period,
            self.volume_average_period,
            self.volume_recent,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// Weights of the confidence blend. Exposed rather than fixed because the
/// right tuning depends on the instrument and timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub base: f64,
    pub agreement: f64,
    pub sentiment: f64,
    pub freshness: f64,
    pub strength: f64,
    /// Multiplier applied to sentiment alignment when the score is a fallback
    pub fallback_discount: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            base: 0.40,
            agreement: 0.40,
            sentiment: 0.30,
            freshness: 0.08,
            strength: 0.04,
            fallback_discount: 0.5,
        }
    }
}

/// Discrete expiry table keyed by volatility regime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub fast_entry_seconds: (u64, u64),
    pub slow_entry_seconds: (u64, u64),
    /// Fractional move over the last three closes above which entry is fast
    pub fast_entry_velocity: f64,
    pub expiry_high_seconds: u64,
    pub expiry_medium_seconds: u64,
    pub expiry_low_seconds: u64,
    /// Bollinger bandwidth at or above which volatility is High
    pub high_bandwidth: f64,
    /// Bollinger bandwidth below which volatility is Low
    pub low_bandwidth: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fast_entry_seconds: (5, 15),
            slow_entry_seconds: (25, 40),
            fast_entry_velocity: 0.001,
            expiry_high_seconds: 60,
            expiry_medium_seconds: 120,
            expiry_low_seconds: 300,
            high_bandwidth: 0.0015,
            low_bandwidth: 0.0005,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuserConfig {
    pub required_confirmations: usize,
    pub rsi_low: f64,
    pub rsi_high: f64,
    pub rsi_extreme_low: f64,
    pub rsi_extreme_high: f64,
    pub confidence_threshold: f64,
    /// A condition younger than this many ticks counts as fresh
    pub freshness_ticks: usize,
    pub band_touch_tolerance: f64,
    /// Volume surge band as fractions above the trailing average
    pub volume_surge_low: f64,
    pub volume_surge_high: f64,
    pub weights: ConfidenceWeights,
    pub timing: TimingConfig,
}

impl Default for FuserConfig {
    fn default() -> Self {
        Self {
            required_confirmations: 2,
            rsi_low: 30.0,
            rsi_high: 70.0,
            rsi_extreme_low: 20.0,
            rsi_extreme_high: 80.0,
            confidence_threshold: 0.75,
            freshness_ticks: 2,
            band_touch_tolerance: 0.05,
            volume_surge_low: 0.3,
            volume_surge_high: 0.8,
            weights: ConfidenceWeights::default(),
            timing: TimingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub fallback_polarity: f64,
    pub keywords: Vec<String>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            fallback_polarity: 0.05,
            keywords: [
                "forex",
                "currency",
                "usd",
                "eur",
                "gbp",
                "jpy",
                "aud",
                "cad",
                "chf",
                "nzd",
                "federal reserve",
                "ecb",
                "bank of england",
                "interest rate",
                "inflation",
                "monetary policy",
                "central bank",
                "employment",
                "gdp",
                "trade",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_per_hour: usize,
    pub history_path: PathBuf,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_hour: 3,
            history_path: PathBuf::from("signal_history.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub market_data_url: String,
    pub news_api_url: String,
    pub news_api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            market_data_url: "https://query1.finance.yahoo.com".to_string(),
            news_api_url: "https://newsapi.org".to_string(),
            news_api_key: None,
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub indicators: IndicatorConfig,
    pub fuser: FuserConfig,
    pub sentiment: SentimentConfig,
    pub rate_limit: RateLimitConfig,
    pub providers: ProviderConfig,
    pub runtime: RuntimeConfig,
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}

fn override_with<T: FromStr>(target: &mut T, key: &str) -> Result<(), ConfigError> {
    if let Some(value) = parse_var(key)? {
        *target = value;
    }
    Ok(())
}

impl Config {
    /// Defaults overridden by environment variables, then validated
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        override_with(&mut config.indicators.rsi_period, "FXPULSE_RSI_PERIOD")?;
        override_with(&mut config.indicators.sma_fast, "FXPULSE_SMA_FAST")?;
        override_with(&mut config.indicators.sma_slow, "FXPULSE_SMA_SLOW")?;
        override_with(
            &mut config.indicators.bollinger_multiplier,
            "FXPULSE_BOLLINGER_MULTIPLIER",
        )?;

        override_with(
            &mut config.fuser.required_confirmations,
            "FXPULSE_REQUIRED_CONFIRMATIONS",
        )?;
        override_with(
            &mut config.fuser.confidence_threshold,
            "FXPULSE_CONFIDENCE_THRESHOLD",
        )?;
        override_with(&mut config.fuser.volume_surge_low, "FXPULSE_VOLUME_SURGE_LOW")?;
        override_with(&mut config.fuser.volume_surge_high, "FXPULSE_VOLUME_SURGE_HIGH")?;

        override_with(
            &mut config.rate_limit.max_per_hour,
            "FXPULSE_MAX_SIGNALS_PER_HOUR",
        )?;
        override_with(&mut config.rate_limit.history_path, "FXPULSE_HISTORY_PATH")?;

        override_with(
            &mut config.providers.market_data_url,
            "FXPULSE_MARKET_DATA_URL",
        )?;
        override_with(&mut config.providers.news_api_url, "FXPULSE_NEWS_API_URL")?;
        override_with(
            &mut config.providers.timeout_seconds,
            "FXPULSE_PROVIDER_TIMEOUT_SECONDS",
        )?;
        config.providers.news_api_key = env::var("NEWS_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty() && key != "demo_key");

        override_with(
            &mut config.runtime.evaluation_interval_seconds,
            "FXPULSE_EVAL_INTERVAL_SECONDS",
        )?;
        override_with(&mut config.runtime.interval, "FXPULSE_INTERVAL")?;
        override_with(&mut config.runtime.lookback, "FXPULSE_LOOKBACK")?;
        override_with(
            &mut config.runtime.metrics_port,
            "FXPULSE_WORKER_METRICS_PORT",
        )?;
        if let Ok(pairs) = env::var("FXPULSE_PAIRS") {
            config.runtime.pairs = pairs
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ind = &self.indicators;
        if [
            ind.sma_fast,
            ind.sma_slow,
            ind.ema_period,
            ind.rsi_period,
            ind.macd_fast,
            ind.macd_slow,
            ind.macd_signal,
            ind.volume_recent,
            ind.volume_average_period,
        ]
        .contains(&0)
        {
            return Err(ConfigError::Inconsistent(
                "indicator periods must be positive".into(),
            ));
        }
        if ind.bollinger_period < 2 {
            return Err(ConfigError::Inconsistent(
                "bollinger_period must be at least 2".into(),
            ));
        }
        if ind.sma_fast >= ind.sma_slow {
            return Err(ConfigError::Inconsistent(
                "sma_fast must be shorter than sma_slow".into(),
            ));
        }
        if ind.macd_fast >= ind.macd_slow {
            return Err(ConfigError::Inconsistent(
                "macd_fast must be shorter than macd_slow".into(),
            ));
        }

        let fuser = &self.fuser;
        if fuser.required_confirmations == 0 {
            return Err(ConfigError::Inconsistent(
                "required_confirmations must be at least 1".into(),
            ));
        }
        if fuser.freshness_ticks == 0 {
            return Err(ConfigError::Inconsistent(
                "freshness_ticks must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&fuser.confidence_threshold) {
            return Err(ConfigError::Inconsistent(
                "confidence_threshold must be within [0, 1]".into(),
            ));
        }
        if !(fuser.rsi_extreme_low <= fuser.rsi_low
            && fuser.rsi_low < fuser.rsi_high
            && fuser.rsi_high <= fuser.rsi_extreme_high)
        {
            return Err(ConfigError::Inconsistent(
                "RSI thresholds must satisfy extreme_low <= low < high <= extreme_high".into(),
            ));
        }
        if fuser.volume_surge_low < 0.0 || fuser.volume_surge_low > fuser.volume_surge_high {
            return Err(ConfigError::Inconsistent(
                "volume surge band must satisfy 0 <= low <= high".into(),
            ));
        }
        let timing = &fuser.timing;
        if timing.fast_entry_seconds.0 > timing.fast_entry_seconds.1
            || timing.slow_entry_seconds.0 > timing.slow_entry_seconds.1
        {
            return Err(ConfigError::Inconsistent(
                "entry delay ranges must be ordered".into(),
            ));
        }

        if self.rate_limit.max_per_hour == 0 {
            return Err(ConfigError::Inconsistent(
                "max_per_hour must be at least 1".into(),
            ));
        }
        if self.runtime.lookback < ind.required_lookback() {
            return Err(ConfigError::Inconsistent(format!(
                "lookback {} is shorter than the {} points the indicators need",
                self.runtime.lookback,
                ind.required_lookback()
            )));
        }

        Ok(())
    }
}
