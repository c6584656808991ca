//! One evaluation cycle: fetch, calculate, score, fuse, submit.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::{Config, IndicatorConfig};
use crate::history::{HistoryError, RateLimiter, SignalLedger, Submission};
use crate::indicators::{calculate_window, IndicatorError};
use crate::metrics::Metrics;
use crate::models::sentiment::{NewsImpact, SentimentScore};
use crate::models::signal::{AcceptedSignal, CandidateSignal};
use crate::sentiment::SentimentScorer;
use crate::services::{
    MarketDataProvider, MarketDataRequest, NewsProvider, ProviderError, RetryPolicy,
};
use crate::session::{is_market_open, market_session};
use crate::signals::fuser::{FuseOutcome, NoSignalReason, SignalFuser};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("history error: {0}")]
    History(#[from] HistoryError),
}

/// A pair that produced no fusion result this cycle
#[derive(Debug)]
pub struct PairSkip {
    pub pair: String,
    pub error: EngineError,
}

/// Everything that happened before the rate limiter
#[derive(Debug, Default)]
pub struct Evaluation {
    pub sentiment: Option<SentimentScore>,
    /// Headline pressure on each evaluated pair
    pub news_impact: Vec<(String, NewsImpact)>,
    pub candidates: Vec<CandidateSignal>,
    pub no_signal: Vec<(String, NoSignalReason)>,
    pub skipped: Vec<PairSkip>,
}

impl Evaluation {
    /// Highest-confidence candidate; ties go to the earlier pair
    pub fn best(&self) -> Option<&CandidateSignal> {
        self.candidates.iter().fold(None, |best, c| match best {
            Some(b) if b.confidence >= c.confidence => Some(b),
            _ => Some(c),
        })
    }
}

#[derive(Debug)]
pub enum CycleOutcome {
    MarketClosed,
    NoSignal(Evaluation),
    RateLimited(Evaluation, CandidateSignal),
    Accepted(Evaluation, AcceptedSignal),
}

/// "1m" -> "M1", "1h" -> "H1"; unknown spellings pass through upper-cased
pub fn timeframe_label(interval: &str) -> String {
    let (digits, unit): (String, String) = interval.chars().partition(|c| c.is_ascii_digit());
    match (unit.as_str(), digits.parse::<u32>()) {
        ("m", Ok(60)) => "H1".to_string(),
        ("m", Ok(n)) => format!("M{}", n),
        ("h", Ok(n)) => format!("H{}", n),
        ("d", Ok(n)) => format!("D{}", n),
        ("wk", Ok(n)) => format!("W{}", n),
        _ => interval.to_uppercase(),
    }
}

pub struct SignalEngine {
    market_data: Arc<dyn MarketDataProvider>,
    news: Arc<dyn NewsProvider>,
    indicators: IndicatorConfig,
    fuser: SignalFuser,
    scorer: SentimentScorer,
    limiter: RateLimiter,
    interval: String,
    lookback: usize,
    provider_timeout: Duration,
    respect_market_hours: bool,
    metrics: Option<Arc<Metrics>>,
}

impl SignalEngine {
    pub fn new(
        config: &Config,
        market_data: Arc<dyn MarketDataProvider>,
        news: Arc<dyn NewsProvider>,
    ) -> Self {
        Self {
            market_data,
            news,
            indicators: config.indicators.clone(),
            fuser: SignalFuser::new(config.fuser.clone()),
            scorer: SentimentScorer::new(&config.sentiment),
            limiter: RateLimiter::from_config(&config.rate_limit),
            interval: config.runtime.interval.clone(),
            // The window needs one extra bar per historical tick
            lookback: config.runtime.lookback.max(
                config.indicators.required_lookback() + config.fuser.freshness_ticks,
            ),
            // Room for every retry of a request bounded by the client timeout
            provider_timeout: RetryPolicy::default()
                .deadline(Duration::from_secs(config.providers.timeout_seconds.max(1))),
            respect_market_hours: true,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_scorer(mut self, scorer: SentimentScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Evaluate on weekends too; used for replaying recorded data
    pub fn ignore_market_hours(mut self) -> Self {
        self.respect_market_hours = false;
        self
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Sentiment for this cycle and the headline texts it was scored from.
    /// Provider failure or silence falls back.
    async fn fetch_sentiment(&self) -> (SentimentScore, Vec<String>) {
        let fetched = timeout(
            self.provider_timeout,
            self.news.fetch_headlines(self.scorer.keywords()),
        )
        .await
        .unwrap_or(Err(ProviderError::Timeout));

        match fetched {
            Ok(headlines) => {
                let texts: Vec<String> = headlines.iter().map(|h| h.text()).collect();
                (self.scorer.score(&texts), texts)
            }
            Err(e) => {
                warn!(error = %e, "Engine: news unavailable, using fallback sentiment");
                (self.scorer.score::<&str>(&[]), Vec::new())
            }
        }
    }

    async fn evaluate_pair<R: Rng + ?Sized>(
        &self,
        pair: &str,
        sentiment: &SentimentScore,
        rng: &mut R,
    ) -> Result<FuseOutcome, EngineError> {
        let request = MarketDataRequest::new(pair, self.interval.as_str(), self.lookback);
        let series = timeout(self.provider_timeout, self.market_data.get_candles(&request))
            .await
            .unwrap_or(Err(ProviderError::Timeout))?;

        let window = calculate_window(&series, &self.indicators, self.fuser.window_ticks())?;
        Ok(self
            .fuser
            .fuse(pair, &timeframe_label(&self.interval), &window, sentiment, rng))
    }

    /// Fetch and fuse every pair. Does not touch the history.
    pub async fn evaluate<R: Rng + ?Sized>(&self, pairs: &[String], rng: &mut R) -> Evaluation {
        let (sentiment, texts) = self.fetch_sentiment().await;
        let mut evaluation = Evaluation {
            sentiment: Some(sentiment),
            ..Evaluation::default()
        };

        for pair in pairs {
            let impact = self.scorer.impact_for_pair(&texts, pair);
            debug!(
                pair = %pair,
                level = ?impact.level,
                sentiment = impact.sentiment,
                articles = impact.relevant_articles,
                "Engine: news impact"
            );
            evaluation.news_impact.push((pair.clone(), impact));

            match self.evaluate_pair(pair, &sentiment, rng).await {
                Ok(FuseOutcome::Signal(candidate)) => {
                    debug!(
                        pair = %pair,
                        direction = %candidate.direction,
                        confidence = candidate.confidence,
                        "Engine: candidate"
                    );
                    if let Some(metrics) = &self.metrics {
                        metrics.candidates_total.inc();
                    }
                    evaluation.candidates.push(candidate);
                }
                Ok(FuseOutcome::NoSignal(reason)) => {
                    evaluation.no_signal.push((pair.clone(), reason));
                }
                Err(error) => {
                    warn!(pair = %pair, error = %error, "Engine: skipping pair");
                    if let Some(metrics) = &self.metrics {
                        metrics.pairs_skipped_total.inc();
                    }
                    evaluation.skipped.push(PairSkip {
                        pair: pair.clone(),
                        error,
                    });
                }
            }
        }

        evaluation
    }

    /// Hand the best candidate of `evaluation` to the rate limiter
    pub fn submit(
        &self,
        ledger: &mut SignalLedger,
        evaluation: Evaluation,
        now: DateTime<Utc>,
    ) -> Result<CycleOutcome, EngineError> {
        let Some(best) = evaluation.best().cloned() else {
            return Ok(CycleOutcome::NoSignal(evaluation));
        };

        match self.limiter.submit(ledger, best.clone(), now)? {
            Submission::Accepted(accepted) => {
                if let Some(metrics) = &self.metrics {
                    metrics.signals_accepted_total.inc();
                }
                Ok(CycleOutcome::Accepted(evaluation, accepted))
            }
            Submission::Rejected(_) => {
                if let Some(metrics) = &self.metrics {
                    metrics.signals_rate_limited_total.inc();
                }
                Ok(CycleOutcome::RateLimited(evaluation, best))
            }
        }
    }

    fn market_closed(&self, now: DateTime<Utc>) -> bool {
        self.respect_market_hours && !is_market_open(now)
    }

    /// Count a cycle starting at `now` and report whether it should run
    pub fn begin_cycle(&self, now: DateTime<Utc>) -> bool {
        if let Some(metrics) = &self.metrics {
            metrics.cycles_total.inc();
        }
        if self.market_closed(now) {
            info!("Engine: market closed, skipping cycle");
            return false;
        }

        let session = market_session(now);
        debug!(sessions = ?session.sessions, volatility = ?session.volatility, "Engine: market session");
        true
    }

    /// One full cycle over `pairs`.
    ///
    /// Only history failures are returned as errors; provider and indicator
    /// failures skip the affected pair.
    pub async fn run_cycle<R: Rng + ?Sized>(
        &self,
        ledger: &mut SignalLedger,
        pairs: &[String],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<CycleOutcome, EngineError> {
        if !self.begin_cycle(now) {
            return Ok(CycleOutcome::MarketClosed);
        }

        let evaluation = self.evaluate(pairs, rng).await;
        self.submit(ledger, evaluation, now)
    }
}
