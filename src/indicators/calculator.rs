//! Builds indicator snapshots from a price series.

use crate::config::IndicatorConfig;
use crate::indicators::error::IndicatorError;
use crate::indicators::momentum::{calculate_macd, calculate_rsi};
use crate::indicators::trend::{calculate_ema, calculate_sma};
use crate::indicators::validation::{ensure_length, validate_series};
use crate::indicators::volatility::calculate_bollinger_bands;
use crate::indicators::volume::calculate_volume_ratio;
use crate::models::indicators::{IndicatorSnapshot, IndicatorWindow, PricePoint};

/// Snapshot for the most recent point of `series`.
///
/// Fails with `InsufficientData` when the series is shorter than the
/// longest configured lookback; callers skip the instant in that case.
pub fn calculate_snapshot(
    series: &[PricePoint],
    config: &IndicatorConfig,
) -> Result<IndicatorSnapshot, IndicatorError> {
    validate_series(series)?;
    snapshot_unchecked(series, config)
}

/// Snapshots for up to `ticks` most recent instants, oldest first.
///
/// Each instant is computed from the series truncated at that point, so the
/// window never carries state between evaluations. When the series only
/// covers fewer instants the window is shorter, but never empty.
pub fn calculate_window(
    series: &[PricePoint],
    config: &IndicatorConfig,
    ticks: usize,
) -> Result<IndicatorWindow, IndicatorError> {
    validate_series(series)?;

    let lookback = config.required_lookback();
    ensure_length("snapshot", lookback, series.len())?;

    let available = series.len() - lookback + 1;
    let ticks = ticks.max(1).min(available);

    let snapshots = (0..ticks)
        .rev()
        .map(|back| snapshot_unchecked(&series[..series.len() - back], config))
        .collect::<Result<Vec<_>, _>>()?;

    IndicatorWindow::new(snapshots)
        .ok_or_else(|| IndicatorError::insufficient("snapshot", lookback, series.len()))
}

fn snapshot_unchecked(
    series: &[PricePoint],
    config: &IndicatorConfig,
) -> Result<IndicatorSnapshot, IndicatorError> {
    ensure_length("snapshot", config.required_lookback(), series.len())?;

    let last = series[series.len() - 1];
    let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
    let volumes: Vec<f64> = series.iter().map(|p| p.volume).collect();

    let macd = calculate_macd(&closes, config.macd_fast, config.macd_slow, config.macd_signal)?;
    let bands = calculate_bollinger_bands(
        &closes,
        config.bollinger_period,
        config.bollinger_multiplier,
    )?;

    Ok(IndicatorSnapshot {
        timestamp: last.timestamp,
        close: last.close,
        volume: last.volume,
        sma_fast: calculate_sma(&closes, config.sma_fast)?,
        sma_slow: calculate_sma(&closes, config.sma_slow)?,
        ema: calculate_ema(&closes, config.ema_period)?,
        rsi: calculate_rsi(&closes, config.rsi_period)?,
        macd_line: macd.line,
        macd_signal: macd.signal,
        bollinger_upper: bands.upper,
        bollinger_mid: bands.middle,
        bollinger_lower: bands.lower,
        volume_ratio: calculate_volume_ratio(
            &volumes,
            config.volume_recent,
            config.volume_average_period,
        )?,
    })
}
