//! MACD (Moving Average Convergence Divergence) indicator

use serde::{Deserialize, Serialize};

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{ensure_length, ensure_period};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdValue {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Number of closes MACD needs before the signal line is defined
pub fn macd_lookback(slow_period: usize, signal_period: usize) -> usize {
    slow_period + signal_period - 1
}

/// Calculate MACD at the last close
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
pub fn calculate_macd(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<MacdValue, IndicatorError> {
    ensure_period("MACD", fast_period, 1)?;
    ensure_period("MACD", signal_period, 1)?;
    if fast_period >= slow_period {
        return Err(IndicatorError::InvalidPeriod {
            indicator: "MACD",
            reason: format!(
                "fast period {} must be shorter than slow period {}",
                fast_period, slow_period
            ),
        });
    }
    ensure_length("MACD", macd_lookback(slow_period, signal_period), closes.len())?;

    let fast = math::ema_series(closes, fast_period)
        .ok_or_else(|| IndicatorError::insufficient("MACD", fast_period, closes.len()))?;
    let slow = math::ema_series(closes, slow_period)
        .ok_or_else(|| IndicatorError::insufficient("MACD", slow_period, closes.len()))?;

    // Align the fast series onto the slow one: both end at the last close
    let offset = slow_period - fast_period;
    let macd_line: Vec<f64> = slow
        .iter()
        .enumerate()
        .map(|(i, slow_value)| fast[i + offset] - slow_value)
        .collect();

    let signal_series = math::ema_series(&macd_line, signal_period).ok_or_else(|| {
        IndicatorError::insufficient(
            "MACD",
            macd_lookback(slow_period, signal_period),
            closes.len(),
        )
    })?;

    let line = macd_line[macd_line.len() - 1];
    let signal = signal_series[signal_series.len() - 1];

    Ok(MacdValue {
        line,
        signal,
        histogram: line - signal,
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(closes: &[f64]) -> Result<MacdValue, IndicatorError> {
    calculate_macd(closes, 12, 26, 9)
}
