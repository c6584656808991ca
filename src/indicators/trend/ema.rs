//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{ensure_length, ensure_period};

/// EMA at the last close, seeded with the SMA of the first `period` closes
/// and smoothed with 2 / (period + 1).
pub fn calculate_ema(closes: &[f64], period: usize) -> Result<f64, IndicatorError> {
    ensure_period("EMA", period, 1)?;
    ensure_length("EMA", period, closes.len())?;
    math::ema(closes, period).ok_or_else(|| IndicatorError::insufficient("EMA", period, closes.len()))
}

