use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{ensure_length, ensure_period};

/// Arithmetic mean of the last `period` closes
pub fn calculate_sma(closes: &[f64], period: usize) -> Result<f64, IndicatorError> {
    ensure_period("SMA", period, 1)?;
    ensure_length("SMA", period, closes.len())?;
    math::sma(closes, period).ok_or_else(|| IndicatorError::insufficient("SMA", period, closes.len()))
}
