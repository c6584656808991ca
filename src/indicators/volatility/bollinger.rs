//! Bollinger Bands indicator

use serde::{Deserialize, Serialize};

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{ensure_length, ensure_period};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Calculate Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (multiplier * sample standard deviation)
/// Lower Band = Middle - (multiplier * sample standard deviation)
pub fn calculate_bollinger_bands(
    closes: &[f64],
    period: usize,
    multiplier: f64,
) -> Result<BollingerBands, IndicatorError> {
    ensure_period("Bollinger", period, 2)?;
    ensure_length("Bollinger", period, closes.len())?;

    let insufficient = || IndicatorError::insufficient("Bollinger", period, closes.len());
    let middle = math::sma(closes, period).ok_or_else(insufficient)?;
    let std = math::standard_deviation(closes, period).ok_or_else(insufficient)?;

    Ok(BollingerBands {
        upper: middle + multiplier * std,
        middle,
        lower: middle - multiplier * std,
    })
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(closes: &[f64]) -> Result<BollingerBands, IndicatorError> {
    calculate_bollinger_bands(closes, 20, 2.0)
}
