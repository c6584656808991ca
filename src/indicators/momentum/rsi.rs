//! RSI (Relative Strength Index) indicator

use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{ensure_length, ensure_period};

/// Calculate RSI over the last `period` close-to-close changes
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// Needs `period + 1` closes. Defined as 100 when the average loss is zero.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Result<f64, IndicatorError> {
    ensure_period("RSI", period, 1)?;
    ensure_length("RSI", period + 1, closes.len())?;

    let window = &closes[closes.len() - (period + 1)..];
    let (gains, losses) = window
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold((0.0, 0.0), |(gains, losses), change| {
            if change > 0.0 {
                (gains + change, losses)
            } else {
                (gains, losses - change)
            }
        });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return Ok(100.0);
    }

    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - (100.0 / (1.0 + rs));
    Ok(rsi.clamp(0.0, 100.0))
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(closes: &[f64]) -> Result<f64, IndicatorError> {
    calculate_rsi(closes, 14)
}
