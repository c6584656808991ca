//! Volume ratio: recent average volume against the trailing average

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::{ensure_length, ensure_period};

/// Mean of the last `recent` volumes divided by the mean of the last
/// `average_period` volumes. Feeds that report no volume (common for forex)
/// yield a neutral ratio of 1.0.
pub fn calculate_volume_ratio(
    volumes: &[f64],
    recent: usize,
    average_period: usize,
) -> Result<f64, IndicatorError> {
    ensure_period("Volume", recent, 1)?;
    ensure_period("Volume", average_period, 1)?;
    let required = recent.max(average_period);
    ensure_length("Volume", required, volumes.len())?;

    let insufficient = || IndicatorError::insufficient("Volume", required, volumes.len());
    let recent_avg = math::sma(volumes, recent).ok_or_else(insufficient)?;
    let trailing_avg = math::sma(volumes, average_period).ok_or_else(insufficient)?;

    if trailing_avg <= 0.0 {
        return Ok(1.0);
    }
    Ok(recent_avg / trailing_avg)
}
