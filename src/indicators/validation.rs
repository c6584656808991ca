use crate::indicators::error::IndicatorError;
use crate::models::indicators::PricePoint;

/// Check that a series is usable: strictly increasing timestamps and finite
/// OHLCV values.
pub fn validate_series(series: &[PricePoint]) -> Result<(), IndicatorError> {
    for (index, point) in series.iter().enumerate() {
        let fields = [
            ("open", point.open),
            ("high", point.high),
            ("low", point.low),
            ("close", point.close),
            ("volume", point.volume),
        ];
        if let Some(&(field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(IndicatorError::InvalidValue { field, index });
        }

        if index > 0 && point.timestamp <= series[index - 1].timestamp {
            return Err(IndicatorError::NonMonotonicTimestamps { index });
        }
    }
    Ok(())
}

pub fn ensure_length(
    indicator: &'static str,
    required: usize,
    available: usize,
) -> Result<(), IndicatorError> {
    if available < required {
        Err(IndicatorError::insufficient(indicator, required, available))
    } else {
        Ok(())
    }
}

pub fn ensure_period(indicator: &'static str, period: usize, minimum: usize) -> Result<(), IndicatorError> {
    if period < minimum {
        Err(IndicatorError::InvalidPeriod {
            indicator,
            reason: format!("period {} is below the minimum of {}", period, minimum),
        })
    } else {
        Ok(())
    }
}
