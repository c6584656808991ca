use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("insufficient data for {indicator}: need {required} points, have {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("invalid period for {indicator}: {reason}")]
    InvalidPeriod {
        indicator: &'static str,
        reason: String,
    },

    #[error("timestamps must be strictly increasing (index {index})")]
    NonMonotonicTimestamps { index: usize },

    #[error("non-finite {field} at index {index}")]
    InvalidValue { field: &'static str, index: usize },
}

impl IndicatorError {
    pub fn insufficient(indicator: &'static str, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            indicator,
            required,
            available,
        }
    }
}
