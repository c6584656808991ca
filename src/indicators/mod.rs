pub mod calculator;
pub mod error;
pub mod validation;

pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use calculator::{calculate_snapshot, calculate_window};
pub use error::IndicatorError;
pub use validation::*;
