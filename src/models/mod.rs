//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod sentiment;
pub mod signal;

pub use indicators::{IndicatorSnapshot, IndicatorWindow, PricePoint};
pub use sentiment::{Headline, ImpactLevel, NewsImpact, SentimentScore};
pub use signal::{
    AcceptedSignal, CandidateSignal, Direction, IndicatorKind, VolatilityRegime,
};
