//! News sentiment scoring.

pub mod lexicon;
pub mod scorer;

pub use lexicon::{LexiconModel, PolarityModel};
pub use scorer::{split_pair, SentimentScorer};
