//! Confirmation votes, confidence scoring and signal fusion.

pub mod engine;
pub mod fuser;
pub mod scoring;
pub mod timing;
pub mod votes;

pub use engine::{timeframe_label, CycleOutcome, EngineError, Evaluation, SignalEngine};
pub use fuser::{FuseOutcome, NoSignalReason, SignalFuser};
pub use scoring::*;
pub use votes::{collect_votes, tally, Tally, Vote};
