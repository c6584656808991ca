//! Rate limiting and the persisted signal history.

pub mod ledger;
pub mod limiter;
pub mod stats;
pub mod store;

pub use ledger::SignalLedger;
pub use limiter::{RateLimitWindow, RateLimiter, Rejection, Submission};
pub use stats::{compute_stats, HistoryStats, PairStats};
pub use store::{HistoryError, HistoryStore, JsonFileStore, MemoryStore};
