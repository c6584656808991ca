//! Sliding-hour cap on accepted signals

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::RateLimitConfig;
use crate::history::ledger::SignalLedger;
use crate::history::store::HistoryError;
use crate::models::signal::{AcceptedSignal, CandidateSignal};

/// Accepted signals inside the trailing window, recomputed on every check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitWindow {
    pub window_start: DateTime<Utc>,
    pub count: usize,
    /// Emission time of the oldest record still inside the window
    pub oldest: Option<DateTime<Utc>>,
}

impl RateLimitWindow {
    /// Count records emitted after `now - span`. Records stamped later than
    /// `now` count too, so the cap holds even if the clock steps back.
    pub fn measure(records: &[AcceptedSignal], now: DateTime<Utc>, span: Duration) -> Self {
        let window_start = now - span;
        let mut count = 0;
        let mut oldest: Option<DateTime<Utc>> = None;

        for record in records.iter().filter(|r| r.emitted_at > window_start) {
            count += 1;
            oldest = Some(match oldest {
                Some(t) if t <= record.emitted_at => t,
                _ => record.emitted_at,
            });
        }

        Self {
            window_start,
            count,
            oldest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rejection {
    RateLimited {
        count: usize,
        max_per_hour: usize,
        /// When the oldest counted record leaves the window
        retry_at: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Accepted(AcceptedSignal),
    Rejected(Rejection),
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Submission::Accepted(_))
    }
}

pub struct RateLimiter {
    max_per_hour: usize,
    span: Duration,
}

impl RateLimiter {
    pub fn new(max_per_hour: usize) -> Self {
        Self {
            max_per_hour,
            span: Duration::hours(1),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_per_hour)
    }

    pub fn max_per_hour(&self) -> usize {
        self.max_per_hour
    }

    pub fn window(&self, ledger: &SignalLedger, now: DateTime<Utc>) -> RateLimitWindow {
        RateLimitWindow::measure(ledger.records(), now, self.span)
    }

    /// Accept the candidate if fewer than `max_per_hour` signals were emitted
    /// in the trailing hour, otherwise drop it.
    ///
    /// Reads the full history, counts, appends and rewrites the full history.
    pub fn submit(
        &self,
        ledger: &mut SignalLedger,
        candidate: CandidateSignal,
        now: DateTime<Utc>,
    ) -> Result<Submission, HistoryError> {
        ledger.reload()?;
        let window = self.window(ledger, now);

        if window.count >= self.max_per_hour {
            let retry_at = window.oldest.map(|t| t + self.span);
            warn!(
                pair = %candidate.pair,
                direction = %candidate.direction,
                count = window.count,
                max = self.max_per_hour,
                "RateLimiter: signal suppressed, {} signals in the last hour",
                window.count
            );
            return Ok(Submission::Rejected(Rejection::RateLimited {
                count: window.count,
                max_per_hour: self.max_per_hour,
                retry_at,
            }));
        }

        let accepted = AcceptedSignal::new(candidate, now);
        ledger.append(accepted.clone())?;

        info!(
            id = %accepted.id,
            pair = %accepted.signal.pair,
            direction = %accepted.signal.direction,
            confidence = accepted.signal.confidence,
            "RateLimiter: signal accepted ({} of {} this hour)",
            window.count + 1,
            self.max_per_hour
        );
        Ok(Submission::Accepted(accepted))
    }
}
