//! The in-memory view of the history plus the store it mirrors.
//!
//! All mutation goes through `&mut self`, so a single process has exactly one
//! writer. Several processes writing the same file are not supported.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::history::stats::{compute_stats, HistoryStats};
use crate::history::store::{HistoryError, HistoryStore};
use crate::models::signal::AcceptedSignal;
use crate::sentiment::split_pair;

pub struct SignalLedger {
    store: Box<dyn HistoryStore>,
    records: Vec<AcceptedSignal>,
}

impl SignalLedger {
    /// Open a ledger, reading the current history from `store`
    pub fn open(store: Box<dyn HistoryStore>) -> Result<Self, HistoryError> {
        let records = store.load()?;
        Ok(Self { store, records })
    }

    /// Re-read the full document from the store
    pub fn reload(&mut self) -> Result<(), HistoryError> {
        self.records = self.store.load()?;
        Ok(())
    }

    /// Append one record and rewrite the full document
    pub fn append(&mut self, record: AcceptedSignal) -> Result<(), HistoryError> {
        self.records.push(record);
        if let Err(e) = self.store.save(&self.records) {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Records in stored (emission) order
    pub fn records(&self) -> &[AcceptedSignal] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Newest first
    pub fn recent(&self, count: usize) -> Vec<AcceptedSignal> {
        self.records.iter().rev().take(count).cloned().collect()
    }

    /// Newest first, pair compared on its currency legs so "EURUSD=X" and
    /// "EUR/USD" match
    pub fn by_pair(&self, pair: &str, count: usize) -> Vec<AcceptedSignal> {
        let wanted = normalize_pair(pair);
        self.records
            .iter()
            .rev()
            .filter(|r| normalize_pair(r.pair()) == wanted)
            .take(count)
            .cloned()
            .collect()
    }

    /// Records emitted on the same UTC calendar day as `now`
    pub fn today(&self, now: DateTime<Utc>) -> Vec<AcceptedSignal> {
        let day = now.date_naive();
        self.records
            .iter()
            .filter(|r| r.emitted_at.date_naive() == day)
            .cloned()
            .collect()
    }

    pub fn stats(&self, now: DateTime<Utc>) -> HistoryStats {
        compute_stats(&self.records, now)
    }

    /// Explicitly drop records older than `days`. Rate limiting never calls
    /// this; the history only shrinks on request.
    pub fn cleanup_older_than(&mut self, days: i64, now: DateTime<Utc>) -> Result<usize, HistoryError> {
        self.reload()?;
        let cutoff = now - Duration::days(days);
        let before = self.records.len();
        let kept: Vec<AcceptedSignal> = self
            .records
            .iter()
            .filter(|r| r.emitted_at > cutoff)
            .cloned()
            .collect();
        let removed = before - kept.len();

        self.store.save(&kept)?;
        self.records = kept;
        info!(removed = removed, days = days, "History: cleaned up old signals");
        Ok(removed)
    }

    pub fn export_json(&self) -> Result<String, HistoryError> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }
}

fn normalize_pair(pair: &str) -> String {
    match split_pair(pair) {
        Some((base, quote)) => format!("{}{}", base, quote),
        None => pair.to_uppercase(),
    }
}
