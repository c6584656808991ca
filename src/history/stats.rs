use std::collections::BTreeMap;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::models::signal::{AcceptedSignal, Direction};

/// Confidence at or above which a signal counts as high-confidence
pub const HIGH_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairStats {
    pub count: usize,
    pub up_count: usize,
    pub down_count: usize,
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total_signals: usize,
    pub signals_today: usize,
    pub avg_confidence: f64,
    /// Share of signals at or above `HIGH_CONFIDENCE`, in [0, 1]
    pub high_confidence_share: f64,
    pub up_signals: usize,
    pub down_signals: usize,
    pub pairs: BTreeMap<String, PairStats>,
    /// Signal count keyed by UTC hour of emission
    pub hourly_distribution: BTreeMap<u32, usize>,
}

pub fn compute_stats(records: &[AcceptedSignal], now: DateTime<Utc>) -> HistoryStats {
    if records.is_empty() {
        return HistoryStats::default();
    }

    let today = now.date_naive();
    let mut stats = HistoryStats {
        total_signals: records.len(),
        ..HistoryStats::default()
    };
    let mut confidence_sum = 0.0;
    let mut high_confidence = 0usize;

    for record in records {
        let confidence = record.confidence();
        confidence_sum += confidence;
        if confidence >= HIGH_CONFIDENCE {
            high_confidence += 1;
        }
        if record.emitted_at.date_naive() == today {
            stats.signals_today += 1;
        }

        let pair = stats.pairs.entry(record.pair().to_string()).or_default();
        pair.count += 1;
        pair.avg_confidence += confidence;

        match record.direction() {
            Direction::Up => {
                stats.up_signals += 1;
                pair.up_count += 1;
            }
            Direction::Down => {
                stats.down_signals += 1;
                pair.down_count += 1;
            }
        }

        *stats
            .hourly_distribution
            .entry(record.emitted_at.hour())
            .or_insert(0) += 1;
    }

    for pair in stats.pairs.values_mut() {
        pair.avg_confidence /= pair.count as f64;
    }
    stats.avg_confidence = confidence_sum / records.len() as f64;
    stats.high_confidence_share = high_confidence as f64 / records.len() as f64;

    stats
}
