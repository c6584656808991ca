use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar as delivered by the market-data provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PricePoint {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Indicator readings at a single evaluation instant.
///
/// Always recomputed from the trailing price window; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub volume: f64,
    pub sma_fast: f64,
    pub sma_slow: f64,
    pub ema: f64,
    pub rsi: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
    pub bollinger_upper: f64,
    pub bollinger_mid: f64,
    pub bollinger_lower: f64,
    pub volume_ratio: f64,
}

impl IndicatorSnapshot {
    pub fn macd_histogram(&self) -> f64 {
        self.macd_line - self.macd_signal
    }

    /// Position of the close inside the Bollinger envelope (%B).
    ///
    /// 0 at the lower band, 1 at the upper band, outside [0, 1] beyond them.
    /// A collapsed band reports the midpoint.
    pub fn bollinger_position(&self) -> f64 {
        let width = self.bollinger_upper - self.bollinger_lower;
        if width <= f64::EPSILON {
            return 0.5;
        }
        (self.close - self.bollinger_lower) / width
    }

    /// Band width relative to the middle band
    pub fn bollinger_bandwidth(&self) -> f64 {
        if self.bollinger_mid.abs() <= f64::EPSILON {
            return 0.0;
        }
        (self.bollinger_upper - self.bollinger_lower) / self.bollinger_mid
    }
}

/// Snapshots for the most recent evaluation instants of one series,
/// oldest first. The last element is the current instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorWindow {
    snapshots: Vec<IndicatorSnapshot>,
}

impl IndicatorWindow {
    /// Returns `None` for an empty list; a window always has a current instant.
    pub fn new(snapshots: Vec<IndicatorSnapshot>) -> Option<Self> {
        if snapshots.is_empty() {
            None
        } else {
            Some(Self { snapshots })
        }
    }

    pub fn single(snapshot: IndicatorSnapshot) -> Self {
        Self {
            snapshots: vec![snapshot],
        }
    }

    pub fn current(&self) -> &IndicatorSnapshot {
        // Non-empty by construction
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn previous(&self) -> Option<&IndicatorSnapshot> {
        let len = self.snapshots.len();
        if len >= 2 {
            self.snapshots.get(len - 2)
        } else {
            None
        }
    }

    pub fn snapshots(&self) -> &[IndicatorSnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
