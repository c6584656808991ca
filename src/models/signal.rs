use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// +1 for UP, -1 for DOWN
    pub fn sign(self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

/// The closed set of indicators that can cast a confirmation vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    Rsi,
    Macd,
    Bollinger,
    MaTrend,
    Volume,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 5] = [
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::Bollinger,
        IndicatorKind::MaTrend,
        IndicatorKind::Volume,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::Bollinger => "BOLLINGER",
            IndicatorKind::MaTrend => "MA_TREND",
            IndicatorKind::Volume => "VOLUME",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityRegime {
    High,
    Medium,
    Low,
}

/// Output of the fuser, not yet committed to history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSignal {
    pub pair: String,
    pub timeframe: String,
    pub direction: Direction,
    pub confidence: f64,
    pub confirmations: BTreeSet<IndicatorKind>,
    pub entry_delay_seconds: u64,
    pub expiry_seconds: u64,
    pub reason: String,
    pub price: f64,
    pub volatility: VolatilityRegime,
}

/// A candidate that passed the rate limiter. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedSignal {
    pub id: Uuid,
    pub emitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub signal: CandidateSignal,
}

impl AcceptedSignal {
    pub fn new(signal: CandidateSignal, emitted_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            emitted_at,
            signal,
        }
    }

    pub fn pair(&self) -> &str {
        &self.signal.pair
    }

    pub fn direction(&self) -> Direction {
        self.signal.direction
    }

    pub fn confidence(&self) -> f64 {
        self.signal.confidence
    }
}
