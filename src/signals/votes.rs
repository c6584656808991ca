//! Independent indicator confirmations.
//!
//! Every `IndicatorKind` is evaluated on its own against the indicator window
//! and may cast one directional vote. Votes are reduced by `tally`.

use serde::{Deserialize, Serialize};

use crate::config::FuserConfig;
use crate::models::indicators::IndicatorWindow;
use crate::models::signal::{Direction, IndicatorKind};

/// One indicator's vote for a trade direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub kind: IndicatorKind,
    pub direction: Direction,
    /// Extreme readings: RSI beyond the extreme thresholds, a fresh band
    /// breakout or exceptional volume
    pub strong: bool,
    /// Ticks since the condition first became true inside the window;
    /// 0 means it became true on the current tick
    pub age: usize,
    pub reason: String,
}

impl Vote {
    pub fn is_fresh(&self, freshness_ticks: usize) -> bool {
        self.age < freshness_ticks
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Reading {
    direction: Direction,
    strong: bool,
    reason: &'static str,
}

fn reading(direction: Direction, strong: bool, reason: &'static str) -> Option<Reading> {
    Some(Reading {
        direction,
        strong,
        reason,
    })
}

fn rsi_reading(window: &IndicatorWindow, idx: usize, config: &FuserConfig) -> Option<Reading> {
    let rsi = window.snapshots()[idx].rsi;
    if rsi < config.rsi_extreme_low {
        reading(Direction::Up, true, "RSI extreme oversold reversal")
    } else if rsi < config.rsi_low {
        reading(Direction::Up, false, "RSI oversold reversal")
    } else if rsi > config.rsi_extreme_high {
        reading(Direction::Down, true, "RSI extreme overbought reversal")
    } else if rsi > config.rsi_high {
        reading(Direction::Down, false, "RSI overbought reversal")
    } else {
        None
    }
}

/// Which side of the signal line the MACD line sits on
fn macd_side(window: &IndicatorWindow, idx: usize) -> Option<Direction> {
    let snapshot = &window.snapshots()[idx];
    let diff = snapshot.macd_line - snapshot.macd_signal;
    if diff > 0.0 {
        Some(Direction::Up)
    } else if diff < 0.0 {
        Some(Direction::Down)
    } else {
        None
    }
}

fn macd_reading(window: &IndicatorWindow, idx: usize) -> Option<Reading> {
    match macd_side(window, idx)? {
        Direction::Up => reading(Direction::Up, false, "MACD bullish signal cross"),
        Direction::Down => reading(Direction::Down, false, "MACD bearish signal cross"),
    }
}

/// A fresh close through a band is a breakout and follows the move. A
/// reversal candle inside the touch tolerance of a band is a bounce and
/// votes against it.
fn bollinger_reading(window: &IndicatorWindow, idx: usize, config: &FuserConfig) -> Option<Reading> {
    let previous = window.snapshots().get(idx.checked_sub(1)?)?;
    let current = &window.snapshots()[idx];
    let position = current.bollinger_position();
    let tolerance = config.band_touch_tolerance;

    if current.close > current.bollinger_upper && previous.close <= previous.bollinger_upper {
        reading(Direction::Up, true, "Bollinger upper band breakout")
    } else if current.close < current.bollinger_lower && previous.close >= previous.bollinger_lower {
        reading(Direction::Down, true, "Bollinger lower band breakdown")
    } else if position <= tolerance && current.close > previous.close {
        reading(Direction::Up, false, "Bollinger lower band bounce")
    } else if position >= 1.0 - tolerance && current.close < previous.close {
        reading(Direction::Down, false, "Bollinger upper band bounce")
    } else {
        None
    }
}

fn ma_trend_reading(window: &IndicatorWindow, idx: usize) -> Option<Reading> {
    let previous = window.snapshots().get(idx.checked_sub(1)?)?;
    let current = &window.snapshots()[idx];
    let slope = current.sma_fast - previous.sma_fast;

    if current.sma_fast > current.sma_slow && slope > 0.0 {
        reading(Direction::Up, false, "MA bullish trend continuation")
    } else if current.sma_fast < current.sma_slow && slope < 0.0 {
        reading(Direction::Down, false, "MA bearish trend continuation")
    } else {
        None
    }
}

fn volume_reading(window: &IndicatorWindow, idx: usize, config: &FuserConfig) -> Option<Reading> {
    let previous = window.snapshots().get(idx.checked_sub(1)?)?;
    let current = &window.snapshots()[idx];

    if current.volume_ratio < 1.0 + config.volume_surge_low {
        return None;
    }
    let direction = if current.close > previous.close {
        Direction::Up
    } else if current.close < previous.close {
        Direction::Down
    } else {
        return None;
    };

    if current.volume_ratio >= 1.0 + config.volume_surge_high {
        reading(direction, true, "Exceptional volume surge")
    } else {
        reading(direction, false, "Above average volume")
    }
}

fn read(kind: IndicatorKind, window: &IndicatorWindow, idx: usize, config: &FuserConfig) -> Option<Reading> {
    match kind {
        IndicatorKind::Rsi => rsi_reading(window, idx, config),
        IndicatorKind::Macd => macd_reading(window, idx),
        IndicatorKind::Bollinger => bollinger_reading(window, idx, config),
        IndicatorKind::MaTrend => ma_trend_reading(window, idx),
        IndicatorKind::Volume => volume_reading(window, idx, config),
    }
}

/// Evaluate one indicator on the current tick of the window
pub fn evaluate(kind: IndicatorKind, window: &IndicatorWindow, config: &FuserConfig) -> Option<Vote> {
    let current_idx = window.len() - 1;
    let current = read(kind, window, current_idx, config)?;

    let age = (0..current_idx)
        .rev()
        .take_while(|&idx| {
            read(kind, window, idx, config).map(|r| r.direction) == Some(current.direction)
        })
        .count();

    // A MACD vote is a crossing: the opposite side must be visible inside
    // the window and recent enough to be fresh.
    if kind == IndicatorKind::Macd && (age == current_idx || age >= config.freshness_ticks) {
        return None;
    }

    Some(Vote {
        kind,
        direction: current.direction,
        strong: current.strong,
        age,
        reason: current.reason.to_string(),
    })
}

/// Evaluate every indicator kind, in `IndicatorKind::ALL` order
pub fn collect_votes(window: &IndicatorWindow, config: &FuserConfig) -> Vec<Vote> {
    IndicatorKind::ALL
        .iter()
        .filter_map(|&kind| evaluate(kind, window, config))
        .collect()
}

/// Votes grouped by direction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    pub up: Vec<Vote>,
    pub down: Vec<Vote>,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.up.len() + self.down.len()
    }

    pub fn votes_for(&self, direction: Direction) -> &[Vote] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    /// Directions whose confirmations reach `required`
    pub fn eligible(&self, required: usize) -> Vec<Direction> {
        [Direction::Up, Direction::Down]
            .into_iter()
            .filter(|&d| self.votes_for(d).len() >= required)
            .collect()
    }
}

pub fn tally(votes: Vec<Vote>) -> Tally {
    let (up, down) = votes
        .into_iter()
        .partition(|vote| vote.direction == Direction::Up);
    Tally { up, down }
}
