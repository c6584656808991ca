//! Forex trading sessions by UTC hour.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::signal::VolatilityRegime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradingSession {
    Tokyo,
    London,
    NewYork,
}

impl TradingSession {
    pub const ALL: [TradingSession; 3] = [
        TradingSession::Tokyo,
        TradingSession::London,
        TradingSession::NewYork,
    ];

    /// Half-open UTC hour range `[open, close)`
    pub fn hours(self) -> (u32, u32) {
        match self {
            TradingSession::Tokyo => (0, 9),
            TradingSession::London => (8, 17),
            TradingSession::NewYork => (13, 22),
        }
    }

    pub fn is_active(self, hour: u32) -> bool {
        let (open, close) = self.hours();
        hour >= open && hour < close
    }
}

impl fmt::Display for TradingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TradingSession::Tokyo => "Tokyo",
            TradingSession::London => "London",
            TradingSession::NewYork => "New York",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub sessions: Vec<TradingSession>,
    /// Expected activity: overlapping sessions trade the most
    pub volatility: VolatilityRegime,
}

pub fn market_session(now: DateTime<Utc>) -> SessionInfo {
    let hour = now.hour();
    let sessions: Vec<TradingSession> = TradingSession::ALL
        .into_iter()
        .filter(|s| s.is_active(hour))
        .collect();

    let volatility = match sessions.len() {
        0 => VolatilityRegime::Low,
        1 => VolatilityRegime::Medium,
        _ => VolatilityRegime::High,
    };

    SessionInfo {
        sessions,
        volatility,
    }
}

/// Closed on Saturday and Sunday (UTC)
pub fn is_market_open(now: DateTime<Utc>) -> bool {
    !matches!(now.weekday(), Weekday::Sat | Weekday::Sun)
}
