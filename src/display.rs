//! Plain-text rendering of accepted signals for the worker's console output.

use chrono::{DateTime, Duration, Utc};

use crate::models::signal::{AcceptedSignal, Direction};
use crate::sentiment::split_pair;

/// "EURUSD=X" -> "EUR/USD"; anything unrecognised is returned upper-cased
pub fn format_pair(pair: &str) -> String {
    match split_pair(pair) {
        Some((base, quote)) => format!("{}/{}", base, quote),
        None => pair.to_uppercase(),
    }
}

fn arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "⬆️",
        Direction::Down => "⬇️",
    }
}

/// Wall-clock time the trade should be entered
pub fn execute_at(signal: &AcceptedSignal) -> DateTime<Utc> {
    signal.emitted_at + Duration::seconds(signal.signal.entry_delay_seconds as i64)
}

pub fn format_signal(signal: &AcceptedSignal, now: DateTime<Utc>) -> String {
    let candidate = &signal.signal;
    let execute = execute_at(signal);
    let countdown = (execute - now).num_seconds().max(0);
    let expiry_minutes = candidate.expiry_seconds as f64 / 60.0;
    let confirmations = candidate
        .confirmations
        .iter()
        .map(|kind| kind.name())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{pair} OTC {timeframe}\n\
         {arrow} {direction} TRADE\n\
         Execute at: {execute} (in {countdown}s)\n\
         Expiry: {expiry:.0} minute(s)\n\
         Confidence: {confidence:.0}%\n\
         Confirmations: {confirmations}\n\
         Reason: {reason}",
        pair = format_pair(&candidate.pair),
        timeframe = candidate.timeframe,
        arrow = arrow(candidate.direction),
        direction = candidate.direction,
        execute = execute.format("%H:%M:%S"),
        countdown = countdown,
        expiry = expiry_minutes.max(1.0),
        confidence = candidate.confidence * 100.0,
        confirmations = confirmations,
        reason = candidate.reason,
    )
}
