//! Entry countdown and expiry selection

use rand::Rng;

use crate::config::TimingConfig;
use crate::models::indicators::{IndicatorSnapshot, IndicatorWindow};
use crate::models::signal::VolatilityRegime;

/// Coarse volatility from the Bollinger bandwidth of the current tick
pub fn volatility_regime(snapshot: &IndicatorSnapshot, timing: &TimingConfig) -> VolatilityRegime {
    let bandwidth = snapshot.bollinger_bandwidth();
    if bandwidth >= timing.high_bandwidth {
        VolatilityRegime::High
    } else if bandwidth < timing.low_bandwidth {
        VolatilityRegime::Low
    } else {
        VolatilityRegime::Medium
    }
}

/// Higher volatility, shorter expiry
pub fn expiry_seconds(regime: VolatilityRegime, timing: &TimingConfig) -> u64 {
    match regime {
        VolatilityRegime::High => timing.expiry_high_seconds,
        VolatilityRegime::Medium => timing.expiry_medium_seconds,
        VolatilityRegime::Low => timing.expiry_low_seconds,
    }
}

/// Fractional change of the close across the window (at most the last three ticks)
pub fn price_velocity(window: &IndicatorWindow) -> f64 {
    let snapshots = window.snapshots();
    let start = snapshots.len().saturating_sub(3);
    let first = snapshots[start].close;
    let last = window.current().close;
    if first == 0.0 {
        return 0.0;
    }
    (last - first) / first
}

/// Seconds until entry: the fast range while price is moving, otherwise wait
/// for the next candle to form.
pub fn entry_delay_seconds<R: Rng + ?Sized>(
    window: &IndicatorWindow,
    timing: &TimingConfig,
    rng: &mut R,
) -> u64 {
    let (low, high) = if price_velocity(window).abs() > timing.fast_entry_velocity {
        timing.fast_entry_seconds
    } else {
        timing.slow_entry_seconds
    };
    if low >= high {
        return low;
    }
    rng.gen_range(low..=high)
}
