//! Unit tests for snapshot and window calculation

use chrono::Duration;
use fxpulse::config::IndicatorConfig;
use fxpulse::indicators::{calculate_snapshot, calculate_window, validate_series, IndicatorError};

use crate::fixtures::{linear_closes, series_from_closes};

#[test]
fn test_default_lookback() {
    assert_eq!(IndicatorConfig::default().required_lookback(), 34);
}

#[test]
fn test_snapshot_insufficient_data() {
    let series = series_from_closes(&linear_closes(30, 1.1, 0.0001));
    let err = calculate_snapshot(&series, &IndicatorConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        IndicatorError::InsufficientData {
            required: 34,
            available: 30,
            ..
        }
    ));
}

#[test]
fn test_snapshot_reflects_last_point() {
    let series = series_from_closes(&linear_closes(60, 1.1, 0.0001));
    let snapshot = calculate_snapshot(&series, &IndicatorConfig::default()).unwrap();
    let last = series.last().unwrap();

    assert_eq!(snapshot.timestamp, last.timestamp);
    assert_eq!(snapshot.close, last.close);
    assert_eq!(snapshot.rsi, 100.0);
    assert!(snapshot.sma_fast > snapshot.sma_slow);
    assert!(snapshot.bollinger_upper > snapshot.bollinger_mid);
    assert!(snapshot.bollinger_mid > snapshot.bollinger_lower);
    assert_eq!(snapshot.volume_ratio, 1.0);
}

#[test]
fn test_snapshot_is_deterministic() {
    let series = series_from_closes(&linear_closes(60, 1.1, 0.0001));
    let config = IndicatorConfig::default();
    assert_eq!(
        calculate_snapshot(&series, &config).unwrap(),
        calculate_snapshot(&series, &config).unwrap()
    );
}

#[test]
fn test_window_is_oldest_first() {
    let series = series_from_closes(&linear_closes(60, 1.1, 0.0001));
    let window = calculate_window(&series, &IndicatorConfig::default(), 3).unwrap();

    assert_eq!(window.len(), 3);
    let stamps: Vec<_> = window.snapshots().iter().map(|s| s.timestamp).collect();
    assert_eq!(stamps[2], series[59].timestamp);
    assert_eq!(stamps[1], series[58].timestamp);
    assert_eq!(stamps[0], series[57].timestamp);
}

#[test]
fn test_window_current_matches_snapshot() {
    let series = series_from_closes(&linear_closes(60, 1.1, 0.0001));
    let config = IndicatorConfig::default();
    let window = calculate_window(&series, &config, 3).unwrap();
    assert_eq!(window.current(), &calculate_snapshot(&series, &config).unwrap());
}

#[test]
fn test_window_shrinks_to_available_instants() {
    // 35 points cover exactly two instants at a 34-point lookback
    let series = series_from_closes(&linear_closes(35, 1.1, 0.0001));
    let window = calculate_window(&series, &IndicatorConfig::default(), 5).unwrap();
    assert_eq!(window.len(), 2);
}

#[test]
fn test_non_monotonic_timestamps_rejected() {
    let mut series = series_from_closes(&linear_closes(40, 1.1, 0.0001));
    series[10].timestamp = series[9].timestamp - Duration::seconds(1);
    assert_eq!(
        validate_series(&series),
        Err(IndicatorError::NonMonotonicTimestamps { index: 10 })
    );
    assert!(calculate_snapshot(&series, &IndicatorConfig::default()).is_err());
}

#[test]
fn test_non_finite_close_rejected() {
    let mut series = series_from_closes(&linear_closes(40, 1.1, 0.0001));
    series[5].close = f64::NAN;
    assert_eq!(
        validate_series(&series),
        Err(IndicatorError::InvalidValue {
            field: "close",
            index: 5,
        })
    );
}
