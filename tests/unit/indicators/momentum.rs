//! Unit tests for RSI and MACD

use fxpulse::indicators::momentum::{
    calculate_macd, calculate_macd_default, calculate_rsi, calculate_rsi_default, macd_lookback,
};
use fxpulse::indicators::IndicatorError;

use crate::fixtures::linear_closes;

#[test]
fn test_rsi_insufficient_data() {
    let closes = linear_closes(14, 1.1, 0.001);
    let err = calculate_rsi_default(&closes).unwrap_err();
    assert_eq!(
        err,
        IndicatorError::InsufficientData {
            indicator: "RSI",
            required: 15,
            available: 14,
        }
    );
}

#[test]
fn test_rsi_only_gains_is_100() {
    let closes = linear_closes(15, 1.1, 0.001);
    assert_eq!(calculate_rsi_default(&closes).unwrap(), 100.0);
}

#[test]
fn test_rsi_only_losses_is_0() {
    let closes = linear_closes(15, 1.2, -0.001);
    let rsi = calculate_rsi_default(&closes).unwrap();
    assert!(rsi.abs() < 1e-9);
}

#[test]
fn test_rsi_balanced_moves_is_50() {
    // Alternating +1 / -1 over an even number of changes
    let closes: Vec<f64> = (0..5).map(|i| if i % 2 == 0 { 10.0 } else { 11.0 }).collect();
    let rsi = calculate_rsi(&closes, 4).unwrap();
    assert!((rsi - 50.0).abs() < 1e-9);
}

#[test]
fn test_rsi_known_value() {
    // Changes: +2, -1, +2, -1 -> avg gain 1.0, avg loss 0.5, RS 2
    let closes = [10.0, 12.0, 11.0, 13.0, 12.0];
    let rsi = calculate_rsi(&closes, 4).unwrap();
    assert!((rsi - (100.0 - 100.0 / 3.0)).abs() < 1e-9);
}

#[test]
fn test_rsi_zero_period_is_invalid() {
    let closes = linear_closes(20, 1.1, 0.001);
    assert!(matches!(
        calculate_rsi(&closes, 0),
        Err(IndicatorError::InvalidPeriod { indicator: "RSI", .. })
    ));
}

#[test]
fn test_macd_lookback() {
    assert_eq!(macd_lookback(26, 9), 34);
}

#[test]
fn test_macd_insufficient_data() {
    let closes = linear_closes(33, 1.1, 0.001);
    assert!(matches!(
        calculate_macd_default(&closes),
        Err(IndicatorError::InsufficientData {
            indicator: "MACD",
            required: 34,
            available: 33,
        })
    ));
}

#[test]
fn test_macd_of_flat_series_is_zero() {
    let closes = vec![1.1; 60];
    let macd = calculate_macd_default(&closes).unwrap();
    assert!(macd.line.abs() < 1e-12);
    assert!(macd.signal.abs() < 1e-12);
    assert!(macd.histogram.abs() < 1e-12);
}

#[test]
fn test_macd_uptrend_has_positive_line() {
    let closes = linear_closes(60, 1.1, 0.0005);
    let macd = calculate_macd_default(&closes).unwrap();
    assert!(macd.line > 0.0);
    assert!((macd.histogram - (macd.line - macd.signal)).abs() < 1e-12);
}

#[test]
fn test_macd_downtrend_has_negative_line() {
    let closes = linear_closes(60, 1.2, -0.0005);
    let macd = calculate_macd_default(&closes).unwrap();
    assert!(macd.line < 0.0);
}

#[test]
fn test_macd_rejects_fast_not_shorter_than_slow() {
    let closes = linear_closes(60, 1.1, 0.001);
    assert!(matches!(
        calculate_macd(&closes, 26, 12, 9),
        Err(IndicatorError::InvalidPeriod { indicator: "MACD", .. })
    ));
}
