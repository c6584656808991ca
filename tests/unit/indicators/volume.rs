//! Unit tests for the volume ratio

use fxpulse::indicators::volume::calculate_volume_ratio;

#[test]
fn test_flat_volume_is_neutral() {
    let volumes = vec![1000.0; 20];
    assert_eq!(calculate_volume_ratio(&volumes, 3, 20).unwrap(), 1.0);
}

#[test]
fn test_volume_surge() {
    let mut volumes = vec![100.0; 17];
    volumes.extend([400.0, 400.0, 400.0]);
    // recent 400 against trailing (17 * 100 + 3 * 400) / 20 = 145
    let ratio = calculate_volume_ratio(&volumes, 3, 20).unwrap();
    assert!((ratio - 400.0 / 145.0).abs() < 1e-12);
}

#[test]
fn test_missing_volume_is_neutral() {
    let volumes = vec![0.0; 20];
    assert_eq!(calculate_volume_ratio(&volumes, 3, 20).unwrap(), 1.0);
}

#[test]
fn test_volume_ratio_insufficient_data() {
    assert!(calculate_volume_ratio(&[1.0, 2.0], 3, 20).is_err());
}
