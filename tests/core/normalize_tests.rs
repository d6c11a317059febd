//! Tests for raw reading to travel percentage conversion

use travelog::normalize::Normalizer;
use travelog::settings::TelemetryConfig;

#[test]
fn test_endpoints() {
    let n = Normalizer::default();
    assert_eq!(n.normalize(0.0), 100.0);
    assert_eq!(n.normalize(1024.0), 0.0);
    assert_eq!(n.normalize(512.0), 50.0);
}

#[test]
fn test_in_range_is_bounded_and_decreasing() {
    let n = Normalizer::default();
    let mut previous = f64::INFINITY;
    for raw in (0..=1024).step_by(16) {
        let y = n.normalize(raw as f64);
        assert!((0.0..=100.0).contains(&y), "{} -> {}", raw, y);
        assert!(y < previous);
        previous = y;
    }
}

#[test]
fn test_out_of_range_is_not_clamped() {
    let n = Normalizer::default();
    assert_eq!(n.normalize(2048.0), -100.0);
    assert_eq!(n.normalize(-1024.0), 200.0);
}

#[test]
fn test_non_finite_passes_through() {
    let n = Normalizer::default();
    assert!(n.normalize(f64::NAN).is_nan());
    assert!(!n.normalize(f64::INFINITY).is_finite());
}

#[test]
fn test_custom_max_travel() {
    let config = TelemetryConfig {
        max_travel: 4096.0,
        ..Default::default()
    };
    let n = Normalizer::from_config(&config);
    assert_eq!(n.max_travel(), 4096.0);
    assert_eq!(n.normalize(1024.0), 75.0);
}
