//! Tests for building normalized time series from raw readings

use travelog::normalize::Normalizer;
use travelog::parsers::{ChannelData, RawReading};
use travelog::series::{build_channel_series, build_series, standardize, NormalizedPoint};

fn values(raw: &[f64]) -> Vec<RawReading> {
    raw.iter().map(|&v| RawReading::Value(v)).collect()
}

#[test]
fn test_linear_ramp_at_one_hz() {
    let series = build_series(
        &values(&[0.0, 256.0, 512.0, 768.0, 1024.0]),
        1.0,
        &Normalizer::default(),
    );
    assert_eq!(
        series,
        vec![
            NormalizedPoint::new(0.0, 100.0),
            NormalizedPoint::new(1.0, 75.0),
            NormalizedPoint::new(2.0, 50.0),
            NormalizedPoint::new(3.0, 25.0),
            NormalizedPoint::new(4.0, 0.0),
        ]
    );
}

#[test]
fn test_time_is_index_over_frequency() {
    let points = standardize(&values(&[1.0; 8]), 4.0);
    for (k, p) in points.iter().enumerate() {
        assert_eq!(p.time, k as f64 / 4.0);
    }
}

#[test]
fn test_explicit_timebase_wins() {
    let readings = vec![
        RawReading::Record {
            displacement: 0.0,
            timebase: Some(10.0),
        },
        RawReading::Record {
            displacement: 1024.0,
            timebase: None,
        },
        RawReading::Value(512.0),
    ];
    let points = standardize(&readings, 2.0);
    assert_eq!(points[0].time, 10.0);
    assert_eq!(points[1].time, 0.5);
    assert_eq!(points[2].time, 1.0);
}

#[test]
fn test_empty_and_invalid_channels() {
    let n = Normalizer::default();
    assert!(build_series(&[], 100.0, &n).is_empty());
    assert!(build_channel_series(&ChannelData::Absent, 100.0, &n).is_empty());
    assert!(build_channel_series(&ChannelData::Invalid, 100.0, &n).is_empty());
}

#[test]
fn test_non_finite_values_are_kept() {
    let series = build_series(&values(&[0.0, f64::NAN, 1024.0]), 1.0, &Normalizer::default());
    assert_eq!(series.len(), 3);
    assert!(series[1].y.is_nan());
    assert_eq!(series[1].x, 1.0);
}
