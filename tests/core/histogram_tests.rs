//! Tests for travel histogram binning

use travelog::analysis::{build_histogram, histogram::thresholds};
use travelog::normalize::Normalizer;
use travelog::parsers::RawReading;

use crate::common::synthetic;

fn values(raw: &[f64]) -> Vec<RawReading> {
    raw.iter().map(|&v| RawReading::Value(v)).collect()
}

#[test]
fn test_extremes_land_in_first_and_last_bins() {
    let (bins, summary) = build_histogram(&values(&[0.0, 1024.0]), &Normalizer::default(), 20);

    assert_eq!(bins.len(), 20);
    assert_eq!(summary.total, 2);
    let non_zero: Vec<_> = bins.iter().filter(|b| b.count > 0).collect();
    assert_eq!(non_zero.len(), 2);
    assert_eq!((non_zero[0].x0, non_zero[0].x1), (0.0, 5.0));
    assert_eq!((non_zero[1].x0, non_zero[1].x1), (95.0, 100.0));
    assert!(non_zero.iter().all(|b| b.count == 1 && b.percent == 50.0));
}

#[test]
fn test_counts_and_percentages_sum() {
    let raw = synthetic::sine(1000, 1024.0, 97);
    let (bins, summary) = build_histogram(&values(&raw), &Normalizer::default(), 20);

    let count: usize = bins.iter().map(|b| b.count).sum();
    assert_eq!(count, summary.total);
    assert_eq!(count, 1000);

    let percent: f64 = bins.iter().map(|b| b.percent).sum();
    assert!((percent - 100.0).abs() <= 10.0, "percent sum {}", percent);
}

#[test]
fn test_empty_input() {
    let (bins, summary) = build_histogram(&[], &Normalizer::default(), 20);
    assert!(bins.is_empty());
    assert_eq!(summary.total, 0);
}

#[test]
fn test_all_non_finite_is_empty() {
    let (bins, summary) = build_histogram(&values(&[f64::NAN, f64::NAN]), &Normalizer::default(), 20);
    assert!(bins.is_empty());
    assert_eq!(summary.non_finite, 2);
}

#[test]
fn test_out_of_domain_values_are_excluded() {
    let (bins, summary) =
        build_histogram(&values(&[512.0, 2048.0, -10.0]), &Normalizer::default(), 20);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.out_of_domain, 2);
    assert_eq!(summary.binned(), 1);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 1);
}

#[test]
fn test_bin_edges() {
    let edges = thresholds(20);
    assert_eq!(edges.len(), 21);
    assert_eq!(edges[1], 5.0);
    assert_eq!(*edges.last().unwrap(), 100.0);

    let edges = thresholds(3);
    assert_eq!(edges.first(), Some(&0.0));
    assert_eq!(edges.last(), Some(&100.0));
}

#[test]
fn test_mid_travel_goes_to_upper_bin() {
    // 512 is exactly 50 %, the lower edge of bin 10
    let (bins, _) = build_histogram(&values(&[512.0]), &Normalizer::default(), 20);
    assert_eq!(bins[10].count, 1);
    assert_eq!(bins[9].count, 0);
}
