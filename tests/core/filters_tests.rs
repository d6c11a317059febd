//! Tests for the dynamic sag moving average

use travelog::analysis::{moving_average, window_size, SagFilter};
use travelog::series::NormalizedPoint;
use travelog::settings::TelemetryConfig;

fn series(ys: &[f64], freq: f64) -> Vec<NormalizedPoint> {
    ys.iter()
        .enumerate()
        .map(|(i, &y)| NormalizedPoint::new(i as f64 / freq, y))
        .collect()
}

#[test]
fn test_ten_constant_samples() {
    // 10 Hz, 500 ms window: 5 samples per window, 6 outputs
    let out = moving_average(&series(&[50.0; 10], 10.0), 10.0, 500.0);
    assert_eq!(out.len(), 6);
    assert!(out.iter().all(|p| (p.y - 50.0).abs() < 1e-9));
}

#[test]
fn test_output_length() {
    for n in 0..12 {
        let out = moving_average(&series(&vec![1.0; n], 10.0), 10.0, 500.0);
        assert_eq!(out.len(), (n + 1).saturating_sub(5), "n = {}", n);
    }
}

#[test]
fn test_centering_on_identity() {
    // y = t: the window ending at index k is labelled t_k - half window
    let freq = 10.0;
    let ys: Vec<f64> = (0..20).map(|i| i as f64 / freq).collect();
    let out = moving_average(&series(&ys, freq), freq, 500.0);

    for (j, p) in out.iter().enumerate() {
        let end = j + 4;
        let t_end = end as f64 / freq;
        assert!((p.x - (t_end - 0.25)).abs() < 1e-9);
    }
}

#[test]
fn test_window_size_floor_and_minimum() {
    assert_eq!(window_size(500.0, 10.0), 5);
    assert_eq!(window_size(500.0, 9.0), 4);
    assert_eq!(window_size(1.0, 10.0), 1);
    assert_eq!(window_size(500.0, 1000.0), 500);
}

#[test]
fn test_short_series_yields_nothing() {
    let filter = SagFilter::from_config(&TelemetryConfig::default());
    assert!(filter.apply(&series(&[10.0; 3], 10.0), 10.0).is_empty());
}

#[test]
fn test_averages_a_step() {
    let mut ys = vec![0.0; 5];
    ys.extend(vec![100.0; 5]);
    let out = moving_average(&series(&ys, 10.0), 10.0, 500.0);
    let averages: Vec<f64> = out.iter().map(|p| (p.y * 1e6).round() / 1e6).collect();
    assert_eq!(averages, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
}

#[test]
fn test_bad_first_sample_does_not_poison_the_run() {
    let mut ys = vec![50.0; 20];
    ys[0] = f64::NAN;
    let input = series(&ys, 10.0);
    let out = moving_average(&input, 10.0, 500.0);

    assert_eq!(out.len(), 16);
    assert!(out[0].y.is_nan());
    for (k, p) in out.iter().enumerate().skip(1) {
        let naive = input[k..k + 5].iter().map(|p| p.y).sum::<f64>() / 5.0;
        assert_eq!(p.y, naive, "window {}", k);
    }
    assert_eq!(out.last().map(|p| p.y), Some(50.0));
}
