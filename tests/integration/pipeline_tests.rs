//! Run document bytes through parsing, analysis and the chart models

use travelog::analysis::analyze_run;
use travelog::chart::{DualViewChart, HistogramOptions, HistogramView, LineChartOptions};
use travelog::parsers::parse_run;
use travelog::series::NormalizedPoint;
use travelog::settings::{SourceConfig, TelemetryConfig, UserSettings};

use crate::common::{run_bytes, synthetic};

#[test]
fn test_linear_ramp_pipeline() {
    let config = TelemetryConfig::default();
    let bytes = run_bytes(&[0.0, 256.0, 512.0, 768.0, 1024.0], &[], 1.0, 1.0);
    let run = parse_run(&bytes, &config).unwrap();
    let analysis = analyze_run(&run, &config);

    assert_eq!(
        analysis.front.series,
        vec![
            NormalizedPoint::new(0.0, 100.0),
            NormalizedPoint::new(1.0, 75.0),
            NormalizedPoint::new(2.0, 50.0),
            NormalizedPoint::new(3.0, 25.0),
            NormalizedPoint::new(4.0, 0.0),
        ]
    );
    // At 1 Hz the 500 ms window rounds down to a single sample
    assert_eq!(analysis.front.sag.len(), 5);
    assert!(analysis.rear.bins.is_empty());
}

#[test]
fn test_constant_run_sag() {
    let config = TelemetryConfig::default();
    let bytes = run_bytes(&synthetic::constant(10, 512.0), &synthetic::constant(10, 512.0), 10.0, 10.0);
    let run = parse_run(&bytes, &config).unwrap();
    let analysis = analyze_run(&run, &config);

    assert_eq!(analysis.front.sag.len(), 6);
    assert!(analysis.front.sag.iter().all(|p| (p.y - 50.0).abs() < 1e-9));
    assert_eq!(analysis.front.sag[0].x, 0.4 - 0.25);
}

#[test]
fn test_extremes_histogram_pipeline() {
    let config = TelemetryConfig::default();
    let bytes = run_bytes(&[0.0, 1024.0], &[], 100.0, 100.0);
    let analysis = analyze_run(&parse_run(&bytes, &config).unwrap(), &config);

    let non_zero: Vec<_> = analysis.front.bins.iter().filter(|b| b.count > 0).collect();
    assert_eq!(non_zero.len(), 2);
    assert_eq!(non_zero[0].x0, 0.0);
    assert_eq!(non_zero[1].x1, 100.0);
    assert!(non_zero.iter().all(|b| b.percent == 50.0));
}

#[test]
fn test_analysis_feeds_both_charts() {
    let config = TelemetryConfig::default();
    let bytes = run_bytes(
        &synthetic::sine(3000, 1024.0, 200),
        &synthetic::sine(1500, 1024.0, 100),
        100.0,
        50.0,
    );
    let analysis = analyze_run(&parse_run(&bytes, &config).unwrap(), &config);

    let mut chart = DualViewChart::new();
    let series = [
        analysis.front.series.as_slice(),
        analysis.rear.series.as_slice(),
        analysis.front.sag.as_slice(),
        analysis.rear.sag.as_slice(),
    ];
    let stats = chart.render(&series, &LineChartOptions::default().with_height(300.0), 900.0);
    assert_eq!(stats.entered, 4);
    assert_eq!(chart.x2.domain, (0.0, 29.99));
    assert!(chart.paths().iter().all(|p| !p.context.is_empty()));

    let mut histogram = HistogramView::new();
    histogram.render(&analysis.front.bins, &HistogramOptions::default(), 450.0);
    histogram.tick(1.0);
    assert!(!histogram.is_empty());
    assert_eq!(histogram.bars().len(), config.bin_count);
}

#[test]
fn test_custom_bin_count() {
    let config = TelemetryConfig {
        bin_count: 10,
        ..Default::default()
    };
    let bytes = run_bytes(&synthetic::ramp(100, 1024.0), &[], 100.0, 100.0);
    let analysis = analyze_run(&parse_run(&bytes, &config).unwrap(), &config);
    assert_eq!(analysis.front.bins.len(), 10);
    assert_eq!(analysis.front.bins.iter().map(|b| b.count).sum::<usize>(), 100);
}

#[test]
fn test_settings_round_trip() {
    let settings = UserSettings {
        telemetry: TelemetryConfig {
            max_travel: 2048.0,
            window_ms: 250.0,
            bin_count: 40,
            default_frequency: 500.0,
        },
        source: SourceConfig::Directory("/data/runs".into()),
        color_blind_mode: true,
        ..Default::default()
    };
    let json = serde_json::to_string(&settings).unwrap();
    let loaded = UserSettings::from_json(&json);

    assert_eq!(loaded.telemetry, settings.telemetry);
    assert_eq!(loaded.source, settings.source);
    assert!(loaded.color_blind_mode);
}

#[test]
fn test_corrupt_or_partial_settings() {
    let loaded = UserSettings::from_json("{ not json");
    assert_eq!(loaded.telemetry, TelemetryConfig::default());

    let partial = UserSettings::from_json(r#"{"telemetry": {"window_ms": 1000}}"#);
    assert_eq!(partial.telemetry.window_ms, 1000.0);
    assert_eq!(partial.telemetry.max_travel, 1024.0);
    assert!(!partial.color_blind_mode);
}
