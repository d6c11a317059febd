//! Tests for the focus + context chart and the histogram view

use travelog::analysis::{build_histogram, HistogramBin};
use travelog::chart::{
    BrushEvent, BrushPhase, ChartState, DualViewChart, EventSource, HistogramOptions,
    HistogramView, LineChartOptions,
};
use travelog::normalize::Normalizer;
use travelog::parsers::RawReading;
use travelog::series::{build_series, NormalizedPoint};
use travelog::state::{HISTOGRAM_ENTER_SECS, HISTOGRAM_EXIT_SECS};

use crate::common::synthetic;

fn travel(raw: &[f64], freq: f64) -> Vec<NormalizedPoint> {
    let readings: Vec<RawReading> = raw.iter().map(|&v| RawReading::Value(v)).collect();
    build_series(&readings, freq, &Normalizer::default())
}

fn bins(raw: &[f64]) -> Vec<HistogramBin> {
    let readings: Vec<RawReading> = raw.iter().map(|&v| RawReading::Value(v)).collect();
    build_histogram(&readings, &Normalizer::default(), 20).0
}

// ============================================
// Focus + context
// ============================================

#[test]
fn test_context_always_shows_full_run() {
    let mut chart = DualViewChart::new();
    let front = travel(&synthetic::sine(600, 1024.0, 50), 100.0);
    chart.render(&[front], &LineChartOptions::default(), 800.0);

    let (a, b) = (chart.x2.apply(1.0), chart.x2.apply(2.0));
    chart.handle_brush(BrushEvent::user(BrushPhase::End, Some((a, b))));

    assert_eq!(chart.x2.domain, (0.0, 5.99));
    let (lo, hi) = chart.x.domain;
    assert!((lo - 1.0).abs() < 1e-3 && (hi - 2.0).abs() < 1e-3);
}

#[test]
fn test_reversed_drag_selects_same_window() {
    let mut chart = DualViewChart::new();
    chart.render(&[travel(&synthetic::ramp(101, 1024.0), 10.0)], &LineChartOptions::default(), 1000.0);

    let (a, b) = (chart.x2.apply(2.0), chart.x2.apply(6.0));
    chart.handle_brush(BrushEvent::user(BrushPhase::Move, Some((b, a))));
    let (lo, hi) = chart.x.domain;
    assert!(lo < hi);
    assert!((lo - 2.0).abs() < 1e-3 && (hi - 6.0).abs() < 1e-3);
}

#[test]
fn test_zero_width_brush_clears() {
    let mut chart = DualViewChart::new();
    chart.render(&[travel(&synthetic::ramp(101, 1024.0), 10.0)], &LineChartOptions::default(), 1000.0);
    chart.zoom_to(Some((2.0, 4.0)));

    chart.handle_brush(BrushEvent::user(BrushPhase::End, Some((300.0, 300.0))));
    assert_eq!(chart.brush(), None);
    assert_eq!(chart.x.domain, (0.0, 10.0));
}

#[test]
fn test_brush_before_render_is_ignored() {
    let mut chart = DualViewChart::new();
    let changed = chart.handle_brush(BrushEvent::user(BrushPhase::End, Some((10.0, 50.0))));
    assert!(!changed);
    assert_eq!(chart.state(), ChartState::Uninitialized);
}

#[test]
fn test_programmatic_zoom_then_user_brush() {
    let mut chart = DualViewChart::new();
    chart.render(&[travel(&synthetic::ramp(101, 1024.0), 10.0)], &LineChartOptions::default(), 1000.0);

    chart.zoom_to(Some((1.0, 3.0)));
    let echoed = BrushEvent {
        selection: chart.brush_pixels(),
        phase: BrushPhase::End,
        source: EventSource::Programmatic,
    };
    assert!(!chart.handle_brush(echoed));
    assert_eq!(chart.x.domain, (1.0, 3.0));

    chart.zoom_to(None);
    assert_eq!(chart.x.domain, (0.0, 10.0));
}

#[test]
fn test_two_channels_and_sag_overlays() {
    let mut chart = DualViewChart::new();
    let front = travel(&synthetic::constant(100, 512.0), 100.0);
    let rear = travel(&synthetic::constant(50, 256.0), 50.0);
    let empty: Vec<NormalizedPoint> = vec![];

    let stats = chart.render(
        &[front.as_slice(), rear.as_slice(), empty.as_slice(), empty.as_slice()],
        &LineChartOptions::default().with_height(300.0),
        800.0,
    );
    assert_eq!(stats.entered, 4);
    assert!(chart.paths()[2].focus.is_empty());
    assert_eq!(chart.x2.domain, (0.0, 0.99));
}

// ============================================
// Histogram view
// ============================================

#[test]
fn test_histogram_animation_settles_without_orphans() {
    let mut view = HistogramView::new();
    let options = HistogramOptions::default();

    view.render(&bins(&synthetic::sine(500, 1024.0, 40)), &options, 400.0);
    view.tick(HISTOGRAM_ENTER_SECS / 2.0);
    view.render(&bins(&[0.0, 1024.0]), &options, 400.0);
    view.render(&[], &options, 400.0);

    view.tick(HISTOGRAM_ENTER_SECS.max(HISTOGRAM_EXIT_SECS));
    assert!(view.bars().is_empty());
    assert!(!view.is_animating());
    assert!(view.is_empty());
}

#[test]
fn test_histogram_resize_mid_animation() {
    let mut view = HistogramView::new();
    view.render(&bins(&[0.0, 1024.0]), &HistogramOptions::default(), 400.0);
    view.tick(HISTOGRAM_ENTER_SECS / 3.0);
    let value = view.bars()[0].value();

    view.resize(800.0);
    assert_eq!(view.bars()[0].value(), value);
    assert!(view.inner_rect().width() > 700.0);
}

#[test]
fn test_histogram_hover_reports_bin() {
    let mut view = HistogramView::new();
    view.render(&bins(&[0.0, 0.0, 0.0, 1024.0]), &HistogramOptions::default(), 440.0);
    view.tick(1.0);

    let last = *view.bars().last().unwrap();
    let tooltip = view.hover(view.bar_rect(&last).center()).unwrap();
    assert_eq!(tooltip.count, 3);
    assert_eq!(tooltip.range_label(), "Range: 95 - 100");
    assert_eq!(tooltip.percent, 75.0);
}
