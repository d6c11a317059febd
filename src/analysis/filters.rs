//! Dynamic sag filter.
//!
//! A fixed-time-window moving average over a normalized travel series. The
//! window is defined in milliseconds, so runs sampled at different rates get
//! the same smoothing in time.

use crate::series::NormalizedPoint;
use crate::settings::TelemetryConfig;

/// Number of samples covered by a `window_ms` window at `freq` Hz (at least 1)
pub fn window_size(window_ms: f64, freq: f64) -> usize {
    let samples = (window_ms / 1000.0 * freq).floor();
    if samples.is_finite() && samples >= 1.0 {
        samples as usize
    } else {
        1
    }
}

/// Centered moving average of a travel series.
///
/// Output point `k` averages `series[k..k + w]` and is placed half a window
/// before the time of its last sample. Returns `n - w + 1` points, or none
/// when the series is shorter than the window.
///
/// The running sum only carries finite values. A window holding a NaN or
/// infinity is summed directly, so a bad sample affects exactly the windows
/// that contain it.
pub fn moving_average(series: &[NormalizedPoint], freq: f64, window_ms: f64) -> Vec<NormalizedPoint> {
    let w = window_size(window_ms, freq);
    if series.len() < w {
        return vec![];
    }

    let half_window = window_ms / 1000.0 / 2.0;
    let finite = |y: f64| if y.is_finite() { y } else { 0.0 };

    let mut result = Vec::with_capacity(series.len() - w + 1);
    let mut sum = 0.0;
    let mut non_finite = 0usize;
    for point in &series[..w] {
        sum += finite(point.y);
        non_finite += usize::from(!point.y.is_finite());
    }

    for end in (w - 1)..series.len() {
        if end >= w {
            let (entering, leaving) = (series[end].y, series[end - w].y);
            sum += finite(entering) - finite(leaving);
            non_finite += usize::from(!entering.is_finite());
            non_finite -= usize::from(!leaving.is_finite());
        }

        let y = if non_finite == 0 {
            sum / w as f64
        } else {
            series[end + 1 - w..=end].iter().map(|p| p.y).sum::<f64>() / w as f64
        };
        result.push(NormalizedPoint::new(series[end].x - half_window, y));
    }

    result
}

/// Moving-average filter bound to a window length
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SagFilter {
    pub window_ms: f64,
}

impl Default for SagFilter {
    fn default() -> Self {
        Self::from_config(&TelemetryConfig::default())
    }
}

impl SagFilter {
    pub fn new(window_ms: f64) -> Self {
        Self { window_ms }
    }

    pub fn from_config(config: &TelemetryConfig) -> Self {
        Self::new(config.window_ms)
    }

    pub fn window_size(&self, freq: f64) -> usize {
        window_size(self.window_ms, freq)
    }

    pub fn apply(&self, series: &[NormalizedPoint], freq: f64) -> Vec<NormalizedPoint> {
        moving_average(series, freq, self.window_ms)
    }
}
