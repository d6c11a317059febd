//! Chart models.
//!
//! Window-independent state for the two chart kinds the run view draws:
//!
//! - [`dual_view`] - focus + context line chart with a brush
//! - [`histogram_view`] - animated travel histogram with hover
//!
//! The widgets in `ui` draw what these models hold and feed pointer
//! gestures back into them.

pub mod downsample;
pub mod dual_view;
pub mod histogram_view;
pub mod scale;

use eframe::egui::{pos2, Rect};

pub use dual_view::{
    BrushDrag, BrushEvent, BrushGrab, BrushPhase, ChartState, DualViewChart, EventSource, JoinStats, LineChartOptions,
    LineStyle,
};
pub use histogram_view::{HistogramOptions, HistogramView, Tooltip};
pub use scale::LinearScale;

/// Space between a chart's outer edge and its plot area, in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    /// Plot area of a `width` x `height` chart, in chart-local coordinates.
    /// Collapses to zero size rather than inverting when the chart is too small.
    pub fn inner(&self, width: f32, height: f32) -> Rect {
        let right = (width - self.right).max(self.left);
        let bottom = (height - self.bottom).max(self.top);
        Rect::from_min_max(pos2(self.left, self.top), pos2(right, bottom))
    }
}
