//! Focus + context line chart.
//!
//! The chart owns its scales and the per-series paths. The top (focus)
//! panel shows the brushed time window; the bottom (context) panel always
//! shows the full run and carries the brush. Paths are kept in data space,
//! already windowed and downsampled, and the plotting widget draws them
//! as-is. Panel frames and the x scales map the brush between pixels and
//! data, so the whole interaction model can be exercised without a window.

use eframe::egui::{Color32, Rect};

use super::downsample::{downsample_segments, finite_segments};
use super::scale::LinearScale;
use super::Margins;
use crate::series::NormalizedPoint;
use crate::state::{
    BRUSH_HANDLE_PX, CONTEXT_MARGIN_BOTTOM, CONTEXT_TOP_OFFSET, FOCUS_MARGIN, LINE_CHART_HEIGHT,
    MAX_CHART_POINTS,
};

/// Lifecycle of a chart instance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartState {
    /// Nothing allocated yet
    Uninitialized,
    /// Scales and brush exist, nothing drawn
    Initialized,
    /// Paths drawn, idle
    Rendered,
    /// A brush gesture is in progress
    Interacting,
}

/// Who caused a brush event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventSource {
    /// Pointer gesture in the context panel
    User,
    /// Emitted as a side effect of a programmatic zoom
    Programmatic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushPhase {
    Start,
    Move,
    End,
}

/// A brush change in context-panel pixel space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushEvent {
    /// Selected pixel interval, or `None` when the brush was cleared
    pub selection: Option<(f32, f32)>,
    pub phase: BrushPhase,
    pub source: EventSource,
}

impl BrushEvent {
    pub fn user(phase: BrushPhase, selection: Option<(f32, f32)>) -> Self {
        Self {
            selection,
            phase,
            source: EventSource::User,
        }
    }
}

/// What a press in the context panel takes hold of
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushGrab {
    /// Outside the brush: draw a new selection
    New,
    /// Inside the brush: move it
    Body,
    /// Left edge: resize from the left
    Lower,
    /// Right edge: resize from the right
    Upper,
}

/// A brush gesture in progress, in context-panel pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushDrag {
    pub grab: BrushGrab,
    /// Where the press landed
    origin: f32,
    /// Brush extent when the press landed
    start: Option<(f32, f32)>,
    /// Latest pointer position, clamped to the panel
    current: f32,
}

impl BrushDrag {
    pub fn current(&self) -> f32 {
        self.current
    }

    /// The selection this gesture describes, kept inside `[left, right]`
    fn selection(&self, left: f32, right: f32) -> (f32, f32) {
        match (self.grab, self.start) {
            (BrushGrab::Body, Some((a, b))) => {
                let delta = (self.current - self.origin).clamp(left - a, right - b);
                (a + delta, b + delta)
            }
            (BrushGrab::Lower, Some((_, b))) => (self.current, b),
            (BrushGrab::Upper, Some((a, _))) => (a, self.current),
            _ => (self.origin, self.current),
        }
    }
}

/// Stroke for one series, applied in both panels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    /// Series name shown on hover
    pub name: &'static str,
    pub color: Color32,
    pub width: f32,
    pub dashed: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            name: "",
            color: Color32::GRAY,
            width: 1.5,
            dashed: false,
        }
    }
}

type StyleFn = Box<dyn Fn(usize) -> LineStyle>;

/// Render options
pub struct LineChartOptions {
    /// Value domain of both panels
    pub y_domain: (f64, f64),
    /// Total chart height in pixels, both panels included
    pub height: f32,
    style: StyleFn,
}

impl Default for LineChartOptions {
    fn default() -> Self {
        Self {
            y_domain: (0.0, 100.0),
            height: LINE_CHART_HEIGHT,
            style: Box::new(|_| LineStyle::default()),
        }
    }
}

impl LineChartOptions {
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn with_y_domain(mut self, min: f64, max: f64) -> Self {
        self.y_domain = (min, max);
        self
    }

    /// Per-series style, keyed by series index
    pub fn with_style(mut self, style: impl Fn(usize) -> LineStyle + 'static) -> Self {
        self.style = Box::new(style);
        self
    }

    pub fn style(&self, index: usize) -> LineStyle {
        (self.style)(index)
    }
}

/// One drawn series
#[derive(Clone, Debug, Default)]
pub struct SeriesPath {
    pub index: usize,
    pub style: LineStyle,
    /// Finite stretches of the series, data space, full resolution
    segments: Vec<Vec<NormalizedPoint>>,
    /// Whether every stretch is sorted by x (allows slicing to the window)
    sorted: bool,
    /// Polylines in the focus panel: the brushed window, downsampled
    pub focus: Vec<Vec<NormalizedPoint>>,
    /// Polylines in the context panel: the whole series, downsampled
    pub context: Vec<Vec<NormalizedPoint>>,
}

impl SeriesPath {
    fn set_data(&mut self, series: &[NormalizedPoint]) {
        self.segments = finite_segments(series).into_iter().map(<[_]>::to_vec).collect();
        self.sorted = self
            .segments
            .iter()
            .all(|s| s.windows(2).all(|w| w[0].x <= w[1].x));
    }

    fn max_x(&self) -> Option<f64> {
        self.segments
            .iter()
            .flatten()
            .map(|p| p.x)
            .fold(None, |acc, x| Some(acc.map_or(x, |m: f64| m.max(x))))
    }

    /// Points of each stretch inside `[lo, hi]` plus one neighbour each side
    fn visible(&self, lo: f64, hi: f64) -> Vec<NormalizedPoint> {
        let mut out = Vec::new();
        for segment in &self.segments {
            let slice = if self.sorted {
                let start = segment.partition_point(|p| p.x < lo).saturating_sub(1);
                let end = (segment.partition_point(|p| p.x <= hi) + 1).min(segment.len());
                &segment[start..end.max(start)]
            } else {
                &segment[..]
            };
            if slice.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(NormalizedPoint::new(f64::NAN, f64::NAN));
            }
            out.extend_from_slice(slice);
        }
        out
    }
}

/// Enter/update/exit counts of a render pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// Focus + context chart with a brush on the context panel
pub struct DualViewChart {
    state: ChartState,
    width: f32,
    height: f32,
    /// Focus x
    pub x: LinearScale,
    /// Focus y
    pub y: LinearScale,
    /// Context x (always the full domain)
    pub x2: LinearScale,
    /// Context y
    pub y2: LinearScale,
    /// Focus panel frame in pixels
    focus_frame: Rect,
    /// Context panel frame in pixels; also the brush extent
    context_frame: Rect,
    /// Brushed data interval; `None` shows the full domain
    brush: Option<(f64, f64)>,
    paths: Vec<SeriesPath>,
}

impl Default for DualViewChart {
    fn default() -> Self {
        Self::new()
    }
}

impl DualViewChart {
    pub fn new() -> Self {
        Self {
            state: ChartState::Uninitialized,
            width: 0.0,
            height: LINE_CHART_HEIGHT,
            x: LinearScale::default(),
            y: LinearScale::default(),
            x2: LinearScale::default(),
            y2: LinearScale::default(),
            focus_frame: Rect::NOTHING,
            context_frame: Rect::NOTHING,
            brush: None,
            paths: Vec::new(),
        }
    }

    pub fn state(&self) -> ChartState {
        self.state
    }

    pub fn paths(&self) -> &[SeriesPath] {
        &self.paths
    }

    /// The brushed data interval
    pub fn brush(&self) -> Option<(f64, f64)> {
        self.brush
    }

    /// Brush extent in context-panel pixels, for drawing the selection
    pub fn brush_pixels(&self) -> Option<(f32, f32)> {
        self.brush.map(|(lo, hi)| (self.x2.apply(lo), self.x2.apply(hi)))
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Top-left panel margins; the context panel starts `CONTEXT_TOP_OFFSET`
    /// above the bottom edge.
    pub fn context_margins(&self) -> Margins {
        Margins {
            top: self.height - CONTEXT_TOP_OFFSET,
            right: FOCUS_MARGIN.right,
            bottom: CONTEXT_MARGIN_BOTTOM,
            left: FOCUS_MARGIN.left,
        }
    }

    /// Focus panel frame. Chart-local from the margins until [`Self::place`]
    /// moves it to where the widget drew the panel.
    pub fn focus_rect(&self) -> Rect {
        self.focus_frame
    }

    /// Context panel frame; also the brush extent
    pub fn context_rect(&self) -> Rect {
        self.context_frame
    }

    /// Use the frames the panels were actually drawn in. Only pixel ranges
    /// change; domains, paths and the brush stay.
    pub fn place(&mut self, focus: Rect, context: Rect) {
        self.focus_frame = focus;
        self.context_frame = context;
        self.apply_frames();
    }

    /// One-time setup. Further calls are no-ops.
    pub fn initialize(&mut self) {
        if self.state != ChartState::Uninitialized {
            return;
        }
        self.brush = None;
        self.paths.clear();
        self.state = ChartState::Initialized;
        tracing::debug!("Line chart initialized");
    }

    /// Lay the panels out from the margins
    fn update_ranges(&mut self) {
        self.focus_frame = FOCUS_MARGIN.inner(self.width, self.height);
        self.context_frame = self.context_margins().inner(self.width, self.height);
        self.apply_frames();
    }

    fn apply_frames(&mut self) {
        let (focus, context) = (self.focus_frame, self.context_frame);
        self.x.set_range(focus.left(), focus.right());
        self.y.set_range(focus.bottom(), focus.top());
        self.x2.set_range(context.left(), context.right());
        self.y2.set_range(context.bottom(), context.top());
    }

    /// Full x domain `[0, max x]` from the current paths
    fn full_domain(&self) -> (f64, f64) {
        let max = self
            .paths
            .iter()
            .filter_map(SeriesPath::max_x)
            .fold(0.0f64, f64::max);
        (0.0, max)
    }

    /// Focus domain implied by the brush, clamped to the full domain
    fn apply_brush(&mut self) {
        let (lo, hi) = self.x2.domain;
        self.brush = self
            .brush
            .map(|(a, b)| (a.max(lo), b.min(hi)))
            .filter(|(a, b)| b > a);
        let (a, b) = self.brush.unwrap_or((lo, hi));
        self.x.set_domain(a, b);
    }

    fn redraw_focus(&mut self) {
        let (lo, hi) = self.x.domain;
        for path in &mut self.paths {
            let visible = path.visible(lo, hi);
            path.focus = downsample_segments(&visible, MAX_CHART_POINTS);
        }
    }

    fn redraw_context(&mut self) {
        for path in &mut self.paths {
            let all: Vec<NormalizedPoint> = path.visible(f64::NEG_INFINITY, f64::INFINITY);
            path.context = downsample_segments(&all, MAX_CHART_POINTS);
        }
    }

    /// Draw `series` at `width` pixels.
    ///
    /// Paths are joined by index: existing paths are updated in place, extra
    /// series enter, missing ones exit. The brush survives, clamped to the
    /// new data extent.
    pub fn render<S: AsRef<[NormalizedPoint]>>(
        &mut self,
        series: &[S],
        options: &LineChartOptions,
        width: f32,
    ) -> JoinStats {
        self.initialize();

        self.width = width.max(0.0);
        self.height = options.height;
        self.update_ranges();

        let previous = self.paths.len();
        let stats = JoinStats {
            entered: series.len().saturating_sub(previous),
            updated: series.len().min(previous),
            exited: previous.saturating_sub(series.len()),
        };

        self.paths.truncate(series.len());
        for (index, data) in series.iter().enumerate() {
            if index == self.paths.len() {
                self.paths.push(SeriesPath {
                    index,
                    ..Default::default()
                });
            }
            let path = &mut self.paths[index];
            path.style = options.style(index);
            path.set_data(data.as_ref());
        }

        let (lo, hi) = self.full_domain();
        let (ylo, yhi) = options.y_domain;
        self.x2.set_domain(lo, hi);
        self.y.set_domain(ylo, yhi);
        self.y2.set_domain(ylo, yhi);
        self.apply_brush();

        self.redraw_context();
        self.redraw_focus();

        if self.state == ChartState::Initialized {
            self.state = ChartState::Rendered;
        }
        stats
    }

    /// Recompute pixel ranges for a new width, keeping domains and the brush
    pub fn resize(&mut self, width: f32) {
        if self.state == ChartState::Uninitialized || width == self.width {
            return;
        }
        self.width = width.max(0.0);
        self.update_ranges();
    }

    /// Feed a brush event. Returns whether the focus view changed.
    ///
    /// Programmatic events are ignored so that zooming from code cannot
    /// loop back through the brush.
    pub fn handle_brush(&mut self, event: BrushEvent) -> bool {
        if event.source == EventSource::Programmatic {
            return false;
        }
        if self.state == ChartState::Uninitialized || self.state == ChartState::Initialized {
            return false;
        }

        match event.phase {
            BrushPhase::Start => self.state = ChartState::Interacting,
            BrushPhase::End => self.state = ChartState::Rendered,
            BrushPhase::Move => {}
        }

        let brush = event.selection.and_then(|(a, b)| {
            let (a, b) = (a.min(b), a.max(b));
            (b > a).then(|| (self.x2.invert(a), self.x2.invert(b)))
        });
        if brush == self.brush {
            return false;
        }

        self.brush = brush;
        self.apply_brush();
        self.redraw_focus();
        true
    }

    /// Set the focus window from code. `None` shows everything.
    pub fn zoom_to(&mut self, window: Option<(f64, f64)>) {
        self.brush = window.map(|(a, b)| (a.min(b), a.max(b)));
        if self.state != ChartState::Uninitialized {
            self.apply_brush();
            self.redraw_focus();
        }
    }

    /// What a press at `x` pixels would grab, or `None` outside the context
    /// panel. Edges win over the body so a narrow brush stays resizable.
    pub fn grab_at(&self, x: f32) -> Option<BrushGrab> {
        let (left, right) = self.x2.range_extent();
        if self.state == ChartState::Uninitialized || x < left || x > right {
            return None;
        }
        let Some((a, b)) = self.brush_pixels() else {
            return Some(BrushGrab::New);
        };
        let (lo, hi) = (a.min(b), a.max(b));
        let (to_lo, to_hi) = ((x - lo).abs(), (x - hi).abs());
        if to_lo.min(to_hi) <= BRUSH_HANDLE_PX {
            Some(if to_lo <= to_hi {
                BrushGrab::Lower
            } else {
                BrushGrab::Upper
            })
        } else if x > lo && x < hi {
            Some(BrushGrab::Body)
        } else {
            Some(BrushGrab::New)
        }
    }

    /// Start a brush gesture with a press at `x` pixels
    pub fn begin_drag(&mut self, x: f32) -> Option<BrushDrag> {
        let grab = self.grab_at(x)?;
        let start = self.brush_pixels().map(|(a, b)| (a.min(b), a.max(b)));
        self.handle_brush(BrushEvent::user(BrushPhase::Start, start));
        Some(BrushDrag {
            grab,
            origin: x,
            start,
            current: x,
        })
    }

    /// Move a gesture's pointer to `x` pixels and feed the resulting
    /// selection as a `phase` event. Returns whether the focus view changed.
    pub fn update_drag(&mut self, drag: &mut BrushDrag, x: f32, phase: BrushPhase) -> bool {
        let (left, right) = self.x2.range_extent();
        drag.current = x.clamp(left, right);
        let selection = drag.selection(left, right);
        self.handle_brush(BrushEvent::user(phase, Some(selection)))
    }
}
