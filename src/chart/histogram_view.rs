//! Animated histogram bars with hover.
//!
//! Bars are joined to bins by index. Heights animate in count units, so a
//! resize mid-transition only changes the pixel mapping, not the animation.

use eframe::egui::{pos2, Pos2, Rect};

use super::scale::LinearScale;
use crate::analysis::histogram::{HistogramBin, DOMAIN_MAX, DOMAIN_MIN};
use crate::state::{HISTOGRAM_ENTER_SECS, HISTOGRAM_EXIT_SECS, HISTOGRAM_HEIGHT, HISTOGRAM_MARGIN};

/// Cubic ease-out on `t` in `[0, 1]`
pub fn ease_cubic_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) - 1.0;
    t * t * t + 1.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarPhase {
    /// Growing towards its count (new bars and retargeted bars)
    Entering,
    /// At rest
    Steady,
    /// Shrinking to zero, removed when done
    Exiting,
}

/// One animated bar
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub bin: HistogramBin,
    pub phase: BarPhase,
    from: f64,
    to: f64,
    elapsed: f32,
    duration: f32,
}

impl Bar {
    fn entering(bin: HistogramBin) -> Self {
        Self {
            bin,
            phase: BarPhase::Entering,
            from: 0.0,
            to: bin.count as f64,
            elapsed: 0.0,
            duration: HISTOGRAM_ENTER_SECS,
        }
    }

    /// Current animated height, in counts
    pub fn value(&self) -> f64 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = ease_cubic_out(self.elapsed / self.duration) as f64;
        self.from + (self.to - self.from) * t
    }

    fn retarget(&mut self, bin: HistogramBin) {
        self.from = self.value();
        self.to = bin.count as f64;
        self.bin = bin;
        self.elapsed = 0.0;
        self.duration = HISTOGRAM_ENTER_SECS;
        self.phase = BarPhase::Entering;
    }

    fn exit(&mut self) {
        if self.phase == BarPhase::Exiting {
            return;
        }
        self.from = self.value();
        self.to = 0.0;
        self.elapsed = 0.0;
        self.duration = HISTOGRAM_EXIT_SECS;
        self.phase = BarPhase::Exiting;
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Hover tooltip contents
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub count: usize,
    pub x0: f64,
    pub x1: f64,
    pub percent: f64,
    /// Chart-local pointer position
    pub anchor: Pos2,
}

impl Tooltip {
    pub fn range_label(&self) -> String {
        format!("Range: {} - {}", self.x0, self.x1)
    }
}

/// Histogram render options
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistogramOptions {
    pub height: f32,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            height: HISTOGRAM_HEIGHT,
        }
    }
}

/// Animated bar chart over the travel domain
#[derive(Clone, Debug)]
pub struct HistogramView {
    width: f32,
    height: f32,
    pub x: LinearScale,
    pub y: LinearScale,
    bars: Vec<Bar>,
    /// Number of bars bound to data; bars past this index are exiting
    bound: usize,
    hovered: Option<usize>,
}

impl Default for HistogramView {
    fn default() -> Self {
        Self::new()
    }
}

impl HistogramView {
    pub fn new() -> Self {
        Self {
            width: 0.0,
            height: HISTOGRAM_HEIGHT,
            x: LinearScale::new((DOMAIN_MIN, DOMAIN_MAX), (0.0, 1.0)),
            y: LinearScale::new((0.0, 0.0), (1.0, 0.0)),
            bars: Vec::new(),
            bound: 0,
            hovered: None,
        }
    }

    /// Plot area, chart-local
    pub fn inner_rect(&self) -> Rect {
        HISTOGRAM_MARGIN.inner(self.width, self.height)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Index of the hovered bar
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// No bin has a count: draw the "No data" placeholder
    pub fn is_empty(&self) -> bool {
        self.bars[..self.bound].iter().all(|b| b.bin.count == 0)
    }

    /// Any bar still moving
    pub fn is_animating(&self) -> bool {
        self.bars.iter().any(|b| b.phase != BarPhase::Steady)
    }

    /// Bind new bins. Retained bars animate from their current height.
    pub fn render(&mut self, bins: &[HistogramBin], options: &HistogramOptions, width: f32) {
        self.width = width.max(0.0);
        self.height = options.height;

        let inner = self.inner_rect();
        self.x.set_range(inner.left(), inner.right());
        self.y.set_range(inner.bottom(), inner.top());

        // With nothing left to show, keep the old scale so the bars shrink
        // visibly instead of collapsing at once
        let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);
        if max_count > 0 || self.bars.is_empty() {
            self.y.set_domain(0.0, max_count as f64);
        }

        for (i, bin) in bins.iter().enumerate() {
            match self.bars.get_mut(i) {
                Some(bar) if bar.bin == *bin && bar.phase != BarPhase::Exiting => {}
                Some(bar) => bar.retarget(*bin),
                None => self.bars.push(Bar::entering(*bin)),
            }
        }
        for bar in self.bars.iter_mut().skip(bins.len()) {
            bar.exit();
        }
        self.bound = bins.len();

        if self.hovered.is_some_and(|i| i >= self.bound) {
            self.hovered = None;
        }
    }

    /// Recompute pixel ranges only
    pub fn resize(&mut self, width: f32) {
        self.width = width.max(0.0);
        let inner = self.inner_rect();
        self.x.set_range(inner.left(), inner.right());
        self.y.set_range(inner.bottom(), inner.top());
    }

    /// Advance animations by `dt` seconds; finished exits are removed
    pub fn tick(&mut self, dt: f32) {
        for bar in &mut self.bars {
            if bar.phase == BarPhase::Steady {
                continue;
            }
            bar.elapsed += dt;
            if bar.is_done() && bar.phase == BarPhase::Entering {
                bar.phase = BarPhase::Steady;
                bar.from = bar.to;
            }
        }

        let bound = self.bound;
        let mut index = 0;
        self.bars.retain(|bar| {
            let keep = index < bound || !bar.is_done();
            index += 1;
            keep
        });
    }

    /// Chart-local rectangle of a bar at its animated height
    pub fn bar_rect(&self, bar: &Bar) -> Rect {
        let left = self.x.apply(bar.bin.x0) + 1.0;
        let right = left.max(self.x.apply(bar.bin.x1));
        let inner = self.inner_rect();
        let bottom = inner.bottom();
        // Exiting bars may be taller than the new domain
        let top = self.y.apply(bar.value()).max(inner.top()).min(bottom);
        Rect::from_min_max(pos2(left, top), pos2(right, bottom))
    }

    /// Pointer moved to `pos` (chart-local). Returns the tooltip, if over a bar.
    pub fn hover(&mut self, pos: Pos2) -> Option<Tooltip> {
        self.hovered = self.bars[..self.bound]
            .iter()
            .position(|bar| self.bar_rect(bar).contains(pos));

        self.hovered.map(|i| {
            let bin = self.bars[i].bin;
            Tooltip {
                count: bin.count,
                x0: bin.x0,
                x1: bin.x1,
                percent: bin.percent,
                anchor: pos,
            }
        })
    }

    /// Pointer left the chart
    pub fn pointer_left(&mut self) {
        self.hovered = None;
    }
}
