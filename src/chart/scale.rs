//! Linear data-to-pixel scales.
//!
//! The chart models keep their own scales so that brush pixels can be
//! inverted to data space without a window. Ticks and grid lines are left
//! to the plotting widgets.

/// Maps a data interval onto a pixel interval.
///
/// The range may be inverted (`range.0 > range.1`), which is how y axes
/// grow upwards on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f32, f32),
}

impl Default for LinearScale {
    fn default() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
        }
    }
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn set_domain(&mut self, min: f64, max: f64) {
        self.domain = (min, max);
    }

    pub fn set_range(&mut self, start: f32, end: f32) {
        self.range = (start, end);
    }

    fn domain_span(&self) -> f64 {
        self.domain.1 - self.domain.0
    }

    /// Data value to pixel. A degenerate domain maps to the range start.
    pub fn apply(&self, value: f64) -> f32 {
        let span = self.domain_span();
        if span == 0.0 || !span.is_finite() {
            return self.range.0;
        }
        let t = (value - self.domain.0) / span;
        self.range.0 + (t * (self.range.1 - self.range.0) as f64) as f32
    }

    /// Pixel to data value
    pub fn invert(&self, pixel: f32) -> f64 {
        let span = (self.range.1 - self.range.0) as f64;
        if span == 0.0 {
            return self.domain.0;
        }
        let t = (pixel - self.range.0) as f64 / span;
        self.domain.0 + t * self.domain_span()
    }

    /// Pixel extent of the range, low to high
    pub fn range_extent(&self) -> (f32, f32) {
        (self.range.0.min(self.range.1), self.range.0.max(self.range.1))
    }
}
