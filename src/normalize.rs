//! Travel normalization.
//!
//! Maps raw linear-displacement readings onto percentage of maximum
//! suspension travel so runs recorded with different sensors can be compared
//! on one axis. The sensor reads its maximum value at full extension, so a
//! reading of 0 is 100% and `max_travel` is 0%.

use crate::settings::TelemetryConfig;

/// Raw displacement to travel-percentage mapping
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalizer {
    max_travel: f64,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_config(&TelemetryConfig::default())
    }
}

impl Normalizer {
    pub fn new(max_travel: f64) -> Self {
        Self { max_travel }
    }

    pub fn from_config(config: &TelemetryConfig) -> Self {
        Self::new(config.max_travel)
    }

    pub fn max_travel(&self) -> f64 {
        self.max_travel
    }

    /// `100 - (raw / max_travel) * 100`.
    ///
    /// Not clamped: readings outside `[0, max_travel]` land outside
    /// `[0, 100]`, and non-finite readings stay non-finite so sensor faults
    /// remain visible downstream.
    #[inline]
    pub fn normalize(&self, raw: f64) -> f64 {
        100.0 - (raw / self.max_travel) * 100.0
    }
}
