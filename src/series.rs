//! Series building: raw channel readings to normalized time series.

use serde::Serialize;

use crate::normalize::Normalizer;
use crate::parsers::types::{ChannelData, RawReading};

/// A raw reading placed on the time axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StandardizedPoint {
    /// Seconds from the start of the run
    pub time: f64,
    /// Raw displacement
    pub val: f64,
}

/// A chart point: time in seconds, travel in percent
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Place readings on the time axis.
///
/// `time = index / freq` unless the reading carries an explicit timebase.
/// Index order is chronological order; nothing is re-sorted.
pub fn standardize(readings: &[RawReading], freq: f64) -> Vec<StandardizedPoint> {
    readings
        .iter()
        .enumerate()
        .map(|(i, reading)| StandardizedPoint {
            time: reading.timebase().unwrap_or(i as f64 / freq),
            val: reading.displacement(),
        })
        .collect()
}

/// Build the normalized line series for a channel.
///
/// Non-finite values are kept: line plots show acquisition faults as gaps.
pub fn build_series(
    readings: &[RawReading],
    freq: f64,
    normalizer: &Normalizer,
) -> Vec<NormalizedPoint> {
    standardize(readings, freq)
        .into_iter()
        .map(|p| NormalizedPoint::new(p.time, normalizer.normalize(p.val)))
        .collect()
}

/// Build the series for a channel slot; absent and invalid slots are empty
pub fn build_channel_series(
    data: &ChannelData,
    freq: f64,
    normalizer: &Normalizer,
) -> Vec<NormalizedPoint> {
    build_series(data.readings(), freq, normalizer)
}
