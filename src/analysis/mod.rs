//! Derived telemetry for a suspension channel.
//!
//! Everything the run view draws besides the raw travel line is computed
//! here: the dynamic-sag baseline ([`filters`]) and the travel distribution
//! ([`histogram`]). Results are plain data and are computed once per loaded
//! run, then recomputed only when the telemetry configuration changes.

pub mod filters;
pub mod histogram;

use std::time::Instant;

use crate::normalize::Normalizer;
use crate::parsers::types::{ChannelTelemetry, RunTelemetry, SuspensionChannel};
use crate::series::{build_channel_series, NormalizedPoint};
use crate::settings::TelemetryConfig;

pub use filters::{moving_average, window_size, SagFilter};
pub use histogram::{build_histogram, HistogramBin, HistogramSummary};

/// Metadata about a computation, for logs and the inspect tool
#[derive(Clone, Debug, Default)]
pub struct AnalysisMetadata {
    /// Name of the algorithm used
    pub algorithm: String,
    /// Key parameters and their values
    pub parameters: Vec<(String, String)>,
    /// Warning messages about the analysis
    pub warnings: Vec<String>,
    /// Time taken for computation in milliseconds
    pub computation_time_ms: u64,
}

impl AnalysisMetadata {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// `key=value` pairs, comma separated
    pub fn parameter_summary(&self) -> String {
        self.parameters
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Derived data for one suspension channel
#[derive(Clone, Debug, Default)]
pub struct ChannelAnalysis {
    pub channel: Option<SuspensionChannel>,
    /// Normalized travel line
    pub series: Vec<NormalizedPoint>,
    /// Dynamic sag baseline; empty when the channel is shorter than the window
    pub sag: Vec<NormalizedPoint>,
    pub bins: Vec<HistogramBin>,
    pub summary: HistogramSummary,
    pub metadata: AnalysisMetadata,
}

impl ChannelAnalysis {
    /// True when there is no travel line to draw
    pub fn has_data(&self) -> bool {
        !self.series.is_empty()
    }
}

/// Derived data for both channels of a run
#[derive(Clone, Debug, Default)]
pub struct RunAnalysis {
    pub front: ChannelAnalysis,
    pub rear: ChannelAnalysis,
}

impl RunAnalysis {
    pub fn channel(&self, channel: SuspensionChannel) -> &ChannelAnalysis {
        match channel {
            SuspensionChannel::Front => &self.front,
            SuspensionChannel::Rear => &self.rear,
        }
    }
}

/// Run `f` and report how long it took in milliseconds
pub fn timed_analyze<F, T>(f: F) -> (T, u64)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed().as_millis() as u64;
    (result, elapsed)
}

/// Compute the travel line, sag baseline and histogram for a channel
pub fn analyze_channel(
    channel: SuspensionChannel,
    telemetry: &ChannelTelemetry,
    config: &TelemetryConfig,
) -> ChannelAnalysis {
    let normalizer = Normalizer::from_config(config);
    let filter = SagFilter::from_config(config);

    let ((series, sag, (bins, summary)), computation_time_ms) = timed_analyze(|| {
        let series =
            build_channel_series(&telemetry.data, telemetry.frequency, &normalizer);
        let sag = filter.apply(&series, telemetry.frequency);
        let histogram = build_histogram(telemetry.data.readings(), &normalizer, config.bin_count);
        (series, sag, histogram)
    });

    let mut warnings = Vec::new();
    if telemetry.data.is_empty() {
        warnings.push(format!("{} channel is {}", channel.label(), telemetry.data.status()));
    } else if sag.is_empty() {
        warnings.push(format!(
            "{} samples is shorter than the {} sample sag window",
            series.len(),
            filter.window_size(telemetry.frequency)
        ));
    }
    if summary.non_finite > 0 {
        warnings.push(format!("{} non-finite samples", summary.non_finite));
    }

    for warning in &warnings {
        tracing::debug!("{}: {}", channel, warning);
    }

    ChannelAnalysis {
        channel: Some(channel),
        series,
        sag,
        bins,
        summary,
        metadata: AnalysisMetadata {
            algorithm: "Dynamic sag".to_string(),
            parameters: vec![
                ("frequency".to_string(), telemetry.frequency.to_string()),
                ("window_ms".to_string(), config.window_ms.to_string()),
                ("max_travel".to_string(), config.max_travel.to_string()),
                ("bin_count".to_string(), config.bin_count.to_string()),
            ],
            warnings,
            computation_time_ms,
        },
    }
}

/// Compute derived data for both channels of a run
pub fn analyze_run(run: &RunTelemetry, config: &TelemetryConfig) -> RunAnalysis {
    RunAnalysis {
        front: analyze_channel(SuspensionChannel::Front, &run.front, config),
        rear: analyze_channel(SuspensionChannel::Rear, &run.rear, config),
    }
}
