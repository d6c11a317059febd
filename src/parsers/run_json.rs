//! Run document parser.
//!
//! This is the validation boundary between the loosely-typed JSON stored by
//! the backend and the typed pipeline input. Unknown sections are ignored,
//! missing channels become [`ChannelData::Absent`] and bad frequencies fall
//! back to the configured default.

use strum::IntoEnumIterator;

use super::types::{
    ChannelTelemetry, ParseError, RunDocument, RunTelemetry, SuspensionChannel,
};
use crate::settings::TelemetryConfig;

/// Parse a run document from raw bytes
pub fn parse_document(bytes: &[u8]) -> Result<RunDocument, ParseError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Parse a run document and extract the suspension telemetry
pub fn parse_run(bytes: &[u8], config: &TelemetryConfig) -> Result<RunTelemetry, ParseError> {
    let document = parse_document(bytes)?;
    Ok(extract_telemetry(document, config))
}

/// Pick a usable sample frequency for a channel.
///
/// Frequencies that are missing, non-finite or not positive are replaced by
/// `default_frequency`.
pub fn resolve_frequency(recorded: Option<f64>, default_frequency: f64) -> f64 {
    match recorded {
        Some(freq) if freq.is_finite() && freq > 0.0 => freq,
        Some(freq) => {
            tracing::warn!(
                "Ignoring invalid sample frequency {}; using {} Hz",
                freq,
                default_frequency
            );
            default_frequency
        }
        None => default_frequency,
    }
}

/// Convert a parsed document into pipeline input
pub fn extract_telemetry(document: RunDocument, config: &TelemetryConfig) -> RunTelemetry {
    let RunDocument {
        data,
        suspension,
        metadata,
    } = document;

    let suspension = data.and_then(|d| d.suspension).or(suspension);
    let Some(mut suspension) = suspension else {
        tracing::warn!("Run document has no suspension section");
        return RunTelemetry {
            metadata: metadata.extra,
            ..Default::default()
        };
    };

    let frequencies = metadata.sample_frequency.unwrap_or_default();
    let mut telemetry = RunTelemetry {
        metadata: metadata.extra,
        ..Default::default()
    };

    for channel in SuspensionChannel::iter() {
        let data = match channel {
            SuspensionChannel::Front => std::mem::take(&mut suspension.front_sus),
            SuspensionChannel::Rear => std::mem::take(&mut suspension.rear_sus),
        };
        let frequency = resolve_frequency(frequencies.get(channel), config.default_frequency);

        tracing::debug!(
            "{}: {} ({} samples at {} Hz)",
            channel,
            data.status(),
            data.len(),
            frequency
        );

        let slot = ChannelTelemetry { data, frequency };
        match channel {
            SuspensionChannel::Front => telemetry.front = slot,
            SuspensionChannel::Rear => telemetry.rear = slot,
        }
    }

    telemetry
}
