//! Logger capture file parser.
//!
//! The data logger writes a plain-text capture:
//!
//! ```text
//! Hill run 3                       <- comment
//! rear:100:front:100               <- sample frequencies (Hz)
//! 512,498                          <- initial rear,front displacement
//! a1,a2,a3,a4,a5,a6,rear,front     <- one row per sample
//! ...
//! 93                               <- run time (seconds)
//! END                              <- trailer
//! ```
//!
//! [`Capture::to_document`] converts it into the JSON run document layout
//! consumed by the rest of the application.

use regex::Regex;
use std::sync::OnceLock;

use super::types::{
    AxisData, ChannelData, ParseError, RawReading, RunDocument, RunMetadata, SampleFrequencies,
    SensorData, SuspensionData,
};

/// Columns per data row: six inertial axes then rear and front displacement
const DATA_COLUMNS: usize = 8;

/// Minimum number of lines: comment, frequencies, initial values, run time, trailer
const MIN_LINES: usize = 5;

fn frequency_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([^:]*?)\s*:\s*([^:]+?)\s*:\s*([^:]*?)\s*:\s*([^:]+?)\s*$")
            .expect("static regex")
    })
}

/// A parsed capture file
#[derive(Clone, Debug, Default)]
pub struct Capture {
    pub comment: String,
    pub run_time: i64,
    pub rear_frequency: f64,
    pub front_frequency: f64,
    /// axis1..axis6 columns
    pub axes: [Vec<f64>; 6],
    pub rear: Vec<f64>,
    pub front: Vec<f64>,
    /// Data rows dropped for having too few columns
    pub skipped_rows: usize,
}

fn parse_number(text: &str, line: usize, what: &str) -> Result<f64, ParseError> {
    text.trim().parse().map_err(|_| ParseError::CaptureLine {
        line,
        message: format!("invalid {} '{}'", what, text.trim()),
    })
}

impl Capture {
    /// Parse capture text
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        if lines.len() < MIN_LINES {
            return Err(ParseError::CaptureTooShort { lines: lines.len() });
        }

        let mut capture = Capture {
            comment: lines[0].trim().to_string(),
            ..Default::default()
        };

        // Frequencies. Labels decide the order; unlabelled headers are rear first.
        let caps = frequency_header()
            .captures(lines[1])
            .ok_or_else(|| ParseError::CaptureLine {
                line: 2,
                message: format!("expected 'rear:<hz>:front:<hz>', got '{}'", lines[1].trim()),
            })?;
        let first = parse_number(&caps[2], 2, "frequency")?;
        let second = parse_number(&caps[4], 2, "frequency")?;
        if caps[1].to_ascii_lowercase().contains("front")
            || caps[3].to_ascii_lowercase().contains("rear")
        {
            capture.front_frequency = first;
            capture.rear_frequency = second;
        } else {
            capture.rear_frequency = first;
            capture.front_frequency = second;
        }

        // Initial displacement values
        let initial: Vec<&str> = lines[2].split(',').map(str::trim).collect();
        if initial.len() >= 2 {
            capture.rear.push(parse_number(initial[0], 3, "initial value")?);
            capture.front.push(parse_number(initial[1], 3, "initial value")?);
        }

        let run_time_idx = lines.len() - 2;
        let run_time_line = lines[run_time_idx].trim();
        capture.run_time = run_time_line
            .parse()
            .map_err(|_| ParseError::CaptureLine {
                line: run_time_idx + 1,
                message: format!("invalid run time '{}'", run_time_line),
            })?;

        for (idx, line) in lines[3..run_time_idx].iter().enumerate() {
            let line_no = idx + 4;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            if parts.len() < DATA_COLUMNS {
                capture.skipped_rows += 1;
                continue;
            }

            let mut row = [0.0; DATA_COLUMNS];
            for (slot, part) in row.iter_mut().zip(&parts) {
                *slot = parse_number(part, line_no, "sample")?;
            }

            for (axis, value) in capture.axes.iter_mut().zip(&row[..6]) {
                axis.push(*value);
            }
            capture.rear.push(row[6]);
            capture.front.push(row[7]);
        }

        if capture.skipped_rows > 0 {
            tracing::warn!(
                "Skipped {} capture rows with fewer than {} columns",
                capture.skipped_rows,
                DATA_COLUMNS
            );
        }
        tracing::info!(
            "Parsed capture '{}': {} front / {} rear samples",
            capture.comment,
            capture.front.len(),
            capture.rear.len()
        );

        Ok(capture)
    }

    /// Convert into the stored run document layout.
    ///
    /// axis1-3 become the accelerometer, axis4-6 the gyroscope.
    pub fn to_document(&self) -> RunDocument {
        let channel = |values: &[f64]| -> ChannelData {
            values
                .iter()
                .map(|&v| RawReading::Value(v))
                .collect::<Vec<_>>()
                .into()
        };

        let mut extra = serde_json::Map::new();
        extra.insert("run_comment".into(), self.comment.clone().into());
        extra.insert("run_time".into(), self.run_time.into());

        RunDocument {
            data: Some(SensorData {
                accelerometer: Some(AxisData {
                    axis1: channel(&self.axes[0]),
                    axis2: channel(&self.axes[1]),
                    axis3: channel(&self.axes[2]),
                }),
                gyroscope: Some(AxisData {
                    axis1: channel(&self.axes[3]),
                    axis2: channel(&self.axes[4]),
                    axis3: channel(&self.axes[5]),
                }),
                suspension: Some(SuspensionData {
                    front_sus: channel(&self.front),
                    rear_sus: channel(&self.rear),
                }),
            }),
            suspension: None,
            metadata: RunMetadata {
                sample_frequency: Some(SampleFrequencies {
                    front_sus: Some(self.front_frequency),
                    rear_sus: Some(self.rear_frequency),
                }),
                extra,
            },
        }
    }
}
