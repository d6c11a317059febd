//! Common test utilities shared across all test modules
//!
//! Builders for synthetic run documents and captures, an in-memory run
//! source, and a helper for waiting on background fetches.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use travelog::session::Session;
use travelog::source::{RunBytes, RunInfo, RunSource, SourceError};

/// A run document in the current layout (`data.suspension`)
pub fn run_document(front: &[f64], rear: &[f64], front_hz: f64, rear_hz: f64) -> Value {
    json!({
        "data": {
            "suspension": {
                "front_sus": front,
                "rear_sus": rear,
            }
        },
        "metadata": {
            "sample_frequency": {
                "front_sus": front_hz,
                "rear_sus": rear_hz,
            },
            "run_comment": "synthetic",
        }
    })
}

/// Serialized form of [`run_document`]
pub fn run_bytes(front: &[f64], rear: &[f64], front_hz: f64, rear_hz: f64) -> Vec<u8> {
    serde_json::to_vec(&run_document(front, rear, front_hz, rear_hz))
        .unwrap_or_else(|e| panic!("Failed to serialize test document: {}", e))
}

/// A listed run pointing at `src_path`
pub fn run_info(id: i64, src_path: &str) -> RunInfo {
    RunInfo {
        id,
        src_path: src_path.to_string(),
        title: Some(format!("Run {}", id)),
        date: None,
        location: None,
        length: None,
    }
}

/// Capture file text with the given rear/front columns
pub fn capture_text(comment: &str, rear_hz: f64, front_hz: f64, rows: &[(f64, f64)]) -> String {
    let mut text = format!("{}\nrear:{}:front:{}\n", comment, rear_hz, front_hz);
    let (rear0, front0) = rows.first().copied().unwrap_or((0.0, 0.0));
    text.push_str(&format!("{},{}\n", rear0, front0));
    for (rear, front) in rows.iter().skip(1) {
        text.push_str(&format!("0,0,1,0,0,0,{},{}\n", rear, front));
    }
    text.push_str("12\nEND\n");
    text
}

/// Test data generators for synthetic tests
pub mod synthetic {
    /// `n` raw readings sweeping 0..=max_travel
    pub fn ramp(n: usize, max_travel: f64) -> Vec<f64> {
        if n < 2 {
            return vec![0.0; n];
        }
        (0..n)
            .map(|i| i as f64 * max_travel / (n - 1) as f64)
            .collect()
    }

    /// `n` copies of `value`
    pub fn constant(n: usize, value: f64) -> Vec<f64> {
        vec![value; n]
    }

    /// Sine around the middle of the stroke
    pub fn sine(n: usize, max_travel: f64, period: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let phase = i as f64 / period as f64 * std::f64::consts::TAU;
                max_travel / 2.0 + phase.sin() * max_travel / 4.0
            })
            .collect()
    }
}

/// Run source backed by an in-memory map of `src_path` to a document or an
/// HTTP status
#[derive(Default)]
pub struct MemorySource {
    runs: Vec<RunInfo>,
    files: HashMap<String, Result<Vec<u8>, u16>>,
    /// The first fetch of this path blocks until the sender is dropped or
    /// fires, then fails with 500
    gated: Mutex<Option<(String, Receiver<()>)>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run(mut self, info: RunInfo, bytes: Vec<u8>) -> Self {
        self.files.insert(info.src_path.clone(), Ok(bytes));
        self.runs.push(info);
        self
    }

    pub fn with_status(mut self, info: RunInfo, status: u16) -> Self {
        self.files.insert(info.src_path.clone(), Err(status));
        self.runs.push(info);
        self
    }

    pub fn with_gate(self, src_path: &str, gate: Receiver<()>) -> Self {
        if let Ok(mut slot) = self.gated.lock() {
            *slot = Some((src_path.to_string(), gate));
        }
        self
    }

    /// True until a fetch has picked up the gate
    pub fn gate_pending(&self) -> bool {
        self.gated.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

impl RunSource for MemorySource {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn list_runs(&self) -> Result<Vec<RunInfo>, SourceError> {
        Ok(self.runs.clone())
    }

    fn fetch(&self, run: &RunInfo) -> Result<RunBytes, SourceError> {
        let gate = {
            let mut slot = self.gated.lock().map_err(|e| SourceError::Transport(e.to_string()))?;
            match slot.as_ref() {
                Some((path, _)) if *path == run.src_path => slot.take(),
                _ => None,
            }
        };
        if let Some((_, gate)) = gate {
            let _ = gate.recv();
            return Err(SourceError::Status(500));
        }

        match self.files.get(&run.src_path) {
            Some(Ok(bytes)) => Ok(bytes.clone().into()),
            Some(Err(status)) => Err(SourceError::Status(*status)),
            None => Err(SourceError::Status(404)),
        }
    }
}

/// Poll `session` until `done` holds. Returns false after five seconds.
pub fn wait_for(session: &mut Session, done: impl Fn(&Session) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        session.poll();
        if done(session) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}
