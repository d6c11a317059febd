//! Selected runs and their data.
//!
//! At most [`MAX_SELECTED_RUNS`] runs are selected at once. Selecting a run
//! starts a fetch on a short-lived worker thread; the worker fetches, parses
//! and analyzes the document and reports back over a channel that the UI
//! thread drains every frame. Only the UI thread mutates the session.
//!
//! Every selection gets a fresh ticket. A result is committed only if its
//! run is still selected under the same ticket, so a response that arrives
//! after a deselect (or after a deselect + reselect) is dropped.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::analysis::{analyze_run, RunAnalysis};
use crate::parsers::{parse_run, RunTelemetry};
use crate::settings::TelemetryConfig;
use crate::source::{RunInfo, RunSource};
use crate::state::MAX_SELECTED_RUNS;

/// A loaded run: validated telemetry plus everything derived from it
#[derive(Clone, Debug)]
pub struct LoadedRun {
    pub telemetry: RunTelemetry,
    pub analysis: RunAnalysis,
    /// Configuration the analysis was computed with
    pub config: TelemetryConfig,
}

impl LoadedRun {
    pub fn new(telemetry: RunTelemetry, config: TelemetryConfig) -> Self {
        let analysis = analyze_run(&telemetry, &config);
        Self {
            telemetry,
            analysis,
            config,
        }
    }

    /// Recompute derived data if `config` differs from the one used
    pub fn reconfigure(&mut self, config: &TelemetryConfig) -> bool {
        if self.config == *config {
            return false;
        }
        self.analysis = analyze_run(&self.telemetry, config);
        self.config = *config;
        true
    }
}

/// Data slot of a selected run
#[derive(Clone, Debug)]
pub enum RunSlot {
    Loading,
    Loaded(Box<LoadedRun>),
    /// Fetch or parse failed; the message is shown in the run's banner
    Failed(String),
}

impl RunSlot {
    pub fn is_loading(&self) -> bool {
        matches!(self, RunSlot::Loading)
    }

    pub fn loaded(&self) -> Option<&LoadedRun> {
        match self {
            RunSlot::Loaded(run) => Some(run),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RunSlot::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// A selected run
#[derive(Clone, Debug)]
pub struct SelectedRun {
    pub info: RunInfo,
    pub ticket: u64,
    pub slot: RunSlot,
}

/// Outcome of a worker fetch, sent back to the UI thread
#[derive(Debug)]
pub struct FetchResult {
    pub run_id: i64,
    pub ticket: u64,
    pub outcome: Result<LoadedRun, String>,
}

/// What [`Session::toggle`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Selected; a fetch was started under this ticket
    Selected(u64),
    /// Was selected; now removed together with its data
    Deselected,
    /// Already at the selection cap; nothing changed
    AtCapacity,
}

/// What [`Session::commit`] did with a result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    /// The run was deselected or reselected since the fetch started
    Stale,
}

/// Selection set and per-run data, owned by the UI thread
pub struct Session {
    source: Arc<dyn RunSource>,
    config: TelemetryConfig,
    selected: Vec<SelectedRun>,
    next_ticket: u64,
    tx: Sender<FetchResult>,
    rx: Receiver<FetchResult>,
}

impl Session {
    pub fn new(source: Arc<dyn RunSource>, config: TelemetryConfig) -> Self {
        let (tx, rx) = channel();
        Self {
            source,
            config,
            selected: Vec::new(),
            next_ticket: 1,
            tx,
            rx,
        }
    }

    pub fn source(&self) -> &Arc<dyn RunSource> {
        &self.source
    }

    /// Swap the source. Clears the selection, so in-flight results go stale.
    pub fn set_source(&mut self, source: Arc<dyn RunSource>) {
        self.source = source;
        self.selected.clear();
    }

    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// Apply a new configuration to every loaded run
    pub fn set_config(&mut self, config: TelemetryConfig) {
        self.config = config;
        for run in &mut self.selected {
            if let RunSlot::Loaded(loaded) = &mut run.slot {
                if loaded.reconfigure(&config) {
                    tracing::debug!("Recomputed analysis for run {}", run.info.id);
                }
            }
        }
    }

    /// Selected runs in selection order
    pub fn selected(&self) -> &[SelectedRun] {
        &self.selected
    }

    pub fn is_selected(&self, run_id: i64) -> bool {
        self.selected.iter().any(|r| r.info.id == run_id)
    }

    pub fn ticket_of(&self, run_id: i64) -> Option<u64> {
        self.selected
            .iter()
            .find(|r| r.info.id == run_id)
            .map(|r| r.ticket)
    }

    pub fn is_compare_mode(&self) -> bool {
        self.selected.len() > 1
    }

    pub fn is_loading(&self) -> bool {
        self.selected.iter().any(|r| r.slot.is_loading())
    }

    /// Select a run if it isn't selected, deselect it otherwise
    pub fn toggle(&mut self, run: &RunInfo) -> ToggleOutcome {
        if self.is_selected(run.id) {
            self.deselect(run.id);
            return ToggleOutcome::Deselected;
        }
        match self.begin_select(run) {
            Some(ticket) => {
                self.spawn_fetch(run.clone(), ticket);
                ToggleOutcome::Selected(ticket)
            }
            None => ToggleOutcome::AtCapacity,
        }
    }

    /// Add `run` to the selection in the loading state without fetching.
    /// Returns the new ticket, or `None` at the selection cap.
    pub fn begin_select(&mut self, run: &RunInfo) -> Option<u64> {
        if self.selected.len() >= MAX_SELECTED_RUNS {
            tracing::debug!("Selection cap reached; ignoring run {}", run.id);
            return None;
        }
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.selected.push(SelectedRun {
            info: run.clone(),
            ticket,
            slot: RunSlot::Loading,
        });
        tracing::info!("Selected run {} ({})", run.id, run.display_title());
        Some(ticket)
    }

    /// Remove a run and drop its data
    pub fn deselect(&mut self, run_id: i64) -> bool {
        let before = self.selected.len();
        self.selected.retain(|r| r.info.id != run_id);
        let removed = self.selected.len() != before;
        if removed {
            tracing::info!("Deselected run {}", run_id);
        }
        removed
    }

    fn spawn_fetch(&self, run: RunInfo, ticket: u64) {
        let source = Arc::clone(&self.source);
        let config = self.config;
        let tx = self.tx.clone();

        thread::spawn(move || {
            let outcome = source
                .fetch(&run)
                .map_err(|e| e.to_string())
                .and_then(|bytes| parse_run(&bytes, &config).map_err(|e| e.to_string()))
                .map(|telemetry| LoadedRun::new(telemetry, config));

            if let Err(e) = &outcome {
                tracing::error!("Failed to load run {}: {}", run.id, e);
            }

            // The session may be gone; nothing to report to then
            let _ = tx.send(FetchResult {
                run_id: run.id,
                ticket,
                outcome,
            });
        });
    }

    /// Store a fetch result if its selection is still current
    pub fn commit(&mut self, result: FetchResult) -> CommitOutcome {
        let config = self.config;
        let Some(run) = self
            .selected
            .iter_mut()
            .find(|r| r.info.id == result.run_id && r.ticket == result.ticket)
        else {
            tracing::debug!(
                "Discarding stale result for run {} (ticket {})",
                result.run_id,
                result.ticket
            );
            return CommitOutcome::Stale;
        };

        run.slot = match result.outcome {
            Ok(mut loaded) => {
                loaded.reconfigure(&config);
                RunSlot::Loaded(Box::new(loaded))
            }
            Err(message) => RunSlot::Failed(message),
        };
        CommitOutcome::Applied
    }

    /// Commit every result that arrived since the last call.
    /// Returns the number of results applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(result) = self.rx.try_recv() {
            if self.commit(result) == CommitOutcome::Applied {
                applied += 1;
            }
        }
        applied
    }
}
