//! Main application state and eframe::App implementation.
//!
//! This module contains the core TravelogApp struct and its primary
//! functionality. UI rendering is split into the `ui` submodules.

use eframe::egui;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::parsers::Capture;
use crate::session::Session;
use crate::settings::{SourceConfig, UserSettings};
use crate::source::{self, RunInfo, RunSource};
use crate::state::ToastType;
use crate::ui::run_view::RunCharts;

/// State of the run listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunListState {
    Idle,
    Loading,
    Failed(String),
}

/// Main application state
pub struct TravelogApp {
    /// Persisted settings (telemetry configuration, source, palette)
    pub(crate) settings: UserSettings,
    /// Selected runs and their data
    pub(crate) session: Session,
    /// Runs offered by the current source
    pub(crate) runs: Vec<RunInfo>,
    pub(crate) run_list_state: RunListState,
    /// Channel for receiving the run list from the background thread
    run_list_receiver: Option<Receiver<Result<Vec<RunInfo>, String>>>,
    /// Chart objects per selected run id
    pub(crate) charts: HashMap<i64, RunCharts>,
    /// Toast messages for user feedback
    pub(crate) toast_message: Option<(String, Instant, ToastType)>,
    /// Whether the runs side panel is expanded
    pub(crate) sidebar_open: bool,
    /// Whether the settings window is open
    pub(crate) show_settings: bool,
    /// Backend URL being edited in the settings window
    pub(crate) backend_url_input: String,
    /// Track dropped files to prevent duplicates
    last_drop_time: Option<Instant>,
}

impl TravelogApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut settings = UserSettings::load();
        settings.source = SourceConfig::from_env_or(settings.source.clone());
        Self::with_settings(settings)
    }

    /// Build the app around explicit settings (no disk access)
    pub fn with_settings(settings: UserSettings) -> Self {
        let source: Arc<dyn RunSource> = Arc::from(source::from_config(&settings.source));
        tracing::info!("Using run source: {}", source.describe());

        let backend_url_input = match &settings.source {
            SourceConfig::Backend(url) => url.clone(),
            SourceConfig::Directory(_) => crate::settings::DEFAULT_BACKEND_URL.to_string(),
        };

        let mut app = Self {
            session: Session::new(source, settings.telemetry),
            settings,
            runs: Vec::new(),
            run_list_state: RunListState::Idle,
            run_list_receiver: None,
            charts: HashMap::new(),
            toast_message: None,
            sidebar_open: true,
            show_settings: false,
            backend_url_input,
            last_drop_time: None,
        };
        app.refresh_runs();
        app
    }

    /// Show a toast notification
    pub(crate) fn show_toast(&mut self, message: &str, toast_type: ToastType) {
        self.toast_message = Some((message.to_string(), Instant::now(), toast_type));
    }

    /// Persist settings, reporting failures as a toast
    pub(crate) fn save_settings(&mut self) {
        if let Err(e) = self.settings.save() {
            tracing::error!("Failed to save settings: {}", e);
            self.show_toast(&format!("Could not save settings: {}", e), ToastType::Warning);
        }
    }

    /// Fetch the run list in the background
    pub(crate) fn refresh_runs(&mut self) {
        let source = Arc::clone(self.session.source());
        let (sender, receiver) = channel();
        self.run_list_receiver = Some(receiver);
        self.run_list_state = RunListState::Loading;

        thread::spawn(move || {
            let result = source.list_runs().map_err(|e| e.to_string());
            let _ = sender.send(result);
        });
    }

    /// Check for a completed run listing
    fn check_run_list(&mut self) {
        let Some(receiver) = &self.run_list_receiver else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };

        match result {
            Ok(runs) => {
                self.runs = runs;
                self.run_list_state = RunListState::Idle;
            }
            Err(e) => {
                tracing::error!("Failed to list runs: {}", e);
                self.runs.clear();
                self.run_list_state = RunListState::Failed(e);
            }
        }
        self.run_list_receiver = None;
    }

    /// Switch to a new run source; drops the selection
    pub(crate) fn set_source(&mut self, config: SourceConfig) {
        let source: Arc<dyn RunSource> = Arc::from(source::from_config(&config));
        tracing::info!("Switching run source: {}", source.describe());

        self.session.set_source(source);
        self.charts.clear();
        self.runs.clear();
        self.settings.source = config;
        self.save_settings();
        self.refresh_runs();
    }

    /// Select or deselect a run from the list
    pub(crate) fn toggle_run(&mut self, run: &RunInfo) {
        use crate::session::ToggleOutcome;

        match self.session.toggle(run) {
            ToggleOutcome::Selected(_) => {}
            ToggleOutcome::Deselected => {
                self.charts.remove(&run.id);
            }
            ToggleOutcome::AtCapacity => {
                self.show_toast(
                    &format!(
                        "At most {} runs can be compared",
                        crate::state::MAX_SELECTED_RUNS
                    ),
                    ToastType::Info,
                );
            }
        }
    }

    /// Drop chart objects for runs that are no longer selected
    fn prune_charts(&mut self) {
        let session = &self.session;
        self.charts
            .retain(|id, charts| session.ticket_of(*id) == Some(charts.ticket));
    }

    /// Pick a folder of run documents and use it as the source
    pub(crate) fn open_run_folder(&mut self) {
        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
            self.set_source(SourceConfig::Directory(dir));
        }
    }

    /// Convert a logger capture file into a run document
    pub(crate) fn convert_capture(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Capture Files", crate::state::CAPTURE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        let default_name = path
            .file_stem()
            .map(|s| format!("{}.json", s.to_string_lossy()))
            .unwrap_or_else(|| "run.json".to_string());

        let Some(target) = rfd::FileDialog::new()
            .add_filter("Run Documents", crate::state::RUN_EXTENSIONS)
            .set_file_name(&default_name)
            .save_file()
        else {
            return;
        };

        match Self::convert_capture_file(&path, &target) {
            Ok(samples) => {
                self.show_toast(
                    &format!("Converted {} samples to {}", samples, target.display()),
                    ToastType::Success,
                );
                if matches!(self.settings.source, SourceConfig::Directory(_)) {
                    self.refresh_runs();
                }
            }
            Err(e) => {
                tracing::error!("Capture conversion failed: {}", e);
                self.show_toast(&format!("Error: {}", e), ToastType::Error);
            }
        }
    }

    /// Read, parse and write; returns the number of front samples written
    fn convert_capture_file(path: &Path, target: &Path) -> Result<usize, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let capture = Capture::parse(&text).map_err(|e| e.to_string())?;
        let json = serde_json::to_vec_pretty(&capture.to_document()).map_err(|e| e.to_string())?;
        std::fs::write(target, json)
            .map_err(|e| format!("Failed to write {}: {}", target.display(), e))?;
        Ok(capture.front.len())
    }

    /// A dropped directory becomes the run source
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        // Debounce drops
        if let Some(last_drop) = self.last_drop_time {
            if last_drop.elapsed().as_secs() < 2 {
                return;
            }
        }

        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });

        let Some(path) = dropped.into_iter().next() else {
            return;
        };
        self.last_drop_time = Some(Instant::now());

        if path.is_dir() {
            self.set_source(SourceConfig::Directory(path));
        } else if let Some(parent) = path.parent() {
            self.show_toast(
                "Opened the folder containing the dropped file",
                ToastType::Info,
            );
            self.set_source(SourceConfig::Directory(parent.to_path_buf()));
        }
    }
}

impl eframe::App for TravelogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Background work
        self.check_run_list();
        if self.session.poll() > 0 {
            ctx.request_repaint();
        }
        self.prune_charts();

        self.handle_dropped_files(ctx);

        ctx.set_visuals(egui::Visuals::dark());

        // Worker threads don't hold the context; poll while anything is pending
        if self.session.is_loading() || self.run_list_state == RunListState::Loading {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.render_toast(ctx);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.render_menu_bar(ui);
        });

        let panel_width = if self.sidebar_open { 240.0 } else { 48.0 };
        egui::SidePanel::left("runs_panel")
            .exact_width(panel_width)
            .resizable(false)
            .show(ctx, |ui| {
                self.render_runs_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_run_views(ui);
        });

        self.render_settings_window(ctx);
    }
}
