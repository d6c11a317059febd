//! UI rendering modules for the Travelog application.
//!
//! - `menu` - Menu bar (File, View)
//! - `runs_panel` - Collapsible list of available runs
//! - `run_view` - Per-run displacement plot and travel histograms
//! - `line_chart` - egui_plot widget for the focus + context chart
//! - `histogram` - egui painter for the animated travel histogram
//! - `settings_panel` - Telemetry and source settings window
//! - `toast` - Toast notification system

pub mod histogram;
pub mod line_chart;
pub mod menu;
pub mod run_view;
pub mod runs_panel;
pub mod settings_panel;
pub mod toast;

use eframe::egui::Color32;

/// `[r, g, b]` palette entry to a color
pub(crate) fn rgb(c: [u8; 3]) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}
