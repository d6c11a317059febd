//! Travelog - a suspension telemetry viewer
//!
//! Desktop application for browsing recorded runs and comparing their
//! front and rear suspension travel.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use travelog::app::TravelogApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 960.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Travelog - Suspension Telemetry")
            .with_app_id("Travelog")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Travelog",
        native_options,
        Box::new(|cc| Ok(Box::new(TravelogApp::new(cc)))),
    )
}
