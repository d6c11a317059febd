//! Settings window - telemetry parameters, run source and display options.

use eframe::egui;

use crate::app::TravelogApp;
use crate::settings::{SourceConfig, TelemetryConfig};

impl TravelogApp {
    /// Render the settings window when open
    pub fn render_settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let mut open = true;
        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .default_width(320.0)
            .show(ctx, |ui| {
                self.render_telemetry_section(ui);
                ui.add_space(8.0);
                self.render_source_section(ui);
                ui.add_space(8.0);
                self.render_display_section(ui);
            });
        self.show_settings = open;
    }

    fn render_telemetry_section(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new(egui::RichText::new("📐 Telemetry").size(14.0))
            .default_open(true)
            .show(ui, |ui| {
                let mut config = *self.session.config();

                egui::Grid::new("telemetry_grid")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Max travel")
                            .on_hover_text("Raw reading at full compression");
                        ui.add(
                            egui::DragValue::new(&mut config.max_travel)
                                .range(1.0..=100_000.0)
                                .speed(1.0),
                        );
                        ui.end_row();

                        ui.label("Sag window (ms)")
                            .on_hover_text("Moving-average window of the dynamic sag line");
                        ui.add(
                            egui::DragValue::new(&mut config.window_ms)
                                .range(1.0..=60_000.0)
                                .speed(10.0),
                        );
                        ui.end_row();

                        ui.label("Histogram bins");
                        ui.add(egui::DragValue::new(&mut config.bin_count).range(1..=200));
                        ui.end_row();

                        ui.label("Default frequency (Hz)")
                            .on_hover_text("Used when a run doesn't record its sample rate");
                        ui.add(
                            egui::DragValue::new(&mut config.default_frequency)
                                .range(1.0..=100_000.0)
                                .speed(1.0),
                        );
                        ui.end_row();
                    });

                ui.add_space(4.0);
                if ui.button("Restore defaults").clicked() {
                    config = TelemetryConfig::default();
                }

                if config != *self.session.config() {
                    self.apply_telemetry_config(config);
                }
            });
    }

    /// Recompute every loaded run and persist
    pub(crate) fn apply_telemetry_config(&mut self, config: TelemetryConfig) {
        tracing::info!(
            "Telemetry config changed: max travel {}, window {} ms, {} bins",
            config.max_travel,
            config.window_ms,
            config.bin_count
        );
        self.session.set_config(config);
        self.settings.telemetry = config;
        self.save_settings();
    }

    fn render_source_section(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new(egui::RichText::new("🗄 Run Source").size(14.0))
            .default_open(true)
            .show(ui, |ui| {
                ui.label(
                    egui::RichText::new(self.session.source().describe())
                        .color(egui::Color32::GRAY),
                );
                ui.add_space(4.0);

                ui.horizontal(|ui| {
                    ui.label("Backend URL");
                    ui.text_edit_singleline(&mut self.backend_url_input);
                });

                ui.horizontal(|ui| {
                    if ui.button("Connect").clicked() {
                        self.set_source(SourceConfig::Backend(self.backend_url()));
                    }
                    if ui.button("Open Run Folder…").clicked() {
                        self.open_run_folder();
                    }
                });
            });
    }

    fn render_display_section(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new(egui::RichText::new("🎨 Display").size(14.0))
            .default_open(true)
            .show(ui, |ui| {
                if ui
                    .checkbox(&mut self.settings.color_blind_mode, "Color blind mode")
                    .on_hover_text("Use a palette that stays distinguishable with color vision deficiency")
                    .changed()
                {
                    self.save_settings();
                }
            });
    }
}
