//! Menu bar UI components (File, View menus).

use eframe::egui;

use crate::app::TravelogApp;
use crate::settings::{SourceConfig, DEFAULT_BACKEND_URL};

impl TravelogApp {
    /// Render the application menu bar
    pub fn render_menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.style_mut()
                .text_styles
                .insert(egui::TextStyle::Button, egui::FontId::proportional(15.0));

            ui.menu_button("File", |ui| {
                ui.set_min_width(200.0);
                ui.style_mut()
                    .text_styles
                    .insert(egui::TextStyle::Button, egui::FontId::proportional(14.0));

                if ui.button("Open Run Folder…").clicked() {
                    self.open_run_folder();
                    ui.close();
                }

                let on_backend = matches!(self.settings.source, SourceConfig::Backend(_));
                if ui
                    .add_enabled(!on_backend, egui::Button::new("Use Backend"))
                    .on_hover_text(format!("Connect to {}", self.backend_url()))
                    .clicked()
                {
                    self.set_source(SourceConfig::Backend(self.backend_url()));
                    ui.close();
                }

                if ui.button("Refresh Runs").clicked() {
                    self.refresh_runs();
                    ui.close();
                }

                ui.separator();

                if ui
                    .button("Convert Capture…")
                    .on_hover_text("Turn a logger capture into a run document")
                    .clicked()
                {
                    ui.close();
                    self.convert_capture();
                }

                ui.separator();

                if ui.button("Quit").clicked() {
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                ui.set_min_width(200.0);

                if ui.button("Settings…").clicked() {
                    self.show_settings = true;
                    ui.close();
                }

                if ui
                    .checkbox(&mut self.settings.color_blind_mode, "Color Blind Mode")
                    .changed()
                {
                    self.save_settings();
                }

                let label = if self.sidebar_open {
                    "Hide Run List"
                } else {
                    "Show Run List"
                };
                if ui.button(label).clicked() {
                    self.sidebar_open = !self.sidebar_open;
                    ui.close();
                }
            });
        });
    }

    /// Backend URL from the settings field, falling back to the default
    pub(crate) fn backend_url(&self) -> String {
        let trimmed = self.backend_url_input.trim();
        if trimmed.is_empty() {
            DEFAULT_BACKEND_URL.to_string()
        } else {
            trimmed.to_string()
        }
    }
}
