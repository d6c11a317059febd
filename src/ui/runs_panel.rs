//! Runs panel - collapsible list of the runs offered by the current source.

use eframe::egui;

use crate::app::{RunListState, TravelogApp};
use crate::source::RunInfo;

/// One line of run metadata: date, location and length
pub(crate) fn run_details(run: &RunInfo) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(date) = &run.date {
        parts.push(date.clone());
    }
    if let Some(location) = &run.location {
        parts.push(location.clone());
    }
    if let Some(length) = run.length {
        parts.push(format!("[{}]", length));
    }
    parts.join(" • ")
}

impl TravelogApp {
    /// Render the side panel
    pub fn render_runs_panel(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let arrow = if self.sidebar_open { "⏴" } else { "⏵" };
            if ui
                .button(arrow)
                .on_hover_text(if self.sidebar_open {
                    "Collapse"
                } else {
                    "Expand"
                })
                .clicked()
            {
                self.sidebar_open = !self.sidebar_open;
            }
            if self.sidebar_open {
                ui.heading("Available Runs");
            }
        });

        if !self.sidebar_open {
            return;
        }

        ui.add_space(4.0);
        ui.label(
            egui::RichText::new(self.session.source().describe())
                .size(11.0)
                .color(egui::Color32::GRAY),
        );
        ui.separator();

        match self.run_list_state.clone() {
            RunListState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading runs...");
                });
            }
            RunListState::Failed(message) => {
                ui.label(
                    egui::RichText::new(message)
                        .color(egui::Color32::from_rgb(191, 78, 48)),
                );
                ui.add_space(4.0);
                if ui.button("Retry").clicked() {
                    self.refresh_runs();
                }
            }
            RunListState::Idle if self.runs.is_empty() => {
                ui.label(egui::RichText::new("No runs found").color(egui::Color32::GRAY));
                ui.add_space(4.0);
                if ui.button("Open Run Folder…").clicked() {
                    self.open_run_folder();
                }
            }
            RunListState::Idle => self.render_run_list(ui),
        }
    }

    fn render_run_list(&mut self, ui: &mut egui::Ui) {
        let mut run_to_toggle: Option<RunInfo> = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for run in &self.runs {
                    let is_selected = self.session.is_selected(run.id);
                    let is_loading = self
                        .session
                        .selected()
                        .iter()
                        .any(|r| r.info.id == run.id && r.slot.is_loading());

                    let card_bg = if is_selected {
                        egui::Color32::from_rgb(50, 55, 45)
                    } else {
                        egui::Color32::from_rgb(40, 40, 40)
                    };
                    let card_border = if is_selected {
                        egui::Color32::from_rgb(113, 120, 78)
                    } else {
                        egui::Color32::from_rgb(55, 55, 55)
                    };

                    let card = egui::Frame::NONE
                        .fill(card_bg)
                        .stroke(egui::Stroke::new(1.0, card_border))
                        .corner_radius(6)
                        .inner_margin(egui::Margin::symmetric(10, 8))
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                ui.label(
                                    egui::RichText::new(run.display_title())
                                        .size(14.0)
                                        .color(if is_selected {
                                            egui::Color32::WHITE
                                        } else {
                                            egui::Color32::LIGHT_GRAY
                                        }),
                                );
                                if is_loading {
                                    ui.with_layout(
                                        egui::Layout::right_to_left(egui::Align::Center),
                                        |ui| ui.spinner(),
                                    );
                                }
                            });

                            let details = run_details(run);
                            if !details.is_empty() {
                                ui.label(
                                    egui::RichText::new(details)
                                        .size(11.0)
                                        .color(egui::Color32::GRAY),
                                );
                            }
                        });

                    let response = card.response.interact(egui::Sense::click());
                    if response.clicked() {
                        run_to_toggle = Some(run.clone());
                    }
                    if response.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                    }

                    ui.add_space(4.0);
                }
            });

        // Deferred so the list isn't borrowed while the session changes
        if let Some(run) = run_to_toggle {
            self.toggle_run(&run);
        }
    }
}
