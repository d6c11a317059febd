//! Run view - one card per selected run with its displacement plot and
//! travel histograms.

use eframe::egui;

use crate::analysis::{ChannelAnalysis, RunAnalysis};
use crate::app::TravelogApp;
use crate::chart::{HistogramView, LineChartOptions, LineStyle};
use crate::parsers::{RunTelemetry, SuspensionChannel};
use crate::series::NormalizedPoint;
use crate::session::{LoadedRun, RunSlot, SelectedRun};
use crate::settings::TelemetryConfig;
use crate::state::{palette_color, SeriesRole, DISPLACEMENT_PLOT_HEIGHT};
use crate::ui::line_chart::LineChartView;
use crate::ui::rgb;
use crate::ui::runs_panel::run_details;

/// Travel lines come first in the displacement plot; sag overlays follow
const MAIN_SERIES: usize = 2;

/// Hover names of the displacement series, in [`displacement_series`] order
const SERIES_NAMES: [&str; 4] = ["Front", "Rear", "Front sag", "Rear sag"];

/// Chart objects of one selected run. Dropped when the run is deselected.
pub struct RunCharts {
    /// Selection ticket these charts belong to
    pub ticket: u64,
    pub line: LineChartView,
    pub front: HistogramView,
    pub rear: HistogramView,
    /// Inputs the line chart was last rendered from
    bound: Option<(TelemetryConfig, bool)>,
}

impl RunCharts {
    pub fn new(ticket: u64) -> Self {
        Self {
            ticket,
            line: LineChartView::new(("travel_chart", ticket)),
            front: HistogramView::new(),
            rear: HistogramView::new(),
            bound: None,
        }
    }
}

/// Style of displacement series `index`
pub fn displacement_style(index: usize, color_blind_mode: bool) -> LineStyle {
    let role = SeriesRole::for_index(index, MAIN_SERIES);
    let name = SERIES_NAMES.get(index).copied().unwrap_or_default();
    match role {
        SeriesRole::Primary | SeriesRole::Secondary => LineStyle {
            name,
            color: rgb(palette_color(index, color_blind_mode)),
            width: role.width(),
            dashed: false,
        },
        // Sag follows its channel's color, faded
        SeriesRole::LowEmphasis => LineStyle {
            name,
            color: rgb(palette_color(index - MAIN_SERIES, color_blind_mode)).gamma_multiply(0.6),
            width: role.width(),
            dashed: true,
        },
    }
}

/// Front, rear, front sag, rear sag
pub fn displacement_series(analysis: &RunAnalysis) -> [&[NormalizedPoint]; 4] {
    [
        &analysis.front.series,
        &analysis.rear.series,
        &analysis.front.sag,
        &analysis.rear.sag,
    ]
}

impl TravelogApp {
    /// Render the central area
    pub fn render_run_views(&mut self, ui: &mut egui::Ui) {
        if self.session.selected().is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("Select a run from the sidebar to see details.")
                        .size(16.0)
                        .color(egui::Color32::GRAY),
                );
            });
            return;
        }

        ui.heading(if self.session.is_compare_mode() {
            "Compare Mode"
        } else {
            "Single Run Mode"
        });
        ui.add_space(8.0);

        let color_blind_mode = self.settings.color_blind_mode;
        let session = &self.session;
        let charts = &mut self.charts;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for run in session.selected() {
                    let run_charts = charts
                        .entry(run.info.id)
                        .or_insert_with(|| RunCharts::new(run.ticket));
                    if run_charts.ticket != run.ticket {
                        *run_charts = RunCharts::new(run.ticket);
                    }
                    render_run_card(ui, run, run_charts, color_blind_mode);
                    ui.add_space(12.0);
                }
            });
    }
}

fn render_run_card(
    ui: &mut egui::Ui,
    run: &SelectedRun,
    charts: &mut RunCharts,
    color_blind_mode: bool,
) {
    egui::Frame::NONE
        .fill(egui::Color32::from_rgb(40, 40, 40))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(55, 55, 55)))
        .corner_radius(6)
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(run.info.display_title()).size(18.0).strong());
                let details = run_details(&run.info);
                if !details.is_empty() {
                    ui.label(egui::RichText::new(details).color(egui::Color32::GRAY));
                }
            });
            ui.add_space(6.0);

            match &run.slot {
                RunSlot::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(format!("Loading {}...", run.info.display_title()));
                    });
                }
                RunSlot::Failed(message) => {
                    render_error_banner(ui, run.info.display_title(), message);
                }
                RunSlot::Loaded(loaded) => {
                    render_loaded_run(ui, run.info.display_title(), loaded, charts, color_blind_mode);
                }
            }
        });
}

fn render_error_banner(ui: &mut egui::Ui, title: &str, message: &str) {
    egui::Frame::NONE
        .fill(egui::Color32::from_rgb(70, 25, 22))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(135, 30, 28)))
        .corner_radius(4)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                egui::RichText::new(format!("Could not load {}", title))
                    .strong()
                    .color(egui::Color32::WHITE),
            );
            ui.label(egui::RichText::new(message).color(egui::Color32::LIGHT_GRAY));
        });
}

fn render_loaded_run(
    ui: &mut egui::Ui,
    title: &str,
    loaded: &LoadedRun,
    charts: &mut RunCharts,
    color_blind_mode: bool,
) {
    let analysis = &loaded.analysis;
    let width = ui.available_width();

    render_channel_info(ui, &loaded.telemetry, analysis);
    ui.add_space(4.0);

    if !analysis.front.has_data() && !analysis.rear.has_data() {
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(width, DISPLACEMENT_PLOT_HEIGHT),
            egui::Sense::hover(),
        );
        ui.painter()
            .rect_filled(rect, 4.0, egui::Color32::from_rgb(30, 30, 30));
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            format!("No data available for {}", title),
            egui::FontId::proportional(14.0),
            egui::Color32::GRAY,
        );
    } else {
        render_legend(ui, color_blind_mode);

        let key = (loaded.config, color_blind_mode);
        if charts.bound != Some(key) {
            let options = LineChartOptions::default()
                .with_height(DISPLACEMENT_PLOT_HEIGHT)
                .with_style(move |i| displacement_style(i, color_blind_mode));
            charts
                .line
                .chart
                .render(&displacement_series(analysis), &options, width);
            charts.bound = Some(key);
        } else {
            charts.line.chart.resize(width);
        }
        charts.line.show(ui);

        if charts.line.chart.brush().is_some() && ui.small_button("Reset zoom").clicked() {
            charts.line.chart.zoom_to(None);
        }
    }

    ui.add_space(8.0);

    let half = ((width - ui.spacing().item_spacing.x) / 2.0).max(0.0);
    ui.horizontal_top(|ui| {
        for (channel, view) in [
            (SuspensionChannel::Front, &mut charts.front),
            (SuspensionChannel::Rear, &mut charts.rear),
        ] {
            ui.vertical(|ui| {
                ui.set_width(half);
                ui.label(egui::RichText::new(format!("{} Travel", channel.label())).strong());
                let color = rgb(palette_color(channel_index(channel), color_blind_mode));
                crate::ui::histogram::show_histogram(
                    ui,
                    view,
                    &analysis.channel(channel).bins,
                    color,
                    half,
                );
            });
        }
    });
}

fn channel_index(channel: SuspensionChannel) -> usize {
    match channel {
        SuspensionChannel::Front => 0,
        SuspensionChannel::Rear => 1,
    }
}

fn render_legend(ui: &mut egui::Ui, color_blind_mode: bool) {
    ui.horizontal(|ui| {
        for channel in [SuspensionChannel::Front, SuspensionChannel::Rear] {
            let color = rgb(palette_color(channel_index(channel), color_blind_mode));
            let (dot, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
            ui.painter().circle_filled(dot.center(), 4.0, color);
            ui.label(channel.label());
            ui.add_space(8.0);
        }
        ui.label(
            egui::RichText::new("- - dynamic sag")
                .color(egui::Color32::GRAY)
                .size(12.0),
        );
    });
}

fn render_channel_info(ui: &mut egui::Ui, telemetry: &RunTelemetry, analysis: &RunAnalysis) {
    ui.horizontal(|ui| {
        for channel in [SuspensionChannel::Front, SuspensionChannel::Rear] {
            let data = &telemetry.channel(channel).data;
            let derived: &ChannelAnalysis = analysis.channel(channel);
            let text = if data.is_empty() {
                format!("{}: {}", channel.label(), data.status())
            } else {
                format!(
                    "{}: {} samples @ {} Hz",
                    channel.label(),
                    data.len(),
                    telemetry.channel(channel).frequency
                )
            };

            let response = ui.label(egui::RichText::new(text).size(12.0).color(egui::Color32::GRAY));
            if derived.metadata.has_warnings() {
                response.on_hover_text(derived.metadata.warnings.join("\n"));
            }
            ui.add_space(12.0);
        }
    });
}
