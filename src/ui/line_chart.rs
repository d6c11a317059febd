//! egui_plot rendition of the focus + context line chart.
//!
//! [`DualViewChart`] owns the data, the scales and the brush. This module
//! draws its paths into two plots and turns pointer gestures on the context
//! plot into brush events.

use eframe::egui::{self, Color32, Stroke};
use egui_plot::{
    Line, LineStyle as PlotLineStyle, Plot, PlotBounds, PlotPoints, PlotUi, Polygon, VLine,
};

use crate::chart::dual_view::{BrushDrag, BrushGrab, SeriesPath};
use crate::chart::{BrushEvent, BrushPhase, DualViewChart};
use crate::series::NormalizedPoint;
use crate::state::CONTEXT_TOP_OFFSET;

const BRUSH_FILL: Color32 = Color32::from_rgba_premultiplied(24, 24, 24, 24);
const BRUSH_EDGE: Color32 = Color32::from_rgba_premultiplied(120, 120, 120, 120);

/// A chart plus the brush gesture in progress
pub struct LineChartView {
    pub chart: DualViewChart,
    id: egui::Id,
    drag: Option<BrushDrag>,
}

impl LineChartView {
    pub fn new(id_salt: impl std::hash::Hash) -> Self {
        Self {
            chart: DualViewChart::new(),
            id: egui::Id::new(id_salt),
            drag: None,
        }
    }

    /// Draw both panels at the chart's rendered size and handle brush gestures
    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let (width, height) = self.chart.size();
        let focus_height = (height - CONTEXT_TOP_OFFSET - ui.spacing().item_spacing.y).max(0.0);

        let focus = Plot::new(self.id.with("focus"))
            .width(width)
            .height(focus_height)
            .y_axis_label("Travel (%)")
            .show_axes([true, true])
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(bounds(self.chart.x.domain, self.chart.y.domain));
                for path in self.chart.paths() {
                    draw_path(plot_ui, path, &path.focus);
                }
            });

        let context = Plot::new(self.id.with("context"))
            .width(width)
            .height(CONTEXT_TOP_OFFSET)
            .show_axes([true, false])
            .show_x(false)
            .show_y(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .show(ui, |plot_ui| {
                let (ylo, yhi) = self.chart.y2.domain;
                plot_ui.set_plot_bounds(bounds(self.chart.x2.domain, (ylo, yhi)));
                for path in self.chart.paths() {
                    draw_path(plot_ui, path, &path.context);
                }

                if let Some((a, b)) = self.chart.brush() {
                    let corners: PlotPoints = vec![[a, ylo], [b, ylo], [b, yhi], [a, yhi]].into();
                    plot_ui.polygon(
                        Polygon::new("Brush", corners)
                            .fill_color(BRUSH_FILL)
                            .stroke(Stroke::NONE),
                    );
                    for edge in [a, b] {
                        plot_ui.vline(VLine::new("Brush", edge).color(BRUSH_EDGE).width(1.0));
                    }
                }
            });

        self.chart
            .place(*focus.transform.frame(), *context.transform.frame());
        self.handle_pointer(ui, &context.response);
        context.response
    }

    fn handle_pointer(&mut self, ui: &egui::Ui, response: &egui::Response) {
        if response.drag_started() {
            let press = ui
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            self.drag = press.and_then(|p| self.chart.begin_drag(p.x));
        }

        if let Some(mut drag) = self.drag.take() {
            let x = response
                .interact_pointer_pos()
                .map_or(drag.current(), |p| p.x);
            if response.drag_stopped() {
                self.chart.update_drag(&mut drag, x, BrushPhase::End);
            } else {
                if response.dragged() {
                    self.chart.update_drag(&mut drag, x, BrushPhase::Move);
                }
                self.drag = Some(drag);
                ui.ctx().request_repaint();
            }
        } else if response.clicked() || response.double_clicked() {
            // A click off the brush clears it
            let on_brush = response
                .interact_pointer_pos()
                .and_then(|p| self.chart.grab_at(p.x));
            if on_brush == Some(BrushGrab::New) {
                self.chart.handle_brush(BrushEvent::user(BrushPhase::End, None));
            }
        }

        let grab = match &self.drag {
            Some(drag) => Some(drag.grab),
            None => response.hover_pos().and_then(|p| self.chart.grab_at(p.x)),
        };
        if let Some(grab) = grab {
            ui.ctx().set_cursor_icon(match grab {
                BrushGrab::Lower | BrushGrab::Upper => egui::CursorIcon::ResizeHorizontal,
                BrushGrab::Body if self.drag.is_some() => egui::CursorIcon::Grabbing,
                BrushGrab::Body => egui::CursorIcon::Grab,
                BrushGrab::New => egui::CursorIcon::Crosshair,
            });
        }
    }
}

/// Plot bounds for a data window, widened when it has no extent
fn bounds((xlo, xhi): (f64, f64), (ylo, yhi): (f64, f64)) -> PlotBounds {
    let xhi = if xhi > xlo { xhi } else { xlo + 1.0 };
    let yhi = if yhi > ylo { yhi } else { ylo + 1.0 };
    PlotBounds::from_min_max([xlo, ylo], [xhi, yhi])
}

fn draw_path(plot_ui: &mut PlotUi, path: &SeriesPath, segments: &[Vec<NormalizedPoint>]) {
    let style = path.style;
    for segment in segments.iter().filter(|s| !s.is_empty()) {
        let points: PlotPoints = segment.iter().map(|p| [p.x, p.y]).collect();
        let mut line = Line::new(style.name, points)
            .color(style.color)
            .width(style.width);
        if style.dashed {
            line = line.style(PlotLineStyle::dashed_loose());
        }
        plot_ui.line(line);
    }
}
