//! egui painter for the animated travel histogram.

use eframe::egui::{self, pos2, Color32, Sense, Stroke};

use crate::analysis::HistogramBin;
use crate::chart::{HistogramOptions, HistogramView};

const BACKGROUND: Color32 = Color32::from_rgb(30, 30, 30);
const AXIS: Color32 = Color32::from_rgb(80, 80, 80);

/// Bind `bins`, advance the animation and paint. Hover shows a tooltip.
pub fn show_histogram(
    ui: &mut egui::Ui,
    view: &mut HistogramView,
    bins: &[HistogramBin],
    color: Color32,
    width: f32,
) {
    let options = HistogramOptions::default();
    view.render(bins, &options, width);

    let dt = ui.input(|i| i.stable_dt).min(0.1);
    view.tick(dt);
    if view.is_animating() {
        ui.ctx().request_repaint();
    }

    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(width, options.height), Sense::hover());
    let offset = rect.min.to_vec2();
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, BACKGROUND);

    if view.is_empty() && !view.is_animating() {
        view.pointer_left();
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "No data",
            egui::FontId::proportional(14.0),
            Color32::GRAY,
        );
        return;
    }

    let tooltip = match response.hover_pos() {
        Some(pos) => view.hover(pos - offset),
        None => {
            view.pointer_left();
            None
        }
    };

    let hover_color = color.gamma_multiply(1.4);
    for (i, bar) in view.bars().iter().enumerate() {
        let fill = if view.hovered() == Some(i) {
            hover_color
        } else {
            color
        };
        painter.rect_filled(view.bar_rect(bar).translate(offset), 1.0, fill);
    }

    let inner = view.inner_rect().translate(offset);
    painter.line_segment(
        [inner.left_bottom(), inner.right_bottom()],
        Stroke::new(1.0, AXIS),
    );
    painter.line_segment([inner.left_top(), inner.left_bottom()], Stroke::new(1.0, AXIS));

    // Travel axis in quarters
    for i in 0..=4 {
        let value = view.x.domain.0 + (view.x.domain.1 - view.x.domain.0) * i as f64 / 4.0;
        painter.text(
            pos2(view.x.apply(value) + offset.x, inner.bottom() + 4.0),
            egui::Align2::CENTER_TOP,
            format!("{:.0}", value),
            egui::FontId::proportional(10.0),
            Color32::GRAY,
        );
    }
    // Counts are whole numbers
    for i in 0..=2 {
        let value = view.y.domain.1 * i as f64 / 2.0;
        if value.fract() != 0.0 || (i > 0 && value == 0.0) {
            continue;
        }
        painter.text(
            pos2(inner.left() - 4.0, view.y.apply(value) + offset.y),
            egui::Align2::RIGHT_CENTER,
            format!("{:.0}", value),
            egui::FontId::proportional(10.0),
            Color32::GRAY,
        );
    }

    if let Some(tooltip) = tooltip {
        response.on_hover_ui_at_pointer(|ui| {
            ui.label(egui::RichText::new(format!("Count: {}", tooltip.count)).strong());
            ui.label(tooltip.range_label());
            ui.label(format!("{}% of samples", tooltip.percent));
        });
    }
}
