use eframe::egui;

use crate::renderer::gradient_mesh;
use crate::scene::Theme;

/// Clickable gradient preview of a theme
pub struct ThemeSwatch {
    pub theme: Theme,
    pub selected: bool,
}

impl ThemeSwatch {
    pub fn new(theme: Theme, selected: bool) -> Self {
        Self { theme, selected }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let size = egui::vec2(80.0, 56.0);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.add(egui::Shape::mesh(gradient_mesh(rect, self.theme.gradient())));

            let label_rect = egui::Rect::from_min_max(
                egui::pos2(rect.left(), rect.bottom() - 18.0),
                rect.max,
            );
            painter.rect_filled(label_rect, 0.0, egui::Color32::from_black_alpha(110));
            painter.text(
                label_rect.center(),
                egui::Align2::CENTER_CENTER,
                self.theme.label(),
                egui::FontId::proportional(12.0),
                egui::Color32::WHITE,
            );

            let stroke = if self.selected {
                egui::Stroke::new(3.0, egui::Color32::from_rgb(59, 130, 246))
            } else if response.hovered() {
                egui::Stroke::new(1.0, egui::Color32::from_gray(120))
            } else {
                egui::Stroke::new(1.0, egui::Color32::from_gray(200))
            };
            painter.rect_stroke(rect, 4.0, stroke);
        }

        response.on_hover_text(self.theme.label())
    }
}
