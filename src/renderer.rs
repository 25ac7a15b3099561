use eframe::egui::{self, epaint, Color32, Pos2, Rect, Shape, Stroke, Vec2};

use crate::element::{fit_contain, rotate_about, rotated_corners, CanvasElement, ElementKind};
use crate::scene::{Scene, Theme};

const GUIDELINE_INSET: f32 = 20.0;
const GUIDELINE_COLOR: Color32 = Color32::from_rgba_premultiplied(64, 64, 64, 77);
const BACKDROP_GRID_SPACING: f32 = 20.0;
const PLACEHOLDER_COLOR: Color32 = Color32::from_gray(225);
const DRAGGING_OPACITY: f32 = 0.9;

/// Where and how one element is painted, in screen space.
///
/// Built from the stored element with its rotation normalized, so two
/// elements that differ only by whole turns produce the same transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTransform {
    pub rect: Rect,
    /// Radians in `[0, TAU)`, clockwise on screen
    pub angle: f32,
    pub opacity: f32,
    /// Applied to font sizes, for scaled-down copies of the page
    pub font_scale: f32,
}

impl RenderTransform {
    /// Transform for `element` on a canvas whose top-left is at `origin`.
    pub fn for_element(element: &CanvasElement, origin: Pos2) -> Self {
        Self {
            rect: element.rect().translate(origin.to_vec2()),
            angle: element.rotation_radians(),
            opacity: 1.0,
            font_scale: 1.0,
        }
    }

    /// Override the position (canvas-local), e.g. with a drag preview
    pub fn at(mut self, position: Pos2, origin: Pos2) -> Self {
        self.rect = Rect::from_min_size(origin + position.to_vec2(), self.rect.size());
        self
    }

    pub fn dragging(mut self) -> Self {
        self.opacity *= DRAGGING_OPACITY;
        self
    }

    /// Scale about the center and fade
    pub fn animated(mut self, opacity: f32, scale: f32) -> Self {
        self.rect = Rect::from_center_size(self.rect.center(), self.rect.size() * scale);
        self.opacity *= opacity;
        self
    }

    /// Shrink toward `origin` by `factor`, text included
    pub fn scaled(mut self, origin: Pos2, factor: f32) -> Self {
        self.rect = Rect::from_min_max(
            origin + (self.rect.min - origin) * factor,
            origin + (self.rect.max - origin) * factor,
        );
        self.font_scale *= factor;
        self
    }

    pub fn corners(&self) -> [Pos2; 4] {
        rotated_corners(self.rect, self.angle)
    }
}

/// Paint the faint grid behind the canvas
pub fn paint_backdrop(painter: &egui::Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_gray(248));
    let stroke = Stroke::new(1.0, Color32::from_black_alpha(13));
    let mut x = rect.left();
    while x <= rect.right() {
        painter.vline(x, rect.y_range(), stroke);
        x += BACKDROP_GRID_SPACING;
    }
    let mut y = rect.top();
    while y <= rect.bottom() {
        painter.hline(rect.x_range(), y, stroke);
        y += BACKDROP_GRID_SPACING;
    }
}

/// Vertical gradient mesh through the theme's stops
pub fn gradient_mesh(rect: Rect, stops: &[Color32]) -> epaint::Mesh {
    let mut mesh = epaint::Mesh::default();
    match stops {
        [] => {}
        [single] => mesh.add_colored_rect(rect, *single),
        _ => {
            let segments = (stops.len() - 1) as f32;
            for (i, color) in stops.iter().enumerate() {
                let y = rect.top() + rect.height() * i as f32 / segments;
                mesh.colored_vertex(Pos2::new(rect.left(), y), *color);
                mesh.colored_vertex(Pos2::new(rect.right(), y), *color);
            }
            for i in 0..(stops.len() as u32 - 1) {
                let top = i * 2;
                mesh.add_triangle(top, top + 1, top + 2);
                mesh.add_triangle(top + 1, top + 2, top + 3);
            }
        }
    }
    mesh
}

/// Themed canvas background, scaled about its center by `scale`
pub fn paint_background(painter: &egui::Painter, rect: Rect, theme: Theme, scale: f32) {
    let rect = Rect::from_center_size(rect.center(), rect.size() * scale);
    painter.add(Shape::rect_filled(
        rect.translate(Vec2::new(0.0, 4.0)).expand(2.0),
        8.0,
        Color32::from_black_alpha(20),
    ));
    painter.add(Shape::mesh(gradient_mesh(rect, theme.gradient())));

    if theme.shows_guidelines() {
        let inner = rect.shrink(GUIDELINE_INSET);
        let outline = [
            inner.left_top(),
            inner.right_top(),
            inner.right_bottom(),
            inner.left_bottom(),
            inner.left_top(),
        ];
        painter.extend(Shape::dashed_line(
            &outline,
            Stroke::new(1.0, GUIDELINE_COLOR),
            6.0,
            4.0,
        ));
    }
}

/// Largest scale at which a page of `canvas_size` fits in `available`.
pub fn preview_scale(canvas_size: Vec2, available: Vec2) -> f32 {
    if canvas_size.x <= 0.0 || canvas_size.y <= 0.0 {
        return 0.0;
    }
    (available.x / canvas_size.x).min(available.y / canvas_size.y).max(0.0)
}

/// Paint a scaled copy of the page into `rect`. Handles, drag previews
/// and animations are left out.
pub fn paint_preview(ui: &mut egui::Ui, rect: Rect, scene: &Scene, canvas_size: Vec2) {
    let scale = preview_scale(canvas_size, rect.size());
    let painter = ui.painter();
    painter.add(Shape::mesh(gradient_mesh(rect, scene.theme().gradient())));
    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::from_gray(210)));

    let previous_clip = ui.clip_rect();
    ui.set_clip_rect(previous_clip.intersect(rect));
    for element in scene.sorted_by_z() {
        let transform = RenderTransform::for_element(element, rect.min).scaled(rect.min, scale);
        paint_element(ui, element, transform);
    }
    ui.set_clip_rect(previous_clip);
}

/// Paint one element with `transform`
pub fn paint_element(ui: &egui::Ui, element: &CanvasElement, transform: RenderTransform) {
    match element.kind {
        ElementKind::Text => paint_text(ui.painter(), element, transform),
        ElementKind::Image | ElementKind::Sticker => paint_image(ui, element, transform),
    }
}

fn paint_text(painter: &egui::Painter, element: &CanvasElement, transform: RenderTransform) {
    let style = element.effective_text_style();
    let color = style.font_color.gamma_multiply(transform.opacity);
    let mut font_id = style.font_id();
    font_id.size *= transform.font_scale;
    let galley = painter.layout(
        element.content.clone(),
        font_id,
        color,
        transform.rect.width(),
    );

    // The text box clips its content; only practical while unrotated
    let painter = if transform.angle == 0.0 {
        painter.with_clip_rect(painter.clip_rect().intersect(transform.rect))
    } else {
        painter.clone()
    };

    let anchor = rotate_about(transform.rect.min, transform.rect.center(), transform.angle);
    painter.add(epaint::TextShape::new(anchor, galley, color).with_angle(transform.angle));
}

fn paint_image(ui: &egui::Ui, element: &CanvasElement, transform: RenderTransform) {
    let image = egui::Image::new(element.content.as_str());
    match image.load_for_size(ui.ctx(), transform.rect.size()) {
        Ok(egui::load::TexturePoll::Ready { texture }) => {
            // Fit inside the element box, like object-fit: contain
            let fitted = fit_contain(texture.size, transform.rect.size());
            let rect = Rect::from_center_size(transform.rect.center(), fitted);
            image
                .rotate(transform.angle, Vec2::splat(0.5))
                .tint(Color32::WHITE.gamma_multiply(transform.opacity))
                .paint_at(ui, rect);
        }
        Ok(egui::load::TexturePoll::Pending { .. }) => {
            paint_placeholder(ui.painter(), transform, None);
            ui.ctx().request_repaint();
        }
        Err(err) => {
            log::debug!("Failed to load {}: {}", element.content, err);
            paint_placeholder(ui.painter(), transform, Some("⚠"));
        }
    }
}

fn paint_placeholder(painter: &egui::Painter, transform: RenderTransform, icon: Option<&str>) {
    painter.add(Shape::convex_polygon(
        transform.corners().to_vec(),
        PLACEHOLDER_COLOR.gamma_multiply(transform.opacity),
        Stroke::NONE,
    ));
    if let Some(icon) = icon {
        painter.text(
            transform.rect.center(),
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(20.0),
            Color32::from_gray(120),
        );
    }
}
