use egui::{Align2, Color32, CursorIcon, FontId, Painter, Pos2, Rect, Stroke, Vec2};

use crate::element::{rotated_bounds, rotated_corners};

pub const RESIZE_HANDLE_SIZE: f32 = 16.0;
pub const BUTTON_SIZE: f32 = 28.0;
const BUTTON_SPACING: f32 = 4.0;
const BUTTON_GAP_ABOVE: f32 = 8.0;

pub const SELECTION_COLOR: Color32 = Color32::from_rgb(59, 130, 246);
const BUTTON_FILL: Color32 = Color32::WHITE;
const BUTTON_HOVER_FILL: Color32 = Color32::from_gray(235);
const DELETE_HOVER_FILL: Color32 = Color32::from_rgb(254, 226, 226);
const DELETE_COLOR: Color32 = Color32::from_rgb(239, 68, 68);

/// Manipulation affordances shown around the selected element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Resize,
    Edit,
    Rotate,
    BringToFront,
    SendToBack,
    Delete,
}

impl HandleKind {
    pub fn icon(&self) -> &'static str {
        match self {
            HandleKind::Resize => "",
            HandleKind::Edit => "✏",
            HandleKind::Rotate => "⟳",
            HandleKind::BringToFront => "⬆",
            HandleKind::SendToBack => "⬇",
            HandleKind::Delete => "🗑",
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            HandleKind::Resize => "Drag to resize",
            HandleKind::Edit => "Edit text",
            HandleKind::Rotate => "Drag to rotate",
            HandleKind::BringToFront => "Bring to front",
            HandleKind::SendToBack => "Send to back",
            HandleKind::Delete => "Delete",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            HandleKind::Resize => CursorIcon::ResizeNwSe,
            HandleKind::Rotate => CursorIcon::Grab,
            _ => CursorIcon::PointingHand,
        }
    }
}

/// Screen-space layout of the handles of one selected element.
///
/// The resize handle sits on the rotated bottom-right corner. The action
/// buttons form an unrotated row above the element's rotated bounds,
/// right-aligned with them.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementHandles {
    outline: [Pos2; 4],
    handles: Vec<(HandleKind, Rect)>,
}

impl ElementHandles {
    pub fn layout(element_rect: Rect, radians: f32, text_editable: bool) -> Self {
        let outline = rotated_corners(element_rect, radians);
        let bounds = rotated_bounds(element_rect, radians);

        let mut buttons = Vec::with_capacity(5);
        if text_editable {
            buttons.push(HandleKind::Edit);
        }
        buttons.extend([
            HandleKind::Rotate,
            HandleKind::BringToFront,
            HandleKind::SendToBack,
            HandleKind::Delete,
        ]);

        let top = bounds.top() - BUTTON_GAP_ABOVE - BUTTON_SIZE;
        let mut right = bounds.right();
        let mut handles = Vec::with_capacity(buttons.len() + 1);
        for kind in buttons.into_iter().rev() {
            let rect = Rect::from_min_max(
                Pos2::new(right - BUTTON_SIZE, top),
                Pos2::new(right, top + BUTTON_SIZE),
            );
            handles.push((kind, rect));
            right -= BUTTON_SIZE + BUTTON_SPACING;
        }
        handles.reverse();

        // outline[2] is the rotated bottom-right corner
        handles.push((
            HandleKind::Resize,
            Rect::from_center_size(outline[2], Vec2::splat(RESIZE_HANDLE_SIZE)),
        ));

        Self { outline, handles }
    }

    pub fn outline(&self) -> [Pos2; 4] {
        self.outline
    }

    pub fn iter(&self) -> impl Iterator<Item = &(HandleKind, Rect)> {
        self.handles.iter()
    }

    pub fn rect_of(&self, kind: HandleKind) -> Option<Rect> {
        self.handles
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, rect)| *rect)
    }

    /// Handle under `pos`, if any.
    pub fn hit(&self, pos: Pos2) -> Option<HandleKind> {
        self.handles.iter().find_map(|(kind, rect)| {
            let hit = match kind {
                HandleKind::Resize => rect.center().distance(pos) <= RESIZE_HANDLE_SIZE * 0.75,
                _ => rect.contains(pos),
            };
            hit.then_some(*kind)
        })
    }

    /// Draw the selection outline and every handle
    pub fn paint(&self, painter: &Painter, hovered: Option<HandleKind>) {
        painter.add(egui::Shape::closed_line(
            self.outline.to_vec(),
            Stroke::new(2.0, SELECTION_COLOR),
        ));

        for (kind, rect) in &self.handles {
            let is_hovered = hovered == Some(*kind);
            match kind {
                HandleKind::Resize => {
                    painter.circle_filled(rect.center(), RESIZE_HANDLE_SIZE / 2.0, SELECTION_COLOR);
                    painter.circle_stroke(
                        rect.center(),
                        RESIZE_HANDLE_SIZE / 2.0,
                        Stroke::new(1.0, Color32::WHITE),
                    );
                }
                _ => {
                    let fill = match (kind, is_hovered) {
                        (HandleKind::Delete, true) => DELETE_HOVER_FILL,
                        (_, true) => BUTTON_HOVER_FILL,
                        _ => BUTTON_FILL,
                    };
                    let icon_color = if *kind == HandleKind::Delete {
                        DELETE_COLOR
                    } else {
                        Color32::from_gray(40)
                    };
                    painter.rect_filled(*rect, 4.0, fill);
                    painter.rect_stroke(*rect, 4.0, Stroke::new(1.0, Color32::from_gray(200)));
                    painter.text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        kind.icon(),
                        FontId::proportional(14.0),
                        icon_color,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn edit_button_only_for_text() {
        let rect = Rect::from_min_size(pos2(100.0, 100.0), vec2(200.0, 50.0));
        let with_edit = ElementHandles::layout(rect, 0.0, true);
        let without_edit = ElementHandles::layout(rect, 0.0, false);
        assert!(with_edit.rect_of(HandleKind::Edit).is_some());
        assert!(without_edit.rect_of(HandleKind::Edit).is_none());
    }

    #[test]
    fn buttons_sit_above_and_right_aligned() {
        let rect = Rect::from_min_size(pos2(100.0, 100.0), vec2(200.0, 50.0));
        let handles = ElementHandles::layout(rect, 0.0, false);
        let delete = handles.rect_of(HandleKind::Delete).unwrap();
        assert_eq!(delete.right(), 300.0);
        assert!(delete.bottom() < 100.0);
        assert_eq!(handles.hit(delete.center()), Some(HandleKind::Delete));
    }

    #[test]
    fn resize_handle_follows_rotation() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0));
        let handles = ElementHandles::layout(rect, std::f32::consts::PI, false);
        // Half a turn puts the bottom-right corner at the top-left
        let resize = handles.rect_of(HandleKind::Resize).unwrap();
        assert!(resize.center().distance(pos2(0.0, 0.0)) < 1e-3);
        assert_eq!(handles.hit(pos2(1.0, 1.0)), Some(HandleKind::Resize));
    }
}
