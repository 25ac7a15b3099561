use egui::emath::Rot2;
use egui::{Pos2, Rect, Vec2};

// Common constants for all element kinds
pub const MIN_ELEMENT_SIZE: f32 = 30.0;
pub const DEFAULT_ANCHOR: Pos2 = Pos2::new(100.0, 100.0);
pub const TEXT_ELEMENT_SIZE: Vec2 = Vec2::new(200.0, 50.0);
pub const STICKER_ELEMENT_SIZE: Vec2 = Vec2::new(100.0, 100.0);

/// Clamps a size so neither axis drops below [`MIN_ELEMENT_SIZE`].
pub fn clamp_size(size: Vec2) -> Vec2 {
    size.max(Vec2::splat(MIN_ELEMENT_SIZE))
}

/// Maps any angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Rotates `point` around `center` by `radians` (clockwise on screen, y points down).
pub fn rotate_about(point: Pos2, center: Pos2, radians: f32) -> Pos2 {
    center + Rot2::from_angle(radians) * (point - center)
}

/// Corners of `rect` rotated around its center, in top-left, top-right,
/// bottom-right, bottom-left order.
pub fn rotated_corners(rect: Rect, radians: f32) -> [Pos2; 4] {
    let center = rect.center();
    [
        rotate_about(rect.left_top(), center, radians),
        rotate_about(rect.right_top(), center, radians),
        rotate_about(rect.right_bottom(), center, radians),
        rotate_about(rect.left_bottom(), center, radians),
    ]
}

/// Axis-aligned bounds of `rect` after rotating it around its center.
pub fn rotated_bounds(rect: Rect, radians: f32) -> Rect {
    let corners = rotated_corners(rect, radians);
    let mut bounds = Rect::NOTHING;
    for corner in corners {
        bounds.extend_with(corner);
    }
    bounds
}

/// Hit test against `rect` rotated around its center.
pub fn rotated_rect_contains(rect: Rect, radians: f32, pos: Pos2) -> bool {
    rect.contains(rotate_about(pos, rect.center(), -radians))
}

/// Largest size with the aspect ratio of `native` that fits inside `frame`.
pub fn fit_contain(native: Vec2, frame: Vec2) -> Vec2 {
    if native.x <= 0.0 || native.y <= 0.0 {
        return frame;
    }
    let scale = (frame.x / native.x).min(frame.y / native.y);
    native * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn normalizes_negative_and_large_angles() {
        assert_eq!(normalize_degrees(405.0), 45.0);
        assert_eq!(normalize_degrees(-315.0), 45.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert!(normalize_degrees(-1e-7) < 360.0);
    }

    #[test]
    fn clamp_size_respects_minimum() {
        assert_eq!(clamp_size(vec2(-100.0, 12.0)), vec2(30.0, 30.0));
        assert_eq!(clamp_size(vec2(250.0, 40.0)), vec2(250.0, 40.0));
    }

    #[test]
    fn rotated_hit_test_follows_rotation() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 20.0));
        // Far right end of the unrotated bar
        let point = pos2(190.0, 10.0);
        assert!(rotated_rect_contains(rect, 0.0, point));
        // A quarter turn stands the bar upright around (100, 10)
        assert!(!rotated_rect_contains(rect, std::f32::consts::FRAC_PI_2, point));
        assert!(rotated_rect_contains(rect, std::f32::consts::FRAC_PI_2, pos2(100.0, 95.0)));
    }

    #[test]
    fn fit_contain_keeps_aspect() {
        let fitted = fit_contain(vec2(400.0, 200.0), vec2(100.0, 100.0));
        assert!((fitted.x - 100.0).abs() < 1e-4);
        assert!((fitted.y - 50.0).abs() < 1e-4);
    }
}
