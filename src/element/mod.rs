use egui::{Color32, FontFamily, FontId, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod common;

pub use common::{
    clamp_size, fit_contain, normalize_degrees, rotate_about, rotated_bounds, rotated_corners,
    rotated_rect_contains, DEFAULT_ANCHOR, MIN_ELEMENT_SIZE, STICKER_ELEMENT_SIZE,
    TEXT_ELEMENT_SIZE,
};

/// Opaque identifier of a placed element, assigned once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// What an element shows. Fixed for the element's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// `content` is the literal string shown.
    Text,
    /// `content` is an image URI.
    Image,
    /// `content` is an image URI from the sticker catalog.
    Sticker,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Sticker => "sticker",
        }
    }

    /// Only text content can be edited in place.
    pub fn supports_text_edit(&self) -> bool {
        matches!(self, ElementKind::Text)
    }
}

/// The font families offered by the text tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontChoice {
    #[default]
    Arial,
    TimesNewRoman,
    CourierNew,
    Georgia,
    Verdana,
}

impl FontChoice {
    pub const ALL: [FontChoice; 5] = [
        FontChoice::Arial,
        FontChoice::TimesNewRoman,
        FontChoice::CourierNew,
        FontChoice::Georgia,
        FontChoice::Verdana,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FontChoice::Arial => "Arial",
            FontChoice::TimesNewRoman => "Times New Roman",
            FontChoice::CourierNew => "Courier New",
            FontChoice::Georgia => "Georgia",
            FontChoice::Verdana => "Verdana",
        }
    }

    /// egui only ships a proportional and a monospace family
    pub fn family(&self) -> FontFamily {
        match self {
            FontChoice::CourierNew => FontFamily::Monospace,
            _ => FontFamily::Proportional,
        }
    }
}

/// Styling for text elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f32,
    pub font_family: FontChoice,
    pub font_color: Color32,
}

impl Default for TextStyle {
    /// Used for text elements that were created without styling.
    fn default() -> Self {
        Self {
            font_size: 16.0,
            font_family: FontChoice::Arial,
            font_color: Color32::BLACK,
        }
    }
}

impl TextStyle {
    pub fn font_id(&self) -> FontId {
        FontId::new(self.font_size, self.font_family.family())
    }
}

/// A placed object on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    pub id: ElementId,
    pub kind: ElementKind,
    pub content: String,
    /// Top-left corner in canvas-local pixels.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees, stored as committed by the last gesture (not normalized).
    pub rotation: f32,
    pub z_index: i64,
    pub text_style: Option<TextStyle>,
}

impl CanvasElement {
    pub fn position(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Unrotated rectangle in canvas-local coordinates.
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position(), self.size())
    }

    pub fn center(&self) -> Pos2 {
        self.rect().center()
    }

    pub fn rotation_radians(&self) -> f32 {
        normalize_degrees(self.rotation).to_radians()
    }

    /// Hit test in canvas-local coordinates, honoring rotation.
    pub fn contains(&self, pos: Pos2) -> bool {
        rotated_rect_contains(self.rect(), self.rotation_radians(), pos)
    }

    /// Text style with the defaults applied for unstyled text.
    pub fn effective_text_style(&self) -> TextStyle {
        self.text_style.unwrap_or_default()
    }
}

/// Everything an element needs except `id` and `z_index`, which the
/// scene assigns on insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDraft {
    pub kind: ElementKind,
    pub content: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub text_style: Option<TextStyle>,
}

impl ElementDraft {
    /// Text at the default anchor with the fixed text box size.
    pub fn text(content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            kind: ElementKind::Text,
            content: content.into(),
            x: DEFAULT_ANCHOR.x,
            y: DEFAULT_ANCHOR.y,
            width: TEXT_ELEMENT_SIZE.x,
            height: TEXT_ELEMENT_SIZE.y,
            rotation: 0.0,
            text_style: Some(style),
        }
    }

    pub fn image(uri: impl Into<String>, size: Vec2) -> Self {
        let size = clamp_size(size);
        Self {
            kind: ElementKind::Image,
            content: uri.into(),
            x: DEFAULT_ANCHOR.x,
            y: DEFAULT_ANCHOR.y,
            width: size.x,
            height: size.y,
            rotation: 0.0,
            text_style: None,
        }
    }

    pub fn sticker(uri: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Sticker,
            content: uri.into(),
            x: DEFAULT_ANCHOR.x,
            y: DEFAULT_ANCHOR.y,
            width: STICKER_ELEMENT_SIZE.x,
            height: STICKER_ELEMENT_SIZE.y,
            rotation: 0.0,
            text_style: None,
        }
    }

    pub fn at(mut self, position: Pos2) -> Self {
        self.x = position.x;
        self.y = position.y;
        self
    }

    pub fn into_element(self, id: ElementId, z_index: i64) -> CanvasElement {
        CanvasElement {
            id,
            kind: self.kind,
            content: self.content,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
            z_index,
            text_style: self.text_style,
        }
    }
}

/// A partial update merged into an element. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub content: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub text_style: Option<TextStyle>,
}

impl ElementPatch {
    pub fn position(pos: Pos2) -> Self {
        Self {
            x: Some(pos.x),
            y: Some(pos.y),
            ..Default::default()
        }
    }

    pub fn size(size: Vec2) -> Self {
        Self {
            width: Some(size.x),
            height: Some(size.y),
            ..Default::default()
        }
    }

    pub fn rotation(degrees: f32) -> Self {
        Self {
            rotation: Some(degrees),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn text_style(style: TextStyle) -> Self {
        Self {
            text_style: Some(style),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `element`; later writes win on overlapping fields.
    pub fn apply_to(&self, element: &mut CanvasElement) {
        if let Some(content) = &self.content {
            element.content.clone_from(content);
        }
        if let Some(x) = self.x {
            element.x = x;
        }
        if let Some(y) = self.y {
            element.y = y;
        }
        if let Some(width) = self.width {
            element.width = width;
        }
        if let Some(height) = self.height {
            element.height = height;
        }
        if let Some(rotation) = self.rotation {
            element.rotation = rotation;
        }
        if let Some(style) = self.text_style {
            element.text_style = Some(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn patch_only_touches_given_fields() {
        let mut element = ElementDraft::sticker("bytes://stickers/sun.svg")
            .into_element(ElementId::new(), 3);
        ElementPatch::position(pos2(12.0, 34.0)).apply_to(&mut element);

        assert_eq!(element.position(), pos2(12.0, 34.0));
        assert_eq!(element.size(), vec2(100.0, 100.0));
        assert_eq!(element.z_index, 3);
        assert_eq!(element.content, "bytes://stickers/sun.svg");
    }

    #[test]
    fn image_draft_never_goes_below_minimum() {
        let draft = ElementDraft::image("bytes://upload/a.png", vec2(400.0, 4.0));
        assert_eq!(draft.width, 400.0);
        assert_eq!(draft.height, MIN_ELEMENT_SIZE);
    }

    #[test]
    fn unstyled_text_falls_back_to_defaults() {
        let mut draft = ElementDraft::text("hello", TextStyle::default());
        draft.text_style = None;
        let element = draft.into_element(ElementId::new(), 0);
        let style = element.effective_text_style();
        assert_eq!(style.font_size, 16.0);
        assert_eq!(style.font_color, Color32::BLACK);
    }

    #[test]
    fn ids_render_as_hyphenated_uuids() {
        let id = ElementId::new();
        assert_eq!(id.to_string().len(), 36);
    }
}
