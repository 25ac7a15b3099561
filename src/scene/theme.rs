use egui::Color32;
use serde::{Deserialize, Serialize};

const DEFAULT_STOPS: [Color32; 1] = [Color32::WHITE];
const BEACH_STOPS: [Color32; 2] = [
    Color32::from_rgb(0x7d, 0xd3, 0xfc),
    Color32::from_rgb(0xfe, 0xf9, 0xc3),
];
const MOUNTAINS_STOPS: [Color32; 3] = [
    Color32::from_rgb(0x1e, 0x29, 0x3b),
    Color32::from_rgb(0x58, 0x1c, 0x87),
    Color32::from_rgb(0x33, 0x41, 0x55),
];
const CITYSCAPE_STOPS: [Color32; 2] = [
    Color32::from_rgb(0x11, 0x18, 0x27),
    Color32::from_rgb(0x4b, 0x55, 0x63),
];
const SUNSET_STOPS: [Color32; 3] = [
    Color32::from_rgb(0xf9, 0x73, 0x16),
    Color32::from_rgb(0xec, 0x48, 0x99),
    Color32::from_rgb(0x7e, 0x22, 0xce),
];
const FOREST_STOPS: [Color32; 3] = [
    Color32::from_rgb(0x06, 0x5f, 0x46),
    Color32::from_rgb(0x15, 0x80, 0x3d),
    Color32::from_rgb(0x4a, 0xde, 0x80),
];
const DESERT_STOPS: [Color32; 3] = [
    Color32::from_rgb(0xf5, 0x9e, 0x0b),
    Color32::from_rgb(0xca, 0x8a, 0x04),
    Color32::from_rgb(0xfe, 0xf0, 0x8a),
];
const TROPICAL_STOPS: [Color32; 3] = [
    Color32::from_rgb(0x2d, 0xd4, 0xbf),
    Color32::from_rgb(0x06, 0xb6, 0xd4),
    Color32::from_rgb(0x93, 0xc5, 0xfd),
];
const ARCTIC_STOPS: [Color32; 3] = [
    Color32::from_rgb(0xdb, 0xea, 0xfe),
    Color32::from_rgb(0xbf, 0xdb, 0xfe),
    Color32::WHITE,
];

/// Background preset applied to the whole canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Beach,
    Mountains,
    Cityscape,
    Sunset,
    Forest,
    Desert,
    Tropical,
    Arctic,
}

impl Theme {
    pub const ALL: [Theme; 9] = [
        Theme::Default,
        Theme::Beach,
        Theme::Mountains,
        Theme::Cityscape,
        Theme::Sunset,
        Theme::Forest,
        Theme::Desert,
        Theme::Tropical,
        Theme::Arctic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Default => "Default",
            Theme::Beach => "Beach",
            Theme::Mountains => "Mountains",
            Theme::Cityscape => "Cityscape",
            Theme::Sunset => "Sunset",
            Theme::Forest => "Forest",
            Theme::Desert => "Desert",
            Theme::Tropical => "Tropical",
            Theme::Arctic => "Arctic",
        }
    }

    /// Top-to-bottom gradient stops, evenly spaced.
    pub fn gradient(&self) -> &'static [Color32] {
        match self {
            Theme::Default => &DEFAULT_STOPS,
            Theme::Beach => &BEACH_STOPS,
            Theme::Mountains => &MOUNTAINS_STOPS,
            Theme::Cityscape => &CITYSCAPE_STOPS,
            Theme::Sunset => &SUNSET_STOPS,
            Theme::Forest => &FOREST_STOPS,
            Theme::Desert => &DESERT_STOPS,
            Theme::Tropical => &TROPICAL_STOPS,
            Theme::Arctic => &ARCTIC_STOPS,
        }
    }

    /// The default page shows a dashed guideline.
    pub fn shows_guidelines(&self) -> bool {
        matches!(self, Theme::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_comes_first() {
        assert_eq!(Theme::ALL[0], Theme::default());
        assert_eq!(Theme::ALL.len(), 9);
    }

    #[test]
    fn every_theme_has_a_gradient() {
        for theme in Theme::ALL {
            assert!(!theme.gradient().is_empty(), "{} has no stops", theme.label());
        }
    }

    #[test]
    fn stops_follow_the_canvas_palette() {
        assert_eq!(
            Theme::Forest.gradient(),
            &[
                Color32::from_rgb(0x06, 0x5f, 0x46),
                Color32::from_rgb(0x15, 0x80, 0x3d),
                Color32::from_rgb(0x4a, 0xde, 0x80),
            ]
        );
        assert_eq!(Theme::Desert.gradient()[1], Color32::from_rgb(0xca, 0x8a, 0x04));
        assert_eq!(Theme::Tropical.gradient()[0], Color32::from_rgb(0x2d, 0xd4, 0xbf));
        assert_eq!(Theme::Arctic.gradient().last(), Some(&Color32::WHITE));
    }
}
