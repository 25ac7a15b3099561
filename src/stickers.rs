//! The fixed sticker catalog.
//!
//! Travel stickers ship as SVG files compiled into the binary; the colored
//! markers are generated SVG squares. Both are registered with egui under
//! stable `bytes://stickers/...` URIs, which is what sticker elements store
//! as their content.

use egui::Color32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sticker {
    pub name: &'static str,
    pub uri: &'static str,
    bytes: &'static [u8],
}

macro_rules! sticker {
    ($name:literal, $file:literal) => {
        Sticker {
            name: $name,
            uri: concat!("bytes://stickers/", $file),
            bytes: include_bytes!(concat!("../assets/stickers/", $file)),
        }
    };
}

pub const TRAVEL_STICKERS: [Sticker; 12] = [
    sticker!("Airplane", "airplane.svg"),
    sticker!("Beach", "beach.svg"),
    sticker!("Camera", "camera.svg"),
    sticker!("Map", "map.svg"),
    sticker!("Mountain", "mountain.svg"),
    sticker!("Palm Tree", "palm-tree.svg"),
    sticker!("Passport", "passport.svg"),
    sticker!("Sun", "sun.svg"),
    sticker!("Compass", "compass.svg"),
    sticker!("Luggage", "luggage.svg"),
    sticker!("Landmark", "landmark.svg"),
    sticker!("Globe", "globe.svg"),
];

/// A generated rounded-square marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMarker {
    pub name: &'static str,
    pub color: Color32,
}

pub const SHAPE_MARKERS: [ShapeMarker; 7] = [
    ShapeMarker {
        name: "blue",
        color: Color32::from_rgb(0x00, 0x00, 0xff),
    },
    ShapeMarker {
        name: "red",
        color: Color32::from_rgb(0xff, 0x00, 0x00),
    },
    ShapeMarker {
        name: "green",
        color: Color32::from_rgb(0x00, 0x80, 0x00),
    },
    ShapeMarker {
        name: "pink",
        color: Color32::from_rgb(0xff, 0xc0, 0xcb),
    },
    ShapeMarker {
        name: "yellow",
        color: Color32::from_rgb(0xff, 0xff, 0x00),
    },
    ShapeMarker {
        name: "gray",
        color: Color32::from_rgb(0x80, 0x80, 0x80),
    },
    ShapeMarker {
        name: "purple",
        color: Color32::from_rgb(0x80, 0x00, 0x80),
    },
];

impl ShapeMarker {
    pub fn uri(&self) -> String {
        format!("bytes://stickers/marker-{}.svg", self.name)
    }

    pub fn svg(&self) -> String {
        let [r, g, b, _] = self.color.to_array();
        let rgb = format!("#{r:02x}{g:02x}{b:02x}");
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="96" height="96"><rect x="0" y="0" width="24" height="24" rx="4" fill="{rgb}"/></svg>"#
        )
    }
}

/// Make every sticker URI loadable through the context's image loaders.
pub fn register_assets(ctx: &egui::Context) {
    for sticker in &TRAVEL_STICKERS {
        ctx.include_bytes(sticker.uri, sticker.bytes);
    }
    for marker in &SHAPE_MARKERS {
        ctx.include_bytes(marker.uri(), marker.svg().into_bytes());
    }
    log::debug!(
        "Registered {} stickers and {} markers",
        TRAVEL_STICKERS.len(),
        SHAPE_MARKERS.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_svg_uses_opaque_rgb() {
        let svg = SHAPE_MARKERS[0].svg();
        assert!(svg.contains(r##"fill="#0000ff""##), "{svg}");
    }

    #[test]
    fn sticker_uris_are_unique_svgs() {
        let mut uris: Vec<String> = TRAVEL_STICKERS.iter().map(|s| s.uri.to_owned()).collect();
        uris.extend(SHAPE_MARKERS.iter().map(ShapeMarker::uri));
        let count = uris.len();
        uris.sort();
        uris.dedup();
        assert_eq!(uris.len(), count);
        assert!(uris.iter().all(|uri| uri.ends_with(".svg")));
        assert!(TRAVEL_STICKERS.iter().all(|s| s.bytes.starts_with(b"<svg")));
    }
}
