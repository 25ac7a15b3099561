pub mod handles;
pub mod theme_swatch;

pub use handles::{ElementHandles, HandleKind};
pub use theme_swatch::ThemeSwatch;
