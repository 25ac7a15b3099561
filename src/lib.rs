#![warn(clippy::all, rust_2018_idioms)]

pub mod animation;
pub mod app;
pub mod command;
pub mod config;
pub mod element;
pub mod error;
pub mod export;
pub mod file_handler;
pub mod image_import;
pub mod interaction;
pub mod notifications;
pub mod panels;
pub mod renderer;
pub mod save;
pub mod scene;
pub mod stickers;
pub mod widgets;

pub use app::TravelStoryApp;
pub use command::Command;
pub use config::EditorConfig;
pub use element::{CanvasElement, ElementDraft, ElementId, ElementKind, ElementPatch};
pub use error::{DecodeError, ExportError};
pub use interaction::{GestureState, InteractionController};
pub use scene::{Scene, SceneStore, Theme};
