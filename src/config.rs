use std::path::PathBuf;

use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::element::TextStyle;

/// Storage key for the editor settings. The scene itself is never stored.
pub const CONFIG_KEY: &str = "travelstory_config";

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Initial values of the text tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDefaults {
    pub content: String,
    pub style: TextStyle,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            content: "Your text here".to_owned(),
            style: TextStyle {
                font_size: 24.0,
                ..TextStyle::default()
            },
        }
    }
}

/// User-editable settings, restored between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // new fields fall back to their defaults when loading old settings
pub struct EditorConfig {
    pub canvas_size: Vec2,
    pub export_dir: PathBuf,
    pub pdf_file_name: String,
    pub video_file_name: String,
    pub video_fps: u32,
    pub video_duration_secs: u32,
    /// Capture resolution relative to logical canvas pixels
    pub capture_scale: f32,
    pub max_upload_bytes: u64,
    pub text_defaults: TextDefaults,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: Vec2::new(800.0, 600.0),
            export_dir: PathBuf::from("."),
            pdf_file_name: "travelstory-journal.pdf".to_owned(),
            video_file_name: "travelstory-video.mp4".to_owned(),
            video_fps: 30,
            video_duration_secs: 8,
            capture_scale: 2.0,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            text_defaults: TextDefaults::default(),
        }
    }
}

impl EditorConfig {
    /// Restore settings from eframe storage, or defaults.
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        storage
            .and_then(|storage| eframe::get_value::<Self>(storage, CONFIG_KEY))
            .map(Self::sanitized)
            .unwrap_or_default()
    }

    pub fn save(&self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, CONFIG_KEY, self);
    }

    /// Replace out-of-range values that older or hand-edited settings may carry.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.canvas_size.x >= 100.0 && self.canvas_size.y >= 100.0) {
            self.canvas_size = defaults.canvas_size;
        }
        if self.video_fps == 0 {
            self.video_fps = defaults.video_fps;
        }
        if self.video_duration_secs == 0 {
            self.video_duration_secs = defaults.video_duration_secs;
        }
        if !(self.capture_scale >= 1.0 && self.capture_scale <= 4.0) {
            self.capture_scale = defaults.capture_scale;
        }
        if self.pdf_file_name.trim().is_empty() {
            self.pdf_file_name = defaults.pdf_file_name;
        }
        if self.video_file_name.trim().is_empty() {
            self.video_file_name = defaults.video_file_name;
        }
        self
    }

    /// Settings window contents
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("editor_config_grid")
            .num_columns(2)
            .spacing([24.0, 6.0])
            .show(ui, |ui| {
                ui.label("Canvas width");
                ui.add(egui::DragValue::new(&mut self.canvas_size.x).range(100.0..=4000.0));
                ui.end_row();

                ui.label("Canvas height");
                ui.add(egui::DragValue::new(&mut self.canvas_size.y).range(100.0..=4000.0));
                ui.end_row();

                ui.label("Export folder");
                let mut dir = self.export_dir.display().to_string();
                if ui.text_edit_singleline(&mut dir).changed() {
                    self.export_dir = PathBuf::from(dir);
                }
                ui.end_row();

                ui.label("PDF file name");
                ui.text_edit_singleline(&mut self.pdf_file_name);
                ui.end_row();

                ui.label("Video file name");
                ui.text_edit_singleline(&mut self.video_file_name);
                ui.end_row();

                ui.label("Video FPS");
                ui.add(egui::DragValue::new(&mut self.video_fps).range(1..=120));
                ui.end_row();

                ui.label("Video duration (s)");
                ui.add(egui::DragValue::new(&mut self.video_duration_secs).range(1..=600));
                ui.end_row();

                ui.label("Capture scale");
                ui.add(egui::Slider::new(&mut self.capture_scale, 1.0..=4.0));
                ui.end_row();

                ui.label("Upload limit (MiB)");
                let mut mib = self.max_upload_bytes / (1024 * 1024);
                if ui
                    .add(egui::DragValue::new(&mut mib).range(1..=512))
                    .changed()
                {
                    self.max_upload_bytes = mib * 1024 * 1024;
                }
                ui.end_row();
            });

        if ui.button("Restore defaults").clicked() {
            *self = Self::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{"video_fps": 60}"#).unwrap();
        assert_eq!(config.video_fps, 60);
        assert_eq!(config.pdf_file_name, "travelstory-journal.pdf");
        assert_eq!(config.text_defaults.style.font_size, 24.0);
    }

    #[test]
    fn sanitize_repairs_bad_values() {
        let config = EditorConfig {
            video_fps: 0,
            capture_scale: f32::NAN,
            canvas_size: Vec2::new(10.0, 600.0),
            ..EditorConfig::default()
        }
        .sanitized();
        assert_eq!(config, EditorConfig::default());
    }
}
