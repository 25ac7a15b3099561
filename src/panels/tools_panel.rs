use std::path::PathBuf;

use eframe::egui;

use crate::config::EditorConfig;
use crate::element::{ElementDraft, FontChoice, TextStyle};
use crate::image_import::{PendingDecode, UploadSource, ALLOWED_EXTENSIONS};
use crate::notifications::Notifications;
use crate::scene::{SceneStore, Theme};
use crate::stickers::{SHAPE_MARKERS, TRAVEL_STICKERS};
use crate::widgets::ThemeSwatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolTab {
    #[default]
    Text,
    Image,
    Stickers,
    Theme,
}

impl ToolTab {
    pub const ALL: [ToolTab; 4] = [ToolTab::Text, ToolTab::Image, ToolTab::Stickers, ToolTab::Theme];

    pub fn label(&self) -> &'static str {
        match self {
            ToolTab::Text => "🔤 Text",
            ToolTab::Image => "🖼 Image",
            ToolTab::Stickers => "⭐ Stickers",
            ToolTab::Theme => "🎨 Theme",
        }
    }
}

/// Producer of new elements and theme changes. Never reads element geometry.
#[derive(Debug)]
pub struct ToolPanel {
    tab: ToolTab,
    text_content: String,
    text_style: TextStyle,
    image_path: String,
    pending: Vec<PendingDecode>,
}

impl ToolPanel {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            tab: ToolTab::default(),
            text_content: config.text_defaults.content.clone(),
            text_style: config.text_defaults.style,
            image_path: String::new(),
            pending: Vec::new(),
        }
    }

    pub fn tab(&self) -> ToolTab {
        self.tab
    }

    /// Draft the text tool would add right now
    pub fn text_draft(&self) -> ElementDraft {
        ElementDraft::text(self.text_content.clone(), self.text_style)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Start decoding uploads in the background
    pub fn queue_uploads(
        &mut self,
        sources: impl IntoIterator<Item = UploadSource>,
        config: &EditorConfig,
        ctx: &egui::Context,
    ) {
        for source in sources {
            log::info!("Importing {}", source.name());
            self.pending
                .push(PendingDecode::spawn(source, config.max_upload_bytes, ctx));
        }
    }

    /// Place every upload whose decode has finished. Failed decodes are
    /// reported and leave the scene alone.
    pub fn poll_decodes(
        &mut self,
        ctx: &egui::Context,
        store: &SceneStore,
        notifications: &mut Notifications,
        now: f64,
    ) {
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for mut pending in self.pending.drain(..) {
            match pending.poll() {
                None => still_pending.push(pending),
                Some(Ok(decoded)) => {
                    ctx.include_bytes(decoded.uri.clone(), decoded.bytes.clone());
                    store.add_element(decoded.draft());
                }
                Some(Err(err)) => {
                    log::warn!("Rejected upload {}: {}", pending.name(), err);
                    notifications.error("Could not add image", err.to_string(), now);
                }
            }
        }
        self.pending = still_pending;
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        store: &SceneStore,
        config: &EditorConfig,
    ) {
        egui::SidePanel::left("tools_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for tab in ToolTab::ALL {
                        ui.selectable_value(&mut self.tab, tab, tab.label());
                    }
                });
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| match self.tab {
                    ToolTab::Text => self.text_tab(ui, store),
                    ToolTab::Image => self.image_tab(ui, config),
                    ToolTab::Stickers => Self::stickers_tab(ui, store),
                    ToolTab::Theme => Self::theme_tab(ui, store),
                });

                ui.separator();
                let clear = egui::Button::new(
                    egui::RichText::new("🗑 Clear Canvas").color(egui::Color32::WHITE),
                )
                .fill(egui::Color32::from_rgb(220, 38, 38))
                .min_size(egui::vec2(ui.available_width(), 28.0));
                if ui.add(clear).clicked() {
                    store.clear_canvas();
                }
            });
    }

    fn text_tab(&mut self, ui: &mut egui::Ui, store: &SceneStore) {
        ui.label("Text Content");
        ui.add(egui::TextEdit::singleline(&mut self.text_content).hint_text("Enter your text"));
        ui.add_space(6.0);

        ui.label(format!("Font Size: {}px", self.text_style.font_size as i32));
        ui.add(
            egui::Slider::new(&mut self.text_style.font_size, 8.0..=72.0)
                .step_by(1.0)
                .show_value(false),
        );
        ui.add_space(6.0);

        ui.label("Font Family");
        egui::ComboBox::from_id_salt("font_family")
            .selected_text(self.text_style.font_family.label())
            .show_ui(ui, |ui| {
                for font in FontChoice::ALL {
                    ui.selectable_value(&mut self.text_style.font_family, font, font.label());
                }
            });
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label("Text Color");
            egui::color_picker::color_edit_button_srgba(
                ui,
                &mut self.text_style.font_color,
                egui::color_picker::Alpha::Opaque,
            );
        });
        ui.add_space(10.0);

        if ui
            .add_sized([ui.available_width(), 28.0], egui::Button::new("➕ Add Text"))
            .clicked()
        {
            store.add_element(self.text_draft());
        }
    }

    fn image_tab(&mut self, ui: &mut egui::Ui, config: &EditorConfig) {
        ui.label("Drop an image anywhere on the window, or enter a path:");
        ui.add_space(4.0);
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.image_path)
                .hint_text("/path/to/photo.jpg")
                .desired_width(f32::INFINITY),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (ui.button("Add Image").clicked() || submitted) && !self.image_path.trim().is_empty() {
            let path = PathBuf::from(self.image_path.trim());
            self.queue_uploads([UploadSource::Path(path)], config, ui.ctx());
            self.image_path.clear();
        }

        ui.add_space(6.0);
        ui.weak(format!(
            "Accepted: {} (up to {} MiB)",
            ALLOWED_EXTENSIONS.join(", "),
            config.max_upload_bytes / (1024 * 1024)
        ));

        for pending in &self.pending {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(pending.name());
            });
        }
    }

    fn stickers_tab(ui: &mut egui::Ui, store: &SceneStore) {
        let tile = egui::vec2(32.0, 32.0);

        ui.strong("Travel Stickers");
        egui::Grid::new("travel_stickers").num_columns(4).show(ui, |ui| {
            for (i, sticker) in TRAVEL_STICKERS.iter().enumerate() {
                let button = egui::Button::image(egui::Image::new(sticker.uri).fit_to_exact_size(tile));
                if ui.add(button).on_hover_text(sticker.name).clicked() {
                    store.add_element(ElementDraft::sticker(sticker.uri));
                }
                if i % 4 == 3 {
                    ui.end_row();
                }
            }
        });

        ui.add_space(8.0);
        ui.strong("Shape Stickers");
        egui::Grid::new("shape_stickers").num_columns(4).show(ui, |ui| {
            for (i, marker) in SHAPE_MARKERS.iter().enumerate() {
                let uri = marker.uri();
                let button = egui::Button::image(egui::Image::new(uri.clone()).fit_to_exact_size(tile));
                if ui.add(button).on_hover_text(marker.name).clicked() {
                    store.add_element(ElementDraft::sticker(uri));
                }
                if i % 4 == 3 {
                    ui.end_row();
                }
            }
        });
    }

    fn theme_tab(ui: &mut egui::Ui, store: &SceneStore) {
        ui.strong("Canvas Background");
        let current = store.theme();
        egui::Grid::new("theme_swatches").num_columns(3).show(ui, |ui| {
            for (i, theme) in Theme::ALL.iter().enumerate() {
                if ThemeSwatch::new(*theme, *theme == current).show(ui).clicked() {
                    store.set_theme(*theme);
                }
                if i % 3 == 2 {
                    ui.end_row();
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    #[test]
    fn text_tool_starts_from_config_defaults() {
        let config = EditorConfig::default();
        let panel = ToolPanel::new(&config);
        let draft = panel.text_draft();
        assert_eq!(draft.kind, ElementKind::Text);
        assert_eq!(draft.content, "Your text here");
        assert_eq!((draft.x, draft.y, draft.width, draft.height), (100.0, 100.0, 200.0, 50.0));
        assert_eq!(draft.text_style.map(|s| s.font_size), Some(24.0));
    }
}
