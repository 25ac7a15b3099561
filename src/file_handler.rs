use eframe::egui;

use crate::image_import::UploadSource;

/// Turn files dropped on the window this frame into upload sources.
///
/// Policy checks happen later in the import; this only picks whichever
/// of bytes or path the platform provided.
pub fn dropped_uploads(ctx: &egui::Context) -> Vec<UploadSource> {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    dropped
        .into_iter()
        .filter_map(|file| {
            if let Some(bytes) = file.bytes {
                Some(UploadSource::Bytes {
                    name: file.name,
                    mime: file.mime,
                    bytes,
                })
            } else if let Some(path) = file.path {
                Some(UploadSource::Path(path))
            } else {
                log::warn!("Dropped file has no accessible data: {}", file.name);
                None
            }
        })
        .collect()
}

/// Preview files being dragged over the application
pub fn preview_files_being_dropped(ctx: &egui::Context) {
    use egui::{Align2, Color32, Id, LayerId, Order};

    if ctx.input(|i| i.raw.hovered_files.is_empty()) {
        return;
    }

    let text = ctx.input(|i| {
        let mut text = "Drop images to add them to your story:\n".to_owned();
        for file in &i.raw.hovered_files {
            if let Some(path) = &file.path {
                text += &format!("\n{}", path.display());
            } else if !file.mime.is_empty() {
                text += &format!("\n{}", file.mime);
            } else {
                text += "\n(unnamed file)";
            }
        }
        text
    });

    let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
    let screen_rect = ctx.screen_rect();
    painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
    painter.text(
        screen_rect.center(),
        Align2::CENTER_CENTER,
        text,
        egui::TextStyle::Heading.resolve(&ctx.style()),
        Color32::WHITE,
    );
}
