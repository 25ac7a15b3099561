use std::sync::Arc;

use eframe::egui;

use crate::config::EditorConfig;
use crate::export::{
    CaptureSettings, DirectorySink, ExportMode, PdfExport, VideoExport, VideoRequest,
};
use crate::file_handler;
use crate::notifications::Notifications;
use crate::panels::{CanvasSurface, ToolPanel};
use crate::renderer;
use crate::save::SaveProgress;
use crate::scene::SceneStore;
use crate::stickers;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);

/// The whole editor: header, tool panel, canvas, export panel and the
/// save overlay. Only [`EditorConfig`] survives a restart; every session
/// starts with an empty canvas.
pub struct TravelStoryApp {
    store: SceneStore,
    config: EditorConfig,
    canvas: CanvasSurface,
    tools: ToolPanel,
    notifications: Notifications,
    save: Option<SaveProgress>,
    /// The header offers exports instead of saving until "Edit Story"
    saved: bool,
    export_mode: Option<ExportMode>,
    pdf: PdfExport,
    video: VideoExport,
    show_settings: bool,
}

impl TravelStoryApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        stickers::register_assets(&cc.egui_ctx);

        let config = EditorConfig::load(cc.storage);
        log::info!("Starting with a {:?} canvas", config.canvas_size);
        Self::with_config(config)
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            store: SceneStore::new(),
            tools: ToolPanel::new(&config),
            config,
            canvas: CanvasSurface::new(),
            notifications: Notifications::new(),
            save: None,
            saved: false,
            export_mode: None,
            pdf: PdfExport::new(),
            video: VideoExport::default(),
            show_settings: false,
        }
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    fn start_save(&mut self, now: f64) {
        self.canvas.finish_editing(&self.store);
        self.save = Some(SaveProgress::start(now));
    }

    fn start_pdf_export(&mut self, ctx: &egui::Context, now: f64) {
        self.canvas.finish_editing(&self.store);
        let Some(canvas_rect) = self.canvas.canvas_rect() else {
            self.notifications
                .error("Error exporting PDF. Please try again.", "The canvas is not visible", now);
            return;
        };

        // Selection handles must not end up in the capture
        self.store.select_element(None);
        match self.pdf.begin(canvas_rect) {
            Ok(()) => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
                ctx.request_repaint();
            }
            Err(err) => log::warn!("PDF export not started: {err}"),
        }
    }

    fn start_video_export(&mut self, now: f64) {
        let request = VideoRequest::from_scene(
            &self.store.snapshot(),
            self.config.video_fps,
            self.config.video_duration_secs,
        );
        if let Err(err) = self.video.begin(request, now) {
            log::warn!("Video export not started: {err}");
            self.notifications
                .error("Error generating video. Please try again.", err.to_string(), now);
        }
    }

    fn handle_screenshots(&mut self, ctx: &egui::Context, now: f64) {
        let screenshots: Vec<Arc<egui::ColorImage>> = ctx.input(|i| {
            i.raw
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Screenshot { image, .. } => Some(image.clone()),
                    _ => None,
                })
                .collect()
        });

        for image in screenshots {
            let settings = CaptureSettings {
                pixels_per_point: ctx.pixels_per_point(),
                capture_scale: self.config.capture_scale,
            };
            let mut sink = DirectorySink::new(self.config.export_dir.clone());
            self.pdf.complete(
                Ok(image),
                settings,
                &self.config.pdf_file_name,
                &mut sink,
                &mut self.notifications,
                now,
            );
        }
    }

    fn header(&mut self, ctx: &egui::Context, now: f64) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("✈ TravelStory").heading().strong().color(ACCENT));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙").on_hover_text("Settings").clicked() {
                        self.show_settings = !self.show_settings;
                    }

                    if self.saved {
                        if ui.button("🎬 Generate Video").clicked() {
                            self.export_mode = Some(ExportMode::Video);
                        }
                        if ui.button("📄 Export PDF").clicked() {
                            self.export_mode = Some(ExportMode::Pdf);
                        }
                        if ui.button("✏ Edit Story").clicked() {
                            self.saved = false;
                        }
                    } else {
                        let busy = self.save.as_ref().is_some_and(SaveProgress::is_active);
                        let button = egui::Button::new(
                            egui::RichText::new("💾 Save Story").color(egui::Color32::WHITE),
                        )
                        .fill(ACCENT);
                        if ui.add_enabled(!busy, button).clicked() {
                            self.start_save(now);
                        }
                    }
                });
            });
            ui.add_space(6.0);
        });
    }

    fn footer(ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.weak("TravelStory - Create beautiful travel journals");
            });
        });
    }

    fn export_panel(&mut self, ctx: &egui::Context, now: f64) {
        let Some(mode) = self.export_mode else {
            return;
        };

        let mut open = true;
        egui::SidePanel::right("export_panel")
            .resizable(false)
            .exact_width(320.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.heading(mode.title());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("✖").on_hover_text("Close").clicked() {
                            open = false;
                        }
                    });
                });
                ui.separator();

                match mode {
                    ExportMode::Pdf => self.pdf_preview(ui),
                    ExportMode::Video => self.video_preview(ui),
                }

                let rows: Vec<(&str, String)> = match mode {
                    ExportMode::Pdf => vec![
                        ("Page Size", "A4 (Automatic orientation)".to_owned()),
                        ("Quality", format!("{}x", self.config.capture_scale)),
                        ("Destination", self.config.export_dir.display().to_string()),
                    ],
                    ExportMode::Video => vec![
                        ("Duration", format!("{} seconds", self.config.video_duration_secs)),
                        ("Frame rate", format!("{} fps", self.config.video_fps)),
                        ("Destination", self.config.export_dir.display().to_string()),
                    ],
                };
                egui::Grid::new("export_options")
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for (label, value) in &rows {
                            ui.label(*label);
                            ui.strong(value);
                            ui.end_row();
                        }
                    });

                ui.add_space(12.0);
                let (exporting, progress) = match mode {
                    ExportMode::Pdf => (self.pdf.is_exporting(), self.pdf.progress()),
                    ExportMode::Video => (self.video.is_exporting(), self.video.progress()),
                };
                if exporting {
                    ui.horizontal(|ui| {
                        ui.label("Exporting...");
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(format!("{progress}%"));
                        });
                    });
                    ui.add(egui::ProgressBar::new(progress as f32 / 100.0).fill(ACCENT));
                    ui.add_space(6.0);
                }

                let label = match (mode, exporting) {
                    (ExportMode::Pdf, false) => "⬇ Download PDF",
                    (ExportMode::Pdf, true) => "Exporting PDF...",
                    (ExportMode::Video, false) => "⬇ Download Video",
                    (ExportMode::Video, true) => "Generating Video...",
                };
                let button = egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 30.0));
                if ui.add_enabled(!exporting, button).clicked() {
                    match mode {
                        ExportMode::Pdf => self.start_pdf_export(ctx, now),
                        ExportMode::Video => self.start_video_export(now),
                    }
                }
            });

        if !open {
            self.export_mode = None;
        }
    }

    fn pdf_preview(&self, ui: &mut egui::Ui) {
        preview_card(ui, "📄 PDF Preview", |ui| {
            let scene = self.store.snapshot();
            let canvas_size = self.config.canvas_size;
            let width = ui.available_width();
            let scale = renderer::preview_scale(canvas_size, egui::vec2(width, width * 0.75));
            ui.vertical_centered(|ui| {
                let (rect, _) = ui.allocate_exact_size(canvas_size * scale, egui::Sense::hover());
                renderer::paint_preview(ui, rect, &scene, canvas_size);
            });
        });
    }

    fn video_preview(&self, ui: &mut egui::Ui) {
        let request = VideoRequest::from_scene(
            &self.store.snapshot(),
            self.config.video_fps,
            self.config.video_duration_secs,
        );
        preview_card(ui, "🎬 Video Preview", |ui| {
            let height = ui.available_width() * 9.0 / 16.0;
            egui::Frame::none()
                .fill(egui::Color32::BLACK)
                .inner_margin(12.0)
                .show(ui, |ui| {
                    ui.set_min_height(height - 24.0);
                    ui.vertical_centered(|ui| {
                        ui.add_space(height * 0.25);
                        ui.label(
                            egui::RichText::new("Your travel story would be rendered as a video here.")
                                .color(egui::Color32::from_gray(200)),
                        );
                        ui.label(
                            egui::RichText::new(request.summary()).color(egui::Color32::from_gray(160)),
                        );
                    });
                });
        });
    }

    fn save_overlay(&mut self, ctx: &egui::Context, now: f64) {
        let Some(save) = &mut self.save else {
            return;
        };

        if save.tick(now) {
            self.saved = true;
        }
        if !save.is_active() {
            self.save = None;
            return;
        }

        egui::Window::new("Save Story")
            .id(egui::Id::new("save_overlay"))
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_width(320.0);
                ui.vertical_centered(|ui| {
                    ui.heading(save.message());
                    ui.add_space(8.0);
                    ui.add(
                        egui::ProgressBar::new(save.progress() as f32 / 100.0)
                            .show_percentage()
                            .fill(ACCENT),
                    );
                    if save.can_cancel() {
                        ui.add_space(8.0);
                        if ui.button("Cancel").clicked() {
                            save.cancel();
                        }
                    }
                });
            });
        ctx.request_repaint();
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| self.config.ui(ui));
        self.show_settings = open;
    }
}

fn preview_card(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.strong(title);
        ui.separator();
        add_contents(ui);
    });
    ui.add_space(12.0);
}

impl eframe::App for TravelStoryApp {
    /// Called by the framework to save settings before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.config.save(storage);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        self.handle_screenshots(ctx, now);

        let dropped = file_handler::dropped_uploads(ctx);
        if !dropped.is_empty() {
            self.tools.queue_uploads(dropped, &self.config, ctx);
        }
        self.tools
            .poll_decodes(ctx, &self.store, &mut self.notifications, now);

        self.header(ctx, now);
        Self::footer(ctx);
        self.tools.show(ctx, &self.store, &self.config);
        self.export_panel(ctx, now);
        self.canvas.show(ctx, &self.store, self.config.canvas_size);

        let mut sink = DirectorySink::new(self.config.export_dir.clone());
        self.video.tick(
            now,
            &self.config.video_file_name,
            &mut sink,
            &mut self.notifications,
        );
        let pdf_active = self.pdf.tick(now);
        if pdf_active || self.video.is_exporting() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        self.save_overlay(ctx, now);
        self.settings_window(ctx);
        self.notifications.show(ctx);
        file_handler::preview_files_being_dropped(ctx);
    }
}
