//! PDF export: canvas capture, page layout and document assembly.
//!
//! The export runs across frames. `begin` requests a screenshot of the
//! viewport, the app hands the resulting image to `complete`, and `tick`
//! clears the finished state a second later. Progress only moves through
//! fixed milestones.

use std::path::PathBuf;
use std::sync::Arc;

use egui::{ColorImage, Rect};
use image::{imageops, Rgba, RgbaImage, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::ArtifactSink;
use crate::error::{ExportError, ExportResult};
use crate::notifications::Notifications;

pub const A4_SHORT_MM: f32 = 210.0;
pub const A4_LONG_MM: f32 = 297.0;
const POINTS_PER_MM: f32 = 72.0 / 25.4;

pub const PROGRESS_CAPTURE_REQUESTED: u8 = 10;
pub const PROGRESS_CAPTURE_RECEIVED: u8 = 70;
pub const PROGRESS_ASSEMBLED: u8 = 90;
pub const PROGRESS_DELIVERED: u8 = 100;
pub const RESET_DELAY_SECS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

/// Placement of the captured image on an A4 page, in millimetres.
///
/// The image is always 210mm wide and keeps its aspect ratio. It starts at
/// the top-left corner of the page; a very tall image runs off the bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub orientation: PageOrientation,
    pub page_width: f32,
    pub page_height: f32,
    pub image_width: f32,
    pub image_height: f32,
}

impl PageLayout {
    pub fn for_image(width_px: u32, height_px: u32) -> Self {
        let aspect = width_px.max(1) as f32 / height_px.max(1) as f32;
        let image_width = A4_SHORT_MM;
        let image_height = image_width / aspect;
        let orientation = if image_height > image_width {
            PageOrientation::Portrait
        } else {
            PageOrientation::Landscape
        };
        let (page_width, page_height) = match orientation {
            PageOrientation::Portrait => (A4_SHORT_MM, A4_LONG_MM),
            PageOrientation::Landscape => (A4_LONG_MM, A4_SHORT_MM),
        };
        Self {
            orientation,
            page_width,
            page_height,
            image_width,
            image_height,
        }
    }
}

/// Cut the canvas out of a full-viewport screenshot and resample it to
/// `scale` times its logical size.
///
/// `rect` is in points; the screenshot is in physical pixels.
pub fn capture_region(
    screenshot: &ColorImage,
    rect: Rect,
    pixels_per_point: f32,
    scale: f32,
) -> ExportResult<RgbaImage> {
    let [width, height] = screenshot.size;
    let full = RgbaImage::from_raw(width as u32, height as u32, screenshot.as_raw().to_vec())
        .ok_or_else(|| ExportError::Capture("screenshot buffer does not match its size".to_owned()))?;

    let to_px = |value: f32, max: usize| (value * pixels_per_point).round().clamp(0.0, max as f32) as u32;
    let x0 = to_px(rect.min.x, width);
    let y0 = to_px(rect.min.y, height);
    let x1 = to_px(rect.max.x, width);
    let y1 = to_px(rect.max.y, height);
    if x1 <= x0 || y1 <= y0 {
        return Err(ExportError::EmptyCapture);
    }

    let cropped = imageops::crop_imm(&full, x0, y0, x1 - x0, y1 - y0).to_image();
    let target_width = (rect.width() * scale).round().max(1.0) as u32;
    let target_height = (rect.height() * scale).round().max(1.0) as u32;
    if cropped.dimensions() == (target_width, target_height) {
        return Ok(cropped);
    }
    Ok(imageops::resize(
        &cropped,
        target_width,
        target_height,
        imageops::FilterType::Triangle,
    ))
}

/// PDF images carry no alpha here, so composite onto white first
fn flatten_on_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Build a one-page PDF showing `image` per [`PageLayout`].
pub fn assemble_pdf(image: &RgbaImage) -> ExportResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyCapture);
    }
    let layout = PageLayout::for_image(width, height);
    let assembly = |err: lopdf::Error| ExportError::Assembly(err.to_string());

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        },
        flatten_on_white(image).into_raw(),
    ));
    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! {
            "Im0" => image_id,
        },
    });

    let page_width = layout.page_width * POINTS_PER_MM;
    let page_height = layout.page_height * POINTS_PER_MM;
    let image_width = layout.image_width * POINTS_PER_MM;
    let image_height = layout.image_height * POINTS_PER_MM;

    // PDF space has its origin bottom-left
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    image_width.into(),
                    0_i64.into(),
                    0_i64.into(),
                    image_height.into(),
                    0_i64.into(),
                    (page_height - image_height).into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().map_err(assembly)?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0_i64.into(), 0_i64.into(), page_width.into(), page_height.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(|err| ExportError::Assembly(err.to_string()))?;
    Ok(bytes)
}

/// How a viewport screenshot maps to the exported image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSettings {
    /// Physical pixels per point of the screenshot
    pub pixels_per_point: f32,
    /// Output pixels per canvas point
    pub capture_scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PdfPhase {
    Idle,
    AwaitingCapture { canvas_rect: Rect },
    Finished { at: f64 },
}

/// Progress and state of one PDF export at a time.
#[derive(Debug, Clone)]
pub struct PdfExport {
    phase: PdfPhase,
    progress: u8,
}

impl Default for PdfExport {
    fn default() -> Self {
        Self {
            phase: PdfPhase::Idle,
            progress: 0,
        }
    }
}

impl PdfExport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_exporting(&self) -> bool {
        self.phase != PdfPhase::Idle
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Canvas rect to crop from the next screenshot, while one is awaited
    pub fn awaiting_capture(&self) -> Option<Rect> {
        match self.phase {
            PdfPhase::AwaitingCapture { canvas_rect } => Some(canvas_rect),
            _ => None,
        }
    }

    /// Start an export of the canvas at `canvas_rect` (screen points).
    /// The caller must then request a viewport screenshot.
    pub fn begin(&mut self, canvas_rect: Rect) -> ExportResult<()> {
        if self.is_exporting() {
            return Err(ExportError::Busy);
        }
        log::info!("📄 PDF export started");
        self.phase = PdfPhase::AwaitingCapture { canvas_rect };
        self.progress = PROGRESS_CAPTURE_REQUESTED;
        Ok(())
    }

    /// Finish the export with the screenshot (or the capture failure).
    ///
    /// Success and failure are both reported through `notifications`. A
    /// failure resets the export immediately so it can be retried.
    pub fn complete(
        &mut self,
        capture: ExportResult<Arc<ColorImage>>,
        settings: CaptureSettings,
        file_name: &str,
        sink: &mut dyn ArtifactSink,
        notifications: &mut Notifications,
        now: f64,
    ) -> Option<PathBuf> {
        let Some(canvas_rect) = self.awaiting_capture() else {
            log::warn!("Ignoring a capture nobody asked for");
            return None;
        };

        match self.run(capture, canvas_rect, settings, file_name, sink) {
            Ok(path) => {
                self.progress = PROGRESS_DELIVERED;
                self.phase = PdfPhase::Finished { at: now };
                notifications.success(
                    "PDF exported successfully!",
                    format!("Saved to {}", path.display()),
                    now,
                );
                Some(path)
            }
            Err(err) => {
                log::error!("PDF export failed: {err}");
                self.reset();
                notifications.error("Error exporting PDF. Please try again.", err.to_string(), now);
                None
            }
        }
    }

    fn run(
        &mut self,
        capture: ExportResult<Arc<ColorImage>>,
        canvas_rect: Rect,
        settings: CaptureSettings,
        file_name: &str,
        sink: &mut dyn ArtifactSink,
    ) -> ExportResult<PathBuf> {
        let screenshot = capture?;
        let image = capture_region(
            &screenshot,
            canvas_rect,
            settings.pixels_per_point,
            settings.capture_scale,
        )?;
        self.progress = PROGRESS_CAPTURE_RECEIVED;

        let bytes = assemble_pdf(&image)?;
        self.progress = PROGRESS_ASSEMBLED;

        sink.deliver(file_name, &bytes)
    }

    /// Clear a finished export once the reset delay has passed.
    /// Returns true while there is still something to animate.
    pub fn tick(&mut self, now: f64) -> bool {
        match self.phase {
            PdfPhase::Finished { at } if now - at >= RESET_DELAY_SECS => {
                self.reset();
                false
            }
            PdfPhase::Idle => false,
            _ => true,
        }
    }

    pub fn reset(&mut self) {
        self.phase = PdfPhase::Idle;
        self.progress = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2, Color32};

    #[test]
    fn wide_canvas_goes_landscape() {
        let layout = PageLayout::for_image(1600, 1200);
        assert_eq!(layout.orientation, PageOrientation::Landscape);
        assert_eq!(layout.page_width, A4_LONG_MM);
        assert!((layout.image_height - 157.5).abs() < 1e-3);
    }

    #[test]
    fn tall_canvas_goes_portrait() {
        let layout = PageLayout::for_image(600, 800);
        assert_eq!(layout.orientation, PageOrientation::Portrait);
        assert_eq!(layout.page_height, A4_LONG_MM);
        assert!((layout.image_height - 280.0).abs() < 1e-3);
    }

    #[test]
    fn capture_crops_and_upscales() {
        // 2 physical pixels per point, 100x50 points; the left half is red
        let mut screenshot = ColorImage::new([200, 100], Color32::WHITE);
        for y in 0..100 {
            for x in 0..100 {
                screenshot[(x, y)] = Color32::RED;
            }
        }
        let rect = Rect::from_min_size(pos2(25.0, 10.0), vec2(40.0, 20.0));
        let image = capture_region(&screenshot, rect, 2.0, 2.0).unwrap();
        assert_eq!(image.dimensions(), (80, 40));
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(79, 39).0, [255, 255, 255, 255]);
    }

    #[test]
    fn capture_outside_screenshot_is_empty() {
        let screenshot = ColorImage::new([10, 10], Color32::WHITE);
        let rect = Rect::from_min_size(pos2(50.0, 50.0), vec2(10.0, 10.0));
        assert!(matches!(
            capture_region(&screenshot, rect, 1.0, 2.0),
            Err(ExportError::EmptyCapture)
        ));
    }

    #[test]
    fn assembled_pdf_has_header() {
        let image = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));
        let bytes = assemble_pdf(&image).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn second_begin_is_busy() {
        let mut export = PdfExport::new();
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0));
        export.begin(rect).unwrap();
        assert!(matches!(export.begin(rect), Err(ExportError::Busy)));
        assert_eq!(export.progress(), PROGRESS_CAPTURE_REQUESTED);
    }
}
