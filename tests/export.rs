use std::path::PathBuf;
use std::sync::Arc;

use egui::{pos2, vec2, Color32, ColorImage, Rect};
use travelstory::element::ElementDraft;
use travelstory::error::{ExportError, ExportResult};
use travelstory::export::{
    ArtifactSink, CaptureSettings, PdfExport, VideoExport, VideoPoll, VideoRenderer, VideoRequest,
};
use travelstory::notifications::{Notifications, ToastKind};
use travelstory::scene::SceneStore;

/// Keeps delivered artifacts in memory
#[derive(Default)]
struct MemorySink {
    delivered: Vec<(String, Vec<u8>)>,
}

impl ArtifactSink for MemorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> ExportResult<PathBuf> {
        self.delivered.push((file_name.to_owned(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}

/// Renderer that fails once it is polled
struct BrokenRenderer;

impl VideoRenderer for BrokenRenderer {
    fn start(&mut self, _request: VideoRequest, _now: f64) -> ExportResult<()> {
        Ok(())
    }

    fn poll(&mut self, _now: f64) -> VideoPoll {
        VideoPoll::Failed(ExportError::Assembly("encoder crashed".to_owned()))
    }
}

const SETTINGS: CaptureSettings = CaptureSettings {
    pixels_per_point: 1.0,
    capture_scale: 2.0,
};

fn canvas_rect() -> Rect {
    Rect::from_min_size(pos2(10.0, 10.0), vec2(80.0, 60.0))
}

fn store_with_content() -> SceneStore {
    let store = SceneStore::new();
    store.add_element(ElementDraft::sticker("bytes://stickers/sun.svg"));
    store.add_element(ElementDraft::sticker("bytes://stickers/map.svg"));
    store
}

#[test]
fn pdf_capture_failure_resets_and_reports() {
    let store = store_with_content();
    let before = store.snapshot();
    let mut pdf = PdfExport::new();
    let mut sink = MemorySink::default();
    let mut notifications = Notifications::new();

    pdf.begin(canvas_rect()).expect("idle export can start");
    assert!(pdf.is_exporting());
    assert!(pdf.progress() > 0);

    let delivered = pdf.complete(
        Err(ExportError::Capture("no frame".to_owned())),
        SETTINGS,
        "story.pdf",
        &mut sink,
        &mut notifications,
        1.0,
    );

    assert!(delivered.is_none());
    assert!(!pdf.is_exporting());
    assert_eq!(pdf.progress(), 0);
    assert!(sink.delivered.is_empty());
    assert_eq!(notifications.toasts().len(), 1);
    assert_eq!(notifications.toasts()[0].kind, ToastKind::Error);
    assert_eq!(store.snapshot(), before);

    // And it can be retried
    assert!(pdf.begin(canvas_rect()).is_ok());
}

#[test]
fn pdf_export_delivers_a_document() {
    let mut pdf = PdfExport::new();
    let mut sink = MemorySink::default();
    let mut notifications = Notifications::new();
    let screenshot = Arc::new(ColorImage::new([100, 100], Color32::from_rgb(250, 200, 120)));

    pdf.begin(canvas_rect()).expect("idle export can start");
    let delivered = pdf.complete(
        Ok(screenshot),
        SETTINGS,
        "story.pdf",
        &mut sink,
        &mut notifications,
        2.0,
    );

    assert_eq!(delivered, Some(PathBuf::from("story.pdf")));
    assert_eq!(pdf.progress(), 100);
    assert_eq!(sink.delivered.len(), 1);
    assert!(sink.delivered[0].1.starts_with(b"%PDF-1.5"));
    assert_eq!(notifications.toasts()[0].kind, ToastKind::Success);

    // Finished state lingers briefly, then clears
    assert!(pdf.tick(2.5));
    assert!(!pdf.tick(3.0));
    assert!(!pdf.is_exporting());
    assert_eq!(pdf.progress(), 0);
}

#[test]
fn pdf_capture_outside_the_screenshot_fails_cleanly() {
    let mut pdf = PdfExport::new();
    let mut sink = MemorySink::default();
    let mut notifications = Notifications::new();
    let screenshot = Arc::new(ColorImage::new([8, 8], Color32::WHITE));

    pdf.begin(Rect::from_min_size(pos2(50.0, 50.0), vec2(20.0, 20.0)))
        .expect("idle export can start");
    let delivered = pdf.complete(
        Ok(screenshot),
        SETTINGS,
        "story.pdf",
        &mut sink,
        &mut notifications,
        0.0,
    );

    assert!(delivered.is_none());
    assert!(!pdf.is_exporting());
    assert_eq!(notifications.toasts()[0].kind, ToastKind::Error);
}

#[test]
fn unrequested_capture_is_ignored() {
    let mut pdf = PdfExport::new();
    let mut sink = MemorySink::default();
    let mut notifications = Notifications::new();
    let screenshot = Arc::new(ColorImage::new([100, 100], Color32::WHITE));

    let delivered = pdf.complete(Ok(screenshot), SETTINGS, "x.pdf", &mut sink, &mut notifications, 0.0);
    assert!(delivered.is_none());
    assert!(notifications.is_empty());
}

#[test]
fn mock_video_runs_to_completion() {
    let store = store_with_content();
    let request = VideoRequest::from_scene(&store.snapshot(), 30, 8);
    assert_eq!(request.total_frames(), 240);
    assert_eq!(request.elements.len(), 2);

    let mut video = VideoExport::default();
    let mut sink = MemorySink::default();
    let mut notifications = Notifications::new();
    video.begin(request, 0.0).expect("idle export can start");
    assert!(video.begin(VideoRequest::from_scene(&store.snapshot(), 30, 8), 0.0).is_err());

    assert!(video.tick(1.1, "story.mp4", &mut sink, &mut notifications).is_none());
    assert_eq!(video.progress(), 25);
    assert!(video.is_exporting());

    let delivered = video.tick(4.1, "story.mp4", &mut sink, &mut notifications);
    assert_eq!(delivered, Some(PathBuf::from("story.mp4")));
    assert!(!video.is_exporting());
    assert_eq!(video.progress(), 100);

    let manifest: serde_json::Value =
        serde_json::from_slice(&sink.delivered[0].1).expect("manifest is JSON");
    assert_eq!(manifest["total_frames"], 240);
    assert_eq!(manifest["element_count"], 2);
}

#[test]
fn video_failure_is_recovered_locally() {
    let store = store_with_content();
    let before = store.snapshot();
    let mut video = VideoExport::new(Box::new(BrokenRenderer));
    let mut sink = MemorySink::default();
    let mut notifications = Notifications::new();

    video
        .begin(VideoRequest::from_scene(&before, 30, 8), 0.0)
        .expect("idle export can start");
    let delivered = video.tick(0.1, "story.mp4", &mut sink, &mut notifications);

    assert!(delivered.is_none());
    assert!(!video.is_exporting());
    assert_eq!(video.progress(), 0);
    assert_eq!(notifications.toasts()[0].kind, ToastKind::Error);
    assert_eq!(store.snapshot(), before);
}
