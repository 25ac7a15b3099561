//! Video export.
//!
//! Rendering goes through the [`VideoRenderer`] trait. The only renderer
//! shipped is [`MockVideoRenderer`], which fakes progress and produces a
//! JSON manifest of what a real encoder would have been asked to render.

use std::path::PathBuf;

use serde::Serialize;

use super::ArtifactSink;
use crate::element::CanvasElement;
use crate::error::{ExportError, ExportResult};
use crate::notifications::Notifications;
use crate::scene::{Scene, Theme};

/// Everything a renderer gets to work with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoRequest {
    pub theme: Theme,
    pub fps: u32,
    pub duration_secs: u32,
    /// In paint order
    pub elements: Vec<CanvasElement>,
}

impl VideoRequest {
    pub fn from_scene(scene: &Scene, fps: u32, duration_secs: u32) -> Self {
        Self {
            theme: scene.theme(),
            fps,
            duration_secs,
            elements: scene.sorted_by_z().into_iter().cloned().collect(),
        }
    }

    pub fn total_frames(&self) -> u64 {
        self.fps as u64 * self.duration_secs as u64
    }

    /// One-line description for the preview card
    pub fn summary(&self) -> String {
        let noun = if self.elements.len() == 1 { "element" } else { "elements" };
        format!(
            "Showing {} {noun} in a {} second video at {}fps.",
            self.elements.len(),
            self.duration_secs,
            self.fps
        )
    }
}

#[derive(Debug)]
pub enum VideoPoll {
    /// Percent done, 0..=100
    Running(u8),
    Finished(Vec<u8>),
    Failed(ExportError),
}

pub trait VideoRenderer {
    fn start(&mut self, request: VideoRequest, now: f64) -> ExportResult<()>;

    /// Progress at `now`. Returns `Finished` exactly once per render.
    fn poll(&mut self, now: f64) -> VideoPoll;
}

pub const MOCK_STEP_PERCENT: u8 = 5;
pub const MOCK_STEP_INTERVAL_SECS: f64 = 0.2;

#[derive(Serialize)]
struct MockManifest<'a> {
    format: &'static str,
    note: &'static str,
    total_frames: u64,
    element_count: usize,
    #[serde(flatten)]
    request: &'a VideoRequest,
}

/// Stand-in renderer: +5% every 200ms, then a manifest instead of a video
#[derive(Debug, Default)]
pub struct MockVideoRenderer {
    job: Option<(VideoRequest, f64)>,
}

impl MockVideoRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn manifest(request: &VideoRequest) -> ExportResult<Vec<u8>> {
        let manifest = MockManifest {
            format: "travelstory-mock-video",
            note: "Mock render; no frames were encoded",
            total_frames: request.total_frames(),
            element_count: request.elements.len(),
            request,
        };
        serde_json::to_vec_pretty(&manifest).map_err(|err| ExportError::Assembly(err.to_string()))
    }
}

impl VideoRenderer for MockVideoRenderer {
    fn start(&mut self, request: VideoRequest, now: f64) -> ExportResult<()> {
        if self.job.is_some() {
            return Err(ExportError::Busy);
        }
        self.job = Some((request, now));
        Ok(())
    }

    fn poll(&mut self, now: f64) -> VideoPoll {
        let Some((request, started_at)) = &self.job else {
            return VideoPoll::Running(0);
        };
        let steps = ((now - started_at) / MOCK_STEP_INTERVAL_SECS).floor().max(0.0);
        let progress = (steps * MOCK_STEP_PERCENT as f64).min(100.0) as u8;
        if progress < 100 {
            return VideoPoll::Running(progress);
        }

        let result = Self::manifest(request);
        self.job = None;
        match result {
            Ok(bytes) => VideoPoll::Finished(bytes),
            Err(err) => VideoPoll::Failed(err),
        }
    }
}

/// Drives one video render at a time and delivers the artifact.
pub struct VideoExport {
    renderer: Box<dyn VideoRenderer>,
    exporting: bool,
    progress: u8,
}

impl Default for VideoExport {
    fn default() -> Self {
        Self::new(Box::new(MockVideoRenderer::new()))
    }
}

impl VideoExport {
    pub fn new(renderer: Box<dyn VideoRenderer>) -> Self {
        Self {
            renderer,
            exporting: false,
            progress: 0,
        }
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn begin(&mut self, request: VideoRequest, now: f64) -> ExportResult<()> {
        if self.exporting {
            return Err(ExportError::Busy);
        }
        log::info!(
            "🎬 Video export started: {} elements, {} fps, {}s",
            request.elements.len(),
            request.fps,
            request.duration_secs
        );
        self.renderer.start(request, now)?;
        self.exporting = true;
        self.progress = 0;
        Ok(())
    }

    /// Advance the render. On completion the artifact is delivered and
    /// the outcome reported through `notifications`.
    pub fn tick(
        &mut self,
        now: f64,
        file_name: &str,
        sink: &mut dyn ArtifactSink,
        notifications: &mut Notifications,
    ) -> Option<PathBuf> {
        if !self.exporting {
            return None;
        }

        let outcome = match self.renderer.poll(now) {
            VideoPoll::Running(progress) => {
                self.progress = progress.min(99);
                return None;
            }
            VideoPoll::Finished(bytes) => sink.deliver(file_name, &bytes),
            VideoPoll::Failed(err) => Err(err),
        };

        self.exporting = false;
        match outcome {
            Ok(path) => {
                self.progress = 100;
                notifications.success(
                    "Video generated successfully!",
                    format!("Saved to {}", path.display()),
                    now,
                );
                Some(path)
            }
            Err(err) => {
                log::error!("Video export failed: {err}");
                self.progress = 0;
                notifications.error("Error generating video. Please try again.", err.to_string(), now);
                None
            }
        }
    }
}

impl std::fmt::Debug for VideoExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoExport")
            .field("exporting", &self.exporting)
            .field("progress", &self.progress)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementDraft;

    fn request() -> VideoRequest {
        let mut scene = Scene::new();
        scene.add_element(ElementDraft::sticker("bytes://stickers/sun.svg"));
        scene.set_theme(Theme::Beach);
        VideoRequest::from_scene(&scene, 30, 8)
    }

    #[test]
    fn summary_counts_elements() {
        assert_eq!(request().summary(), "Showing 1 element in a 8 second video at 30fps.");

        let empty = VideoRequest::from_scene(&Scene::new(), 24, 5);
        assert_eq!(empty.summary(), "Showing 0 elements in a 5 second video at 24fps.");
    }

    #[test]
    fn mock_advances_five_percent_per_step() {
        let mut renderer = MockVideoRenderer::new();
        renderer.start(request(), 0.0).unwrap();
        assert!(matches!(renderer.poll(0.1), VideoPoll::Running(0)));
        assert!(matches!(renderer.poll(0.61), VideoPoll::Running(15)));
        assert!(matches!(renderer.start(request(), 1.0), Err(ExportError::Busy)));
    }

    #[test]
    fn mock_finishes_with_manifest() {
        let mut renderer = MockVideoRenderer::new();
        renderer.start(request(), 0.0).unwrap();
        let VideoPoll::Finished(bytes) = renderer.poll(4.01) else {
            panic!("expected finished render");
        };
        let manifest: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(manifest["fps"], 30);
        assert_eq!(manifest["theme"], "beach");
        assert_eq!(manifest["total_frames"], 240);
        assert_eq!(manifest["element_count"], 1);
        // The job is gone after finishing
        assert!(matches!(renderer.poll(5.0), VideoPoll::Running(0)));
    }
}
