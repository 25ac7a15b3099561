//! Export adapters. They read the scene (or a capture of it) and never
//! write to it; every failure ends only the current attempt.

use std::path::{Path, PathBuf};

use crate::error::ExportResult;

pub mod pdf;
pub mod video;

pub use pdf::{assemble_pdf, capture_region, CaptureSettings, PageLayout, PageOrientation, PdfExport};
pub use video::{MockVideoRenderer, VideoExport, VideoPoll, VideoRenderer, VideoRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    Pdf,
    Video,
}

impl ExportMode {
    pub fn title(&self) -> &'static str {
        match self {
            ExportMode::Pdf => "Export as PDF",
            ExportMode::Video => "Generate Video",
        }
    }
}

/// Where finished artifacts go.
pub trait ArtifactSink {
    /// Store `bytes` under `file_name`, returning where it ended up.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> ExportResult<PathBuf>;
}

/// Writes artifacts into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> ExportResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        log::info!("📦 Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_sink_creates_missing_dirs() {
        let dir = std::env::temp_dir()
            .join(format!("travelstory-sink-{}", uuid::Uuid::new_v4()))
            .join("nested");
        let mut sink = DirectorySink::new(&dir);
        let path = sink.deliver("out.bin", b"abc").unwrap();
        assert_eq!(path, dir.join("out.bin"));
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }
}
