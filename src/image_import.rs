//! Uploaded image intake: policy check, decode, placement.
//!
//! Decoding is a separate step from placement. Nothing is added to the
//! scene until [`decode_upload`] returns the native dimensions, so a
//! failed decode can never leave a zero-size element behind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use egui::Vec2;
use futures::channel::oneshot;

use crate::element::{clamp_size, ElementDraft};
use crate::error::DecodeError;

/// Longer axis of a freshly placed image, in canvas pixels
pub const MAX_PLACEMENT_DIMENSION: f32 = 400.0;

pub const ALLOWED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Bytes or a path handed to the image tool, from a drop or a typed path.
#[derive(Debug, Clone)]
pub enum UploadSource {
    Bytes {
        name: String,
        mime: String,
        bytes: Arc<[u8]>,
    },
    Path(PathBuf),
}

impl UploadSource {
    pub fn name(&self) -> String {
        match self {
            UploadSource::Bytes { name, .. } => name.clone(),
            UploadSource::Path(path) => path.display().to_string(),
        }
    }
}

/// A successfully decoded upload, ready to be registered and placed.
#[derive(Debug, Clone)]
pub struct DecodedUpload {
    /// Unique `bytes://` URI the image is registered under
    pub uri: String,
    pub bytes: Arc<[u8]>,
    /// Native pixel size
    pub dimensions: [u32; 2],
}

impl DecodedUpload {
    pub fn placement_size(&self) -> Vec2 {
        placement_size(self.dimensions)
    }

    /// Element for this upload at the default anchor
    pub fn draft(&self) -> ElementDraft {
        ElementDraft::image(self.uri.clone(), self.placement_size())
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Accept only raster image types up to `limit` bytes.
///
/// A non-empty MIME type must be `image/*`; the file extension, when
/// present, must be on the allow-list. Returns the canonical extension.
pub fn check_upload(name: &str, mime: &str, size: u64, limit: u64) -> Result<String, DecodeError> {
    let unsupported = || DecodeError::UnsupportedType {
        name: name.to_owned(),
    };

    if !mime.is_empty() && !mime.starts_with("image/") {
        return Err(unsupported());
    }

    let extension = match extension_of(name) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => ext,
        Some(_) => return Err(unsupported()),
        None => match mime.strip_prefix("image/") {
            Some(subtype) if ALLOWED_EXTENSIONS.contains(&subtype) => subtype.to_owned(),
            _ => return Err(unsupported()),
        },
    };

    if size > limit {
        return Err(DecodeError::TooLarge { size, limit });
    }

    Ok(extension)
}

/// Native pixel size of an encoded image.
pub fn decode_dimensions(bytes: &[u8]) -> Result<[u32; 2], DecodeError> {
    let image = image::load_from_memory(bytes)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(DecodeError::EmptyImage);
    }
    Ok([image.width(), image.height()])
}

/// Validate and decode an in-memory upload.
pub fn decode_upload(
    name: &str,
    mime: &str,
    bytes: Arc<[u8]>,
    limit: u64,
) -> Result<DecodedUpload, DecodeError> {
    let mut extension = check_upload(name, mime, bytes.len() as u64, limit)?;
    let dimensions = decode_dimensions(&bytes)?;

    // Prefer what the bytes say over what the name says, so the loader picks the right decoder
    if let Ok(format) = image::guess_format(&bytes) {
        if let Some(ext) = format.extensions_str().first() {
            extension = (*ext).to_owned();
        }
    }

    let uri = format!("bytes://upload/{}.{}", uuid::Uuid::new_v4(), extension);
    log::debug!(
        "Decoded upload {} ({}x{}) as {}",
        name,
        dimensions[0],
        dimensions[1],
        uri
    );
    Ok(DecodedUpload {
        uri,
        bytes,
        dimensions,
    })
}

/// Read (if needed), validate and decode any upload source.
pub fn load_upload(source: &UploadSource, limit: u64) -> Result<DecodedUpload, DecodeError> {
    match source {
        UploadSource::Bytes { name, mime, bytes } => decode_upload(name, mime, bytes.clone(), limit),
        UploadSource::Path(path) => {
            let name = path.display().to_string();
            // Reject before reading the whole file
            let size = std::fs::metadata(path)?.len();
            check_upload(&name, "", size, limit)?;
            let bytes: Arc<[u8]> = std::fs::read(path)?.into();
            decode_upload(&name, "", bytes, limit)
        }
    }
}

/// Proportional placement size: the longer axis becomes 400px and neither
/// axis goes below the element minimum.
pub fn placement_size(dimensions: [u32; 2]) -> Vec2 {
    let [width, height] = dimensions.map(|d| d.max(1) as f32);
    let size = if width > height {
        Vec2::new(MAX_PLACEMENT_DIMENSION, height / width * MAX_PLACEMENT_DIMENSION)
    } else {
        Vec2::new(width / height * MAX_PLACEMENT_DIMENSION, MAX_PLACEMENT_DIMENSION)
    };
    clamp_size(size)
}

/// A decode running on a worker thread.
pub struct PendingDecode {
    name: String,
    receiver: oneshot::Receiver<Result<DecodedUpload, DecodeError>>,
}

impl PendingDecode {
    /// Decode `source` off the UI thread. `ctx` is woken when the result is ready.
    pub fn spawn(source: UploadSource, limit: u64, ctx: &egui::Context) -> Self {
        let (sender, receiver) = oneshot::channel();
        let name = source.name();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let result = load_upload(&source, limit);
            // The receiver may be gone if the panel was dropped
            let _ = sender.send(result);
            ctx.request_repaint();
        });
        Self { name, receiver }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` while still running
    pub fn poll(&mut self) -> Option<Result<DecodedUpload, DecodeError>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(DecodeError::Cancelled)),
        }
    }
}

impl std::fmt::Debug for PendingDecode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingDecode").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_caps_longer_axis() {
        assert_eq!(placement_size([800, 400]), Vec2::new(400.0, 200.0));
        assert_eq!(placement_size([300, 600]), Vec2::new(200.0, 400.0));
        assert_eq!(placement_size([50, 50]), Vec2::new(400.0, 400.0));
    }

    #[test]
    fn placement_never_below_minimum() {
        // A 100:1 panorama would be 4px tall
        assert_eq!(placement_size([1000, 10]), Vec2::new(400.0, 30.0));
    }

    #[test]
    fn policy_rejects_non_images() {
        assert!(matches!(
            check_upload("notes.txt", "text/plain", 10, 100),
            Err(DecodeError::UnsupportedType { .. })
        ));
        assert!(matches!(
            check_upload("vector.svg", "", 10, 100),
            Err(DecodeError::UnsupportedType { .. })
        ));
        assert_eq!(check_upload("Photo.JPG", "", 10, 100).unwrap(), "jpg");
        assert_eq!(check_upload("clipboard", "image/png", 10, 100).unwrap(), "png");
    }

    #[test]
    fn policy_enforces_size_cap() {
        assert!(matches!(
            check_upload("big.png", "image/png", 101, 100),
            Err(DecodeError::TooLarge { size: 101, limit: 100 })
        ));
    }
}
