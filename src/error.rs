use thiserror::Error;

/// Errors that can occur while importing an uploaded image
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unsupported file type: {name}")]
    UnsupportedType { name: String },

    #[error("File is too large ({size} bytes, limit is {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },

    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Decode worker stopped before finishing")]
    Cancelled,
}

/// Errors that end one export attempt. None of them touch the scene.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Canvas capture failed: {0}")]
    Capture(String),

    #[error("Canvas capture produced an empty image")]
    EmptyCapture,

    #[error("Failed to assemble document: {0}")]
    Assembly(String),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Another export is already running")]
    Busy,
}

pub type ExportResult<T> = Result<T, ExportError>;
