//! Error type shared by frame construction, frame sources and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the tracking front-end.
///
/// "No ball in this frame" is deliberately *not* an error: detectors return
/// `None` for that case so it can never be confused with a broken input.
#[derive(Debug, Error)]
pub enum TrackError {
    /// The frame source (file or directory) does not exist.
    #[error("frame source not found: {}", .0.display())]
    NotFound(PathBuf),

    /// An encoded frame could not be decoded into a raster.
    #[error("could not decode frame: {0}")]
    Decode(String),

    /// A raw buffer does not match the declared dimensions.
    #[error("frame buffer holds {got} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        expected: usize,
        got: usize,
        width: u32,
        height: u32,
    },

    /// Width or height is zero.
    #[error("frame has zero area ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },

    /// Detector configuration is out of range.
    #[error("invalid detector configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<image::ImageError> for TrackError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => TrackError::Io(io),
            other => TrackError::Decode(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
