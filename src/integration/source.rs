//! Traits and adapters for feeding decoded frames into the tracker.

use std::path::{Path, PathBuf};

use crate::detector::Frame;
use crate::error::{Result, TrackError};

/// File extensions `ImageSequenceSource` picks up.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp", "tif", "tiff"];

/// Trait for ordered frame producers.
///
/// Implement this trait to connect any decoder (video container, camera,
/// image directory) to the tracking pipeline. Frames must come out in
/// capture order.
///
/// # Example
///
/// ```ignore
/// use balltrack_rs::{FrameSource, Frame};
///
/// struct MyCamera {
///     // Your capture handle here
/// }
///
/// impl FrameSource for MyCamera {
///     type Error = std::io::Error;
///
///     fn fps(&self) -> f64 {
///         30.0
///     }
///
///     fn next_frame(&mut self) -> Option<Result<Frame, Self::Error>> {
///         None
///     }
/// }
/// ```
pub trait FrameSource {
    /// Error type for frame acquisition failures.
    type Error;

    /// Nominal frame rate of the source.
    fn fps(&self) -> f64;

    /// The next frame, `None` once the source is exhausted.
    fn next_frame(&mut self) -> Option<std::result::Result<Frame, Self::Error>>;
}

/// Adapter turning any iterator of already decoded frames into a source.
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    frames: I,
    fps: f64,
}

impl<I: Iterator<Item = Frame>> IterSource<I> {
    pub fn new(frames: impl IntoIterator<IntoIter = I>, fps: f64) -> Self {
        Self {
            frames: frames.into_iter(),
            fps,
        }
    }
}

impl<I: Iterator<Item = Frame>> FrameSource for IterSource<I> {
    type Error = std::convert::Infallible;

    fn fps(&self) -> f64 {
        self.fps
    }

    fn next_frame(&mut self) -> Option<std::result::Result<Frame, Self::Error>> {
        self.frames.next().map(Ok)
    }
}

/// A directory of still images treated as consecutive video frames, in
/// file-name order.
#[derive(Debug, Clone)]
pub struct ImageSequenceSource {
    paths: std::vec::IntoIter<PathBuf>,
    fps: f64,
}

impl ImageSequenceSource {
    /// List the image files in `dir`. Fails with `NotFound` when the
    /// directory does not exist.
    pub fn open(dir: impl AsRef<Path>, fps: f64) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(TrackError::NotFound(dir.to_path_buf()));
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_image_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        Ok(Self {
            paths: paths.into_iter(),
            fps,
        })
    }

    /// Frames not yet read.
    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl FrameSource for ImageSequenceSource {
    type Error = TrackError;

    fn fps(&self) -> f64 {
        self.fps
    }

    fn next_frame(&mut self) -> Option<Result<Frame>> {
        let path = self.paths.next()?;
        Some(load_frame(&path))
    }
}

/// Read and decode a single image file into a frame.
pub fn load_frame(path: &Path) -> Result<Frame> {
    if !path.is_file() {
        return Err(TrackError::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    Frame::decode(&bytes).map_err(|err| match err {
        TrackError::Decode(msg) => TrackError::Decode(format!("{}: {msg}", path.display())),
        other => other,
    })
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
