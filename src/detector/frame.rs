//! Decoded RGB frames accepted by the detector.

use image::RgbImage;

use crate::error::{Result, TrackError};

/// An immutable RGB raster with non-zero width and height.
///
/// Construction is the only place the zero-area check happens; everything
/// downstream may assume `width > 0 && height > 0`.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Wrap an already decoded RGB image.
    pub fn new(image: RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TrackError::EmptyFrame { width, height });
        }
        Ok(Self { image })
    }

    /// Decode an encoded still image (PNG, JPEG, ...) into a frame.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| TrackError::Decode(e.to_string()))?
            .to_rgb8();
        Self::new(image)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

impl TryFrom<RgbImage> for Frame {
    type Error = TrackError;

    fn try_from(image: RgbImage) -> Result<Self> {
        Self::new(image)
    }
}
