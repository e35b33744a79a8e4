//! Builder for creating `Frame` objects from raw pixel buffers.

use image::RgbImage;

use crate::detector::Frame;
use crate::error::{Result, TrackError};

/// Byte order of the three colour channels in a raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelLayout {
    #[default]
    Rgb,
    /// Blue, green, red; what most capture libraries hand out.
    Bgr,
}

/// Builder for creating `Frame` objects from interleaved 8-bit buffers.
#[derive(Debug, Clone, Default)]
pub struct FrameBuilder {
    width: u32,
    height: u32,
    layout: ChannelLayout,
}

impl FrameBuilder {
    /// Create a new frame builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the frame dimensions in pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the channel order of the input buffer.
    pub fn layout(mut self, layout: ChannelLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Build the final `Frame` from `data`, which must hold exactly
    /// `width * height * 3` bytes.
    pub fn build(self, data: &[u8]) -> Result<Frame> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(TrackError::EmptyFrame { width, height });
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(TrackError::BufferSize {
                expected,
                got: data.len(),
                width,
                height,
            });
        }

        let pixels = match self.layout {
            ChannelLayout::Rgb => data.to_vec(),
            ChannelLayout::Bgr => data
                .chunks_exact(3)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect(),
        };

        let image = RgbImage::from_raw(width, height, pixels).ok_or(TrackError::BufferSize {
            expected,
            got: data.len(),
            width,
            height,
        })?;
        Frame::new(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgr_is_swapped() {
        let frame = FrameBuilder::new()
            .size(2, 1)
            .layout(ChannelLayout::Bgr)
            .build(&[20, 100, 240, 0, 0, 255])
            .unwrap();
        assert_eq!(frame.image().get_pixel(0, 0).0, [240, 100, 20]);
        assert_eq!(frame.image().get_pixel(1, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = FrameBuilder::new().size(4, 4).build(&[0; 47]).unwrap_err();
        assert!(matches!(
            err,
            TrackError::BufferSize {
                expected: 48,
                got: 47,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = FrameBuilder::new().build(&[]).unwrap_err();
        assert!(matches!(err, TrackError::EmptyFrame { .. }));
    }
}
