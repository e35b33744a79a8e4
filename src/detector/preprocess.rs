//! Bounded working-resolution preprocessing.

use std::borrow::Cow;

use image::RgbImage;
use image::imageops::{self, FilterType};
use nalgebra::Point2;

use super::frame::Frame;

/// The frame actually analysed, together with the factor mapping working
/// coordinates back to the original frame.
#[derive(Debug)]
pub struct WorkingFrame<'a> {
    pub image: Cow<'a, RgbImage>,
    /// `working_dimension / original_dimension`, never above 1.
    pub scale: f64,
}

impl WorkingFrame<'_> {
    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Working-frame coordinates → original-frame coordinates. Pixel
    /// centres sit at half-integer offsets, matching the resampler.
    #[inline]
    pub fn to_original(&self, p: Point2<f64>) -> Point2<f64> {
        p.map(|v| (v + 0.5) / self.scale - 0.5)
    }

    /// Original-frame coordinates → working-frame coordinates.
    #[inline]
    pub fn to_working(&self, p: Point2<f64>) -> Point2<f64> {
        p.map(|v| (v + 0.5) * self.scale - 0.5)
    }
}

/// Downscale `frame` so its longest side is at most `working_resolution`,
/// preserving aspect ratio. Frames already small enough are borrowed as-is.
pub fn prepare(frame: &Frame, working_resolution: u32) -> WorkingFrame<'_> {
    let (w, h) = (frame.width(), frame.height());
    let longest = w.max(h);
    if longest <= working_resolution {
        return WorkingFrame {
            image: Cow::Borrowed(frame.image()),
            scale: 1.0,
        };
    }

    let scale = working_resolution as f64 / longest as f64;
    let new_w = ((w as f64 * scale).round() as u32).max(1);
    let new_h = ((h as f64 * scale).round() as u32).max(1);
    let resized = imageops::resize(frame.image(), new_w, new_h, FilterType::Triangle);

    WorkingFrame {
        image: Cow::Owned(resized),
        scale,
    }
}
