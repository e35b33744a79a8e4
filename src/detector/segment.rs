//! Colour segmentation in HSV space.

use image::{GrayImage, Luma, RgbImage};
use ndarray::Array3;

use crate::config::HsvRange;

/// Foreground value written into binary masks.
pub const MASK_ON: u8 = 255;

/// Convert one RGB pixel to HSV with hue on 0..=180 and S, V on 0..=255.
#[inline]
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let r = rgb[0] as f32;
    let g = rgb[1] as f32;
    let b = rgb[2] as f32;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { delta / max * 255.0 } else { 0.0 };

    let mut h = if delta <= 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        60.0 * (b - r) / delta + 120.0
    } else {
        60.0 * (r - g) / delta + 240.0
    };
    if h < 0.0 {
        h += 360.0;
    }

    [
        (h / 2.0).round().min(180.0) as u8,
        s.round() as u8,
        max as u8,
    ]
}

/// HSV image stored as a `(height, width, 3)` array.
#[derive(Debug, Clone)]
pub struct HsvImage {
    data: Array3<u8>,
}

impl HsvImage {
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (w, h) = image.dimensions();
        let mut data = Array3::zeros((h as usize, w as usize, 3));
        for (x, y, px) in image.enumerate_pixels() {
            let hsv = rgb_to_hsv(px.0);
            for c in 0..3 {
                data[[y as usize, x as usize, c]] = hsv[c];
            }
        }
        Self { data }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    /// Binary mask of pixels inside `range` (inclusive on every channel).
    pub fn in_range(&self, range: &HsvRange) -> GrayImage {
        let mut mask = GrayImage::new(self.width() as u32, self.height() as u32);
        for (x, y, px) in mask.enumerate_pixels_mut() {
            if range.contains(self.pixel(x as usize, y as usize)) {
                *px = Luma([MASK_ON]);
            }
        }
        mask
    }
}
