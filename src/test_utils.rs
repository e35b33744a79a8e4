//! Synthetic frames for detector and tracker unit tests.

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::detector::Frame;

/// Saturated orange close to the ideal target colour (H≈11, S≈234, V=240).
pub(crate) const BALL_ORANGE: [u8; 3] = [240, 100, 20];

/// Dark green table surface; matches neither colour window.
pub(crate) const TABLE_GREEN: [u8; 3] = [20, 60, 30];

/// Paint a solid disk of `color` with radius `r` centred at `(cx, cy)`.
pub(crate) fn draw_disk(img: &mut RgbImage, cx: f64, cy: f64, r: f64, color: [u8; 3]) {
    for (x, y, px) in img.enumerate_pixels_mut() {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        if dx * dx + dy * dy <= r * r {
            *px = Rgb(color);
        }
    }
}

/// Set every mask pixel within `r` of `(cx, cy)` to foreground.
pub(crate) fn fill_disk_mask(mask: &mut GrayImage, cx: f64, cy: f64, r: f64) {
    for (x, y, px) in mask.enumerate_pixels_mut() {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        if dx * dx + dy * dy <= r * r {
            *px = Luma([255]);
        }
    }
}

/// A table-green frame with one orange disk per `(cx, cy, r)` entry.
pub(crate) fn frame_with_disks(w: u32, h: u32, disks: &[(f64, f64, f64)]) -> Frame {
    let mut img = RgbImage::from_pixel(w, h, Rgb(TABLE_GREEN));
    for &(cx, cy, r) in disks {
        draw_disk(&mut img, cx, cy, r, BALL_ORANGE);
    }
    Frame::new(img).expect("synthetic frame has non-zero area")
}
