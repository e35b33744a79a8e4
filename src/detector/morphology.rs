//! Binary mask conditioning.

use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology;

/// Close small gaps, drop speckle, and optionally dilate to merge fragments
/// split by motion blur. A zero radius leaves the mask untouched.
pub fn condition_mask(mask: &GrayImage, radius: u8, dilate: bool) -> GrayImage {
    if radius == 0 {
        return mask.clone();
    }
    let closed = morphology::close(mask, Norm::L2, radius);
    let opened = morphology::open(&closed, Norm::L2, radius);
    if dilate {
        morphology::dilate(&opened, Norm::L2, radius)
    } else {
        opened
    }
}
