//! Single-frame ball detection.
//!
//! The pipeline is: downscale to a bounded working resolution, segment the
//! primary colour in HSV, condition the mask, rank contours by purity,
//! shape and (optionally) proximity to a motion prediction, then fuse the
//! winner's purity and circularity into a confidence value. When the primary
//! colour yields nothing, one fallback pass on a bright achromatic window is
//! attempted.

mod candidate;
mod confidence;
mod frame;
mod morphology;
mod preprocess;
mod segment;

pub use candidate::{CandidateBlob, Moments, circularity, color_purity};
pub use confidence::{estimate as estimate_confidence, round3};
pub use frame::Frame;
pub use preprocess::{WorkingFrame, prepare};
pub use segment::{HsvImage, rgb_to_hsv};

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DetectorConfig;
use crate::error::Result;
use candidate::{SearchContext, select_candidate};

/// Integer pixel position in original-frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Round a sub-pixel point to the nearest integer position.
    pub fn from_point(p: Point2<f64>) -> Self {
        Self {
            x: p.x.round() as i32,
            y: p.y.round() as i32,
        }
    }

    pub fn to_point(self) -> Point2<f64> {
        Point2::new(self.x as f64, self.y as f64)
    }
}

/// Which colour window produced a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorChannel {
    Primary,
    Fallback,
}

/// An accepted ball location for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallFix {
    pub position: Position,
    /// Confidence in `[0, 1]`, rounded to three decimals.
    pub confidence: f64,
    pub channel: ColorChannel,
}

/// Stateless colour/shape ball detector.
///
/// Holds only configuration, so one detector can be shared across threads
/// and sessions.
#[derive(Debug, Clone, Default)]
pub struct BallDetector {
    config: DetectorConfig,
}

impl BallDetector {
    /// Wrap `config` without checking it. The built-in profiles are always
    /// valid; hand-assembled configs should go through [`Self::try_new`].
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Wrap `config` after [`DetectorConfig::validate`] accepts it.
    pub fn try_new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Locate the ball in `frame`.
    ///
    /// `predicted` is an optional motion prediction in original-frame
    /// coordinates; it only biases the choice between candidates and never
    /// produces a position on its own. `None` means no ball was found.
    pub fn detect(&self, frame: &Frame, predicted: Option<Point2<f64>>) -> Option<BallFix> {
        let config = &self.config;
        let working = prepare(frame, config.working_resolution);
        let predicted = predicted.map(|p| working.to_working(p));
        let hsv = HsvImage::from_rgb(&working.image);

        let primary_mask = morphology::condition_mask(
            &hsv.in_range(&config.primary),
            config.kernel_radius,
            true,
        );
        let primary = select_candidate(
            &primary_mask,
            &config.candidate,
            &config.scoring,
            &config.target,
            SearchContext {
                hsv: Some(&hsv),
                allow_streak: config.motion_prediction,
                predicted,
            },
        );

        let (blob, channel) = match primary {
            Some(blob) => (blob, ColorChannel::Primary),
            None => {
                debug!("no primary-colour candidate, trying achromatic fallback");
                let fallback_mask = morphology::condition_mask(
                    &hsv.in_range(&config.secondary),
                    config.kernel_radius,
                    false,
                );
                let blob = select_candidate(
                    &fallback_mask,
                    &config.candidate,
                    &config.scoring,
                    &config.target,
                    SearchContext {
                        hsv: None,
                        allow_streak: false,
                        predicted,
                    },
                )?;
                (blob, ColorChannel::Fallback)
            }
        };

        let confidence = confidence::estimate(blob.purity, blob.circularity, &config.confidence);
        let position = Position::from_point(working.to_original(blob.centroid));

        debug!(
            x = position.x,
            y = position.y,
            confidence,
            ?channel,
            scale = working.scale,
            "ball detected"
        );

        Some(BallFix {
            position,
            confidence,
            channel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TuningProfile;
    use crate::test_utils::{BALL_ORANGE, TABLE_GREEN, draw_disk, frame_with_disks};
    use image::{Rgb, RgbImage};

    #[test]
    fn test_blank_frame_has_no_detection() {
        let frame = Frame::new(RgbImage::from_pixel(320, 240, Rgb([20, 60, 30]))).unwrap();
        assert!(BallDetector::default().detect(&frame, None).is_none());
    }

    #[test]
    fn test_single_orange_disk() {
        let frame = frame_with_disks(320, 240, &[(140.0, 90.0, 10.0)]);
        let fix = BallDetector::default().detect(&frame, None).unwrap();
        assert_eq!(fix.channel, ColorChannel::Primary);
        assert!((fix.position.x - 140).abs() <= 1);
        assert!((fix.position.y - 90).abs() <= 1);
        assert!(fix.confidence > 0.8, "confidence {}", fix.confidence);
        assert!(fix.confidence <= 1.0);
    }

    #[test]
    fn test_baseline_profile_detects_disk() {
        let frame = frame_with_disks(320, 240, &[(60.0, 180.0, 8.0)]);
        let detector = BallDetector::new(DetectorConfig::from_profile(TuningProfile::Baseline));
        let fix = detector.detect(&frame, None).unwrap();
        assert!((fix.position.x - 60).abs() <= 1);
        assert!((fix.position.y - 180).abs() <= 1);
    }

    #[test]
    fn test_white_ball_uses_fallback() {
        let mut img = RgbImage::from_pixel(320, 240, Rgb([20, 60, 30]));
        draw_disk(&mut img, 200.0, 100.0, 9.0, [235, 235, 230]);
        let frame = Frame::new(img).unwrap();
        let fix = BallDetector::default().detect(&frame, None).unwrap();
        assert_eq!(fix.channel, ColorChannel::Fallback);
        assert!((fix.position.x - 200).abs() <= 1);
        // purity is not scored on the fallback channel
        assert!(fix.confidence <= 0.4 + 1e-9);
        assert!(fix.confidence > 0.0);
    }

    #[test]
    fn test_downscaled_detection_matches_native() {
        let (cx, cy, r) = (801.0, 603.0, 24.0);
        let native = frame_with_disks(1600, 1200, &[(cx, cy, r)]);

        let mut config = DetectorConfig::default();
        config.working_resolution = 1600;
        let full = BallDetector::new(config).detect(&native, None).unwrap();
        let scaled = BallDetector::default().detect(&native, None).unwrap();

        assert!((full.position.x - scaled.position.x).abs() <= 1);
        assert!((full.position.y - scaled.position.y).abs() <= 1);
        assert!((scaled.position.x - cx as i32).abs() <= 1);
        assert!((scaled.position.y - cy as i32).abs() <= 1);
    }

    #[test]
    fn test_prediction_selects_nearer_of_equal_blobs() {
        let frame = frame_with_disks(320, 240, &[(80.0, 120.0, 7.0), (240.0, 120.0, 7.0)]);
        let detector = BallDetector::default();

        let near_right = detector
            .detect(&frame, Some(Point2::new(236.0, 118.0)))
            .unwrap();
        assert!((near_right.position.x - 240).abs() <= 1);

        let near_left = detector
            .detect(&frame, Some(Point2::new(84.0, 123.0)))
            .unwrap();
        assert!((near_left.position.x - 80).abs() <= 1);
    }

    #[test]
    fn test_disk_inside_ring_hole_not_reported() {
        let mut img = RgbImage::from_pixel(320, 240, Rgb(TABLE_GREEN));
        draw_disk(&mut img, 160.0, 120.0, 100.0, BALL_ORANGE);
        draw_disk(&mut img, 160.0, 120.0, 80.0, TABLE_GREEN);
        draw_disk(&mut img, 160.0, 120.0, 8.0, BALL_ORANGE);
        let frame = Frame::new(img).unwrap();
        assert!(BallDetector::default().detect(&frame, None).is_none());
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let mut config = DetectorConfig::default();
        config.working_resolution = 0;
        assert!(matches!(
            BallDetector::try_new(config),
            Err(crate::error::TrackError::InvalidConfig(_))
        ));
        assert!(BallDetector::try_new(DetectorConfig::default()).is_ok());
    }

    #[test]
    fn test_detector_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BallDetector>();
        assert_send_sync::<Frame>();
    }

    #[test]
    fn test_prediction_never_fabricates_a_fix() {
        let frame = Frame::new(RgbImage::new(320, 240)).unwrap();
        let detector = BallDetector::default();
        assert!(detector.detect(&frame, Some(Point2::new(100.0, 100.0))).is_none());
    }
}
