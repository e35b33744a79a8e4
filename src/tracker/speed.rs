//! Instantaneous speed between consecutive accepted detections.

use crate::detector::Position;

/// Time between two detections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Elapsed {
    /// Discrete video processing: frame count at a fixed frame rate.
    Frames { frames: i64, fps: f64 },
    /// Live processing: wall-clock seconds.
    Seconds(f64),
}

impl Elapsed {
    /// Elapsed seconds, or `None` when the interval is not strictly
    /// positive and finite.
    pub fn seconds(&self) -> Option<f64> {
        let secs = match *self {
            Elapsed::Frames { frames, fps } if frames > 0 && fps > 0.0 => frames as f64 / fps,
            Elapsed::Frames { .. } => return None,
            Elapsed::Seconds(s) => s,
        };
        (secs.is_finite() && secs > 0.0).then_some(secs)
    }
}

/// Round to one decimal place.
#[inline]
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Speed in pixels per second between `prev` and `cur`, rounded to one
/// decimal. `None` when either endpoint is missing or no time has passed.
pub fn estimate_speed(prev: Option<Position>, cur: Option<Position>, elapsed: Elapsed) -> Option<f64> {
    let (prev, cur) = (prev?, cur?);
    let dist = (cur.to_point() - prev.to_point()).norm();
    let speed = match elapsed {
        Elapsed::Frames { frames, fps } => {
            elapsed.seconds()?;
            dist * fps / frames as f64
        }
        Elapsed::Seconds(_) => dist / elapsed.seconds()?,
    };
    Some(round1(speed))
}
