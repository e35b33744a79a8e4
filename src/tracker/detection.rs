//! Per-frame output record.

use serde::{Deserialize, Serialize};

use crate::detector::Position;

/// Detection result for one frame, in original-frame pixel coordinates.
///
/// `confidence` is exactly 0.0 whenever `ball_position` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(alias = "frame")]
    pub frame_index: u64,
    /// `HH:MM:SS.mm`
    pub timestamp: String,
    pub ball_position: Option<Position>,
    pub ball_speed_px_per_sec: Option<f64>,
    pub confidence: f64,
}

impl Detection {
    pub fn found(
        frame_index: u64,
        timestamp: String,
        position: Position,
        speed: Option<f64>,
        confidence: f64,
    ) -> Self {
        Self {
            frame_index,
            timestamp,
            ball_position: Some(position),
            ball_speed_px_per_sec: speed,
            confidence,
        }
    }

    pub fn missed(frame_index: u64, timestamp: String) -> Self {
        Self {
            frame_index,
            timestamp,
            ball_position: None,
            ball_speed_px_per_sec: None,
            confidence: 0.0,
        }
    }

    pub fn is_found(&self) -> bool {
        self.ball_position.is_some()
    }
}
