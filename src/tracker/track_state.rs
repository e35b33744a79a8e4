use nalgebra::Vector2;

use crate::detector::Position;

use super::timestamp::FrameTime;

/// Session phase for single-ball tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackPhase {
    /// No detection has been accepted yet
    #[default]
    NoTrack,
    /// At least one detection has been accepted; never reverts
    Tracking,
}

/// Per-session memory carried between frames.
///
/// Only accepted detections change it. A missed frame leaves the last good
/// fix and velocity in place so prediction keeps working from them.
#[derive(Debug, Clone, Default)]
pub struct TrackState {
    phase: TrackPhase,
    last_position: Option<Position>,
    last_time: Option<FrameTime>,
    /// Pixels per second along x and y
    velocity: Option<Vector2<f64>>,
}

impl TrackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a state from a fix reported by an earlier request, for
    /// request-driven callers that cannot keep the state in memory.
    pub fn resume(position: Position, time: FrameTime, velocity: Option<Vector2<f64>>) -> Self {
        Self {
            phase: TrackPhase::Tracking,
            last_position: Some(position),
            last_time: Some(time),
            velocity,
        }
    }

    pub fn phase(&self) -> TrackPhase {
        self.phase
    }

    pub fn is_tracking(&self) -> bool {
        self.phase == TrackPhase::Tracking
    }

    pub fn last_position(&self) -> Option<Position> {
        self.last_position
    }

    pub fn last_time(&self) -> Option<FrameTime> {
        self.last_time
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.last_time.map(|t| t.index())
    }

    pub fn velocity(&self) -> Option<Vector2<f64>> {
        self.velocity
    }

    /// Record an accepted detection. Velocity is re-derived from the
    /// previous fix when time has moved forward, otherwise it is dropped.
    pub(crate) fn accept(&mut self, position: Position, time: FrameTime) {
        self.velocity = match (self.last_position, self.last_time) {
            (Some(prev), Some(prev_time)) => time
                .elapsed_since(&prev_time)
                .seconds()
                .map(|dt| (position.to_point() - prev.to_point()) / dt),
            _ => None,
        };
        self.last_position = Some(position);
        self.last_time = Some(time);
        self.phase = TrackPhase::Tracking;
    }
}
