//! Constant-velocity, single-step position prediction.

use nalgebra::Point2;

use super::timestamp::FrameTime;
use super::track_state::TrackState;

/// Linear extrapolation of the last accepted fix.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionPredictor;

impl MotionPredictor {
    pub fn new() -> Self {
        Self
    }

    /// Predicted position at `now` in original-frame coordinates.
    ///
    /// Returns `None` when there is no fix or velocity yet, when time has
    /// not advanced, or when the extrapolation leaves the
    /// `width × height` frame. Callers then fall back to unaided detection.
    pub fn predict(
        &self,
        state: &TrackState,
        now: &FrameTime,
        width: u32,
        height: u32,
    ) -> Option<Point2<f64>> {
        let last = state.last_position()?.to_point();
        let velocity = state.velocity()?;
        let dt = now.elapsed_since(&state.last_time()?).seconds()?;

        let predicted = last + velocity * dt;
        let in_bounds = predicted.x >= 0.0
            && predicted.x < width as f64
            && predicted.y >= 0.0
            && predicted.y < height as f64;
        in_bounds.then_some(predicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Position;

    fn moving_state() -> TrackState {
        let mut state = TrackState::new();
        state.accept(Position::new(100, 50), FrameTime::from_index(0, 25.0));
        state.accept(Position::new(110, 50), FrameTime::from_index(1, 25.0));
        state
    }

    #[test]
    fn test_linear_extrapolation() {
        let state = moving_state();
        let p = MotionPredictor::new()
            .predict(&state, &FrameTime::from_index(3, 25.0), 640, 480)
            .unwrap();
        assert!((p.x - 130.0).abs() < 1e-9);
        assert!((p.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_needs_velocity() {
        let mut state = TrackState::new();
        state.accept(Position::new(100, 50), FrameTime::from_index(0, 25.0));
        let p = MotionPredictor::new().predict(&state, &FrameTime::from_index(1, 25.0), 640, 480);
        assert!(p.is_none());
    }

    #[test]
    fn test_non_positive_dt_disables_prediction() {
        let state = moving_state();
        let predictor = MotionPredictor::new();
        assert!(
            predictor
                .predict(&state, &FrameTime::from_index(1, 25.0), 640, 480)
                .is_none()
        );
        assert!(
            predictor
                .predict(&state, &FrameTime::from_index(0, 25.0), 640, 480)
                .is_none()
        );
    }

    #[test]
    fn test_out_of_bounds_discarded() {
        let state = moving_state();
        let predictor = MotionPredictor::new();
        // 10 px/frame for 60 frames lands at x = 710
        assert!(
            predictor
                .predict(&state, &FrameTime::from_index(61, 25.0), 640, 480)
                .is_none()
        );
        assert!(
            predictor
                .predict(&state, &FrameTime::from_index(61, 25.0), 1280, 480)
                .is_some()
        );
    }
}
