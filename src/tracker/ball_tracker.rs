//! Frame-to-frame ball tracking on top of the single-frame detector.

use tracing::debug;

use crate::config::DetectorConfig;
use crate::detector::{BallDetector, Frame};

use super::detection::Detection;
use super::motion::MotionPredictor;
use super::speed::estimate_speed;
use super::timestamp::FrameTime;
use super::track_state::TrackState;

/// Composes prediction, detection, confidence and speed for one frame.
///
/// The tracker itself is stateless; the caller owns the [`TrackState`] of
/// each session, so one tracker can serve many sessions concurrently.
#[derive(Debug, Clone, Default)]
pub struct BallTracker {
    detector: BallDetector,
    predictor: MotionPredictor,
}

impl BallTracker {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            detector: BallDetector::new(config),
            predictor: MotionPredictor::new(),
        }
    }

    pub fn detector(&self) -> &BallDetector {
        &self.detector
    }

    pub fn config(&self) -> &DetectorConfig {
        self.detector.config()
    }

    /// Detect the ball in `frame` captured at `time`, updating `state` only
    /// when a ball is found.
    pub fn detect_with_tracking(
        &self,
        frame: &Frame,
        state: &mut TrackState,
        time: FrameTime,
    ) -> Detection {
        let predicted = if self.config().motion_prediction {
            self.predictor
                .predict(state, &time, frame.width(), frame.height())
        } else {
            None
        };

        let frame_index = time.index();
        let timestamp = time.timestamp();

        let Some(fix) = self.detector.detect(frame, predicted) else {
            debug!(frame_index, tracking = state.is_tracking(), "ball not found");
            return Detection::missed(frame_index, timestamp);
        };

        let speed = match state.last_time() {
            Some(last) => estimate_speed(
                state.last_position(),
                Some(fix.position),
                time.elapsed_since(&last),
            ),
            None => None,
        };
        state.accept(fix.position, time);

        Detection::found(frame_index, timestamp, fix.position, speed, fix.confidence)
    }
}

/// A tracker bundled with the state of one session, for callers that drive
/// their own frame loop.
#[derive(Debug, Clone, Default)]
pub struct TrackSession {
    tracker: BallTracker,
    state: TrackState,
}

impl TrackSession {
    pub fn new(tracker: BallTracker) -> Self {
        Self {
            tracker,
            state: TrackState::new(),
        }
    }

    /// Continue a session from a previously reported state.
    pub fn with_state(tracker: BallTracker, state: TrackState) -> Self {
        Self { tracker, state }
    }

    pub fn process_frame(&mut self, frame: &Frame, time: FrameTime) -> Detection {
        self.tracker
            .detect_with_tracking(frame, &mut self.state, time)
    }

    pub fn state(&self) -> &TrackState {
        &self.state
    }

    pub fn tracker(&self) -> &BallTracker {
        &self.tracker
    }

    pub fn into_state(self) -> TrackState {
        self.state
    }
}
