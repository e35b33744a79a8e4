mod ball_tracker;
mod detection;
mod motion;
mod speed;
mod timestamp;
mod track_state;

pub use ball_tracker::{BallTracker, TrackSession};
pub use detection::Detection;
pub use motion::MotionPredictor;
pub use speed::{Elapsed, estimate_speed, round1};
pub use timestamp::{FrameTime, format_timestamp, frame_to_timestamp};
pub use track_state::{TrackPhase, TrackState};
