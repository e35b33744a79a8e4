//! balltrack-rs: colour-based table-tennis ball detection and tracking.
//!
//! Each frame goes through these stages:
//!
//! 1. **Preprocess** – downscale to the working resolution.
//! 2. **Segment** – HSV threshold on the ball colour, white as fallback.
//! 3. **Morphology** – close, open and dilate the mask.
//! 4. **Candidates** – contour filtering by area and circularity, scored by
//!    colour purity, size and closeness to the predicted position.
//! 5. **Tracking** – constant-velocity prediction, speed and timestamps
//!    across frames.
//!
//! # Public API
//! - [`BallDetector`] for single frames, [`BallTracker`] and [`TrackSession`]
//!   for sequences
//! - [`DetectorConfig`] for tuning, with two built-in [`TuningProfile`]s
//! - [`TrackerPipeline`] and [`FrameSource`] for batch runs
//! - [`ExportSession`] for recording results to disk

pub mod config;
pub mod detector;
pub mod error;
pub mod integration;
pub mod tracker;

#[cfg(test)]
mod test_utils;

pub use config::{DetectorConfig, TuningProfile};
pub use detector::{BallDetector, BallFix, ColorChannel, Frame, Position};
pub use error::{Result, TrackError};
pub use integration::{
    ChannelLayout, ExportFrame, ExportSession, FrameBuilder, FrameSource, ImageSequenceSource,
    SequenceResult, TrackerPipeline, process_sequence,
};
pub use tracker::{BallTracker, Detection, FrameTime, TrackPhase, TrackSession, TrackState};
