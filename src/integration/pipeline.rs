//! TrackerPipeline for running the tracker over an ordered frame sequence.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::DetectorConfig;
use crate::detector::Frame;
use crate::tracker::{BallTracker, Detection, FrameTime, TrackState};

use super::FrameSource;

/// Output of a batch run: one detection per input frame, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceResult {
    pub fps: f64,
    pub frames_processed: usize,
    pub detections: Vec<Detection>,
}

/// Runs a [`BallTracker`] over whole sequences, one fresh session per call.
#[derive(Debug, Clone, Default)]
pub struct TrackerPipeline {
    tracker: BallTracker,
}

impl TrackerPipeline {
    /// Create a new pipeline with the given detector configuration.
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            tracker: BallTracker::new(config),
        }
    }

    /// Track the ball through `frames`, numbered from 0 at `fps`.
    pub fn process_sequence<I>(&self, frames: I, fps: f64) -> SequenceResult
    where
        I: IntoIterator<Item = Frame>,
    {
        let mut state = TrackState::new();
        let detections: Vec<Detection> = frames
            .into_iter()
            .enumerate()
            .map(|(index, frame)| {
                self.tracker.detect_with_tracking(
                    &frame,
                    &mut state,
                    FrameTime::from_index(index as u64, fps),
                )
            })
            .collect();
        summarize(detections, fps)
    }

    /// Track the ball through every frame `source` yields. The first frame
    /// error aborts the run and is returned unchanged.
    pub fn process_source<S: FrameSource>(&self, source: &mut S) -> Result<SequenceResult, S::Error> {
        let fps = source.fps();
        let mut state = TrackState::new();
        let mut detections = Vec::new();
        let mut index = 0u64;

        while let Some(frame) = source.next_frame() {
            let frame = frame?;
            detections.push(self.tracker.detect_with_tracking(
                &frame,
                &mut state,
                FrameTime::from_index(index, fps),
            ));
            index += 1;
        }

        Ok(summarize(detections, fps))
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &BallTracker {
        &self.tracker
    }
}

/// Track the ball through `frames` at `fps` with the given configuration.
pub fn process_sequence<I>(frames: I, fps: f64, config: &DetectorConfig) -> SequenceResult
where
    I: IntoIterator<Item = Frame>,
{
    TrackerPipeline::new(config.clone()).process_sequence(frames, fps)
}

fn summarize(detections: Vec<Detection>, fps: f64) -> SequenceResult {
    let found = detections.iter().filter(|d| d.is_found()).count();
    info!(
        frames = detections.len(),
        found,
        fps,
        "sequence processed"
    );
    SequenceResult {
        fps,
        frames_processed: detections.len(),
        detections,
    }
}
