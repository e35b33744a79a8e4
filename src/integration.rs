//! Integration module for feeding frames into the tracker and recording
//! its output.
//!
//! This module provides frame construction from raw buffers, frame sources
//! for image sequences, the batch pipeline and export sessions.

mod builder;
mod export;
mod pipeline;
mod source;

pub use builder::{ChannelLayout, FrameBuilder};
pub use export::{EXPORT_FPS, ExportFrame, ExportSession};
pub use pipeline::{SequenceResult, TrackerPipeline, process_sequence};
pub use source::{FrameSource, ImageSequenceSource, IterSource, load_frame};
