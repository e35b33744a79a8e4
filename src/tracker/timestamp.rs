//! Frame timing and `HH:MM:SS.mm` formatting.

use super::speed::Elapsed;

/// When a frame was captured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameTime {
    /// Position in a video with a fixed frame rate.
    Video { index: u64, fps: f64 },
    /// Wall-clock capture time, for live or request-driven streams.
    Live { index: u64, seconds: f64 },
}

impl FrameTime {
    pub fn from_index(index: u64, fps: f64) -> Self {
        Self::Video { index, fps }
    }

    pub fn from_seconds(index: u64, seconds: f64) -> Self {
        Self::Live { index, seconds }
    }

    pub fn index(&self) -> u64 {
        match *self {
            Self::Video { index, .. } | Self::Live { index, .. } => index,
        }
    }

    /// Seconds since the start of the stream; 0 for a non-positive frame
    /// rate.
    pub fn seconds(&self) -> f64 {
        match *self {
            Self::Video { index, fps } if fps > 0.0 => index as f64 / fps,
            Self::Video { .. } => 0.0,
            Self::Live { seconds, .. } => seconds,
        }
    }

    /// Time elapsed since `earlier`. Two video times measure in frames,
    /// anything else in seconds.
    pub fn elapsed_since(&self, earlier: &FrameTime) -> Elapsed {
        match (*earlier, *self) {
            (Self::Video { index: a, .. }, Self::Video { index: b, fps }) => Elapsed::Frames {
                frames: b as i64 - a as i64,
                fps,
            },
            _ => Elapsed::Seconds(self.seconds() - earlier.seconds()),
        }
    }

    pub fn timestamp(&self) -> String {
        format_timestamp(self.seconds())
    }
}

/// Format seconds as `HH:MM:SS.mm`. Hours do not roll over at 24; negative
/// or non-finite input formats as zero.
pub fn format_timestamp(seconds: f64) -> String {
    let centis = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 100.0).round() as u64
    } else {
        0
    };
    let h = centis / 360_000;
    let m = (centis / 6_000) % 60;
    let s = (centis / 100) % 60;
    let cs = centis % 100;
    format!("{h:02}:{m:02}:{s:02}.{cs:02}")
}

/// Timestamp of frame `index` at `fps`.
pub fn frame_to_timestamp(index: u64, fps: f64) -> String {
    FrameTime::from_index(index, fps).timestamp()
}
