//! Recording of per-frame tracking results to a JSON export file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::detector::Position;
use crate::error::Result;
use crate::tracker::Detection;

/// Playback rate written into every export file.
pub const EXPORT_FPS: u32 = 8;

/// One recorded frame of an export session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportFrame {
    pub timestamp: String,
    pub frame_index: u64,
    pub ball_position: Option<Position>,
    pub confidence: f64,
    pub ball_bounced_this_frame: bool,
}

impl From<&Detection> for ExportFrame {
    fn from(det: &Detection) -> Self {
        Self {
            timestamp: det.timestamp.clone(),
            frame_index: det.frame_index,
            ball_position: det.ball_position,
            confidence: det.confidence,
            ball_bounced_this_frame: false,
        }
    }
}

#[derive(Serialize)]
struct ExportFile<'a> {
    frames: &'a [ExportFrame],
    export_fps: u32,
}

/// An open recording. Frames are buffered in memory and written once by
/// [`ExportSession::finish`].
#[derive(Debug, Clone)]
pub struct ExportSession {
    path: PathBuf,
    frames: Vec<ExportFrame>,
}

impl ExportSession {
    /// Open a session whose file will be `dir/export_YYYYMMDD_HHMMSS.json`.
    pub fn start(dir: impl AsRef<Path>, now: DateTime<Utc>) -> Self {
        let name = format!("export_{}.json", now.format("%Y%m%d_%H%M%S"));
        Self {
            path: dir.as_ref().join(name),
            frames: Vec::new(),
        }
    }

    pub fn push(&mut self, frame: ExportFrame) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frames(&self) -> &[ExportFrame] {
        &self.frames
    }

    /// Write the file, creating its directory if needed, and return where
    /// it went together with the number of frames written.
    pub fn finish(self) -> Result<(PathBuf, usize)> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body = ExportFile {
            frames: &self.frames,
            export_fps: EXPORT_FPS,
        };
        let json = serde_json::to_string_pretty(&body)?;
        std::fs::write(&self.path, json)?;

        info!(path = %self.path.display(), frames = self.frames.len(), "export written");
        Ok((self.path, self.frames.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("balltrack-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_name_from_start_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let session = ExportSession::start("/tmp/exports", now);
        assert_eq!(
            session.path(),
            Path::new("/tmp/exports/export_20240309_070501.json")
        );
        assert!(session.is_empty());
    }

    #[test]
    fn test_finish_writes_frames() {
        let dir = scratch_dir("export");
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut session = ExportSession::start(&dir, now);

        let found = Detection::found(0, "00:00:00.00".into(), Position::new(5, 6), None, 0.9);
        session.push(ExportFrame::from(&found));
        session.push(ExportFrame {
            ball_bounced_this_frame: true,
            ..ExportFrame::from(&Detection::missed(1, "00:00:00.04".into()))
        });

        let (path, count) = session.finish().unwrap();
        assert_eq!(count, 2);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["export_fps"], 8);
        assert_eq!(json["frames"][0]["ball_position"]["x"], 5);
        assert!(json["frames"][1]["ball_position"].is_null());
        assert_eq!(json["frames"][1]["ball_bounced_this_frame"], true);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_empty_session_still_writes() {
        let dir = scratch_dir("export-empty");
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 6).unwrap();
        let (path, count) = ExportSession::start(&dir, now).finish().unwrap();
        assert_eq!(count, 0);
        assert!(path.is_file());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
