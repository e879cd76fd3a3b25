//! Session layout on disk.
//!
//! A session is one patient recording: a world video (as decoded frames),
//! the Pupil Labs fixation export, a directory of per-fixation detector
//! predictions, and the Unity engine log. Paths default to the layout the
//! recording tools produce and can be overridden one by one.

use std::path::{Path, PathBuf};

use ballgaze_common::error::{GazeError, GazeResult};

use crate::detection::{load_predictions, Detection};
use crate::engine_event::{load_engine_log, EngineEvent};
use crate::fixation::{load_fixations, Fixation};

/// Name of the extraction metadata table written next to saved frames.
pub const FRAMES_METADATA_FILE: &str = "frames_metadata.csv";

/// Paths for one patient session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Patient identifier (e.g. "AN755").
    pub patient_id: String,

    /// Session directory.
    pub root: PathBuf,

    frames_dir: PathBuf,
    fixations_path: PathBuf,
    predictions_dir: PathBuf,
    event_log_path: PathBuf,
    output_dir: PathBuf,
}

impl Session {
    /// Open a session directory with the default layout.
    pub fn open(patient_id: impl Into<String>, root: impl AsRef<Path>) -> GazeResult<Self> {
        let patient_id = patient_id.into();
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(GazeError::FileNotFound { path: root });
        }

        Ok(Self {
            frames_dir: root.join("world_frames"),
            fixations_path: root.join(format!("{patient_id}_fixations.csv")),
            predictions_dir: root.join("predictions"),
            event_log_path: root.join(format!("{patient_id}_events.log")),
            output_dir: root.join("extracted_frames"),
            patient_id,
            root,
        })
    }

    pub fn with_frames_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.frames_dir = path.into();
        self
    }

    pub fn with_fixations_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixations_path = path.into();
        self
    }

    pub fn with_predictions_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.predictions_dir = path.into();
        self
    }

    pub fn with_event_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.event_log_path = path.into();
        self
    }

    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    pub fn frames_dir(&self) -> &Path {
        &self.frames_dir
    }

    pub fn fixations_path(&self) -> &Path {
        &self.fixations_path
    }

    pub fn predictions_dir(&self) -> &Path {
        &self.predictions_dir
    }

    pub fn event_log_path(&self) -> &Path {
        &self.event_log_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Prediction file prefix for the fixation at row `index` of the export.
    ///
    /// Extracted frames are named `fix<index>.png`, so the detector writes
    /// `fix<index>.txt`. The trailing dot keeps `fix1` from matching `fix10`.
    pub fn prediction_prefix(index: usize) -> String {
        format!("fix{index}.")
    }

    pub fn load_fixations(&self) -> GazeResult<Vec<Fixation>> {
        load_fixations(&self.fixations_path)
    }

    pub fn load_engine_log(&self) -> GazeResult<Vec<EngineEvent>> {
        load_engine_log(&self.event_log_path)
    }

    pub fn load_predictions(&self, prefix: &str) -> GazeResult<Vec<Detection>> {
        load_predictions(&self.predictions_dir, prefix)
    }

    /// Check that every input exists. Returns one message per problem.
    pub fn validate_sources(&self) -> Vec<String> {
        let mut errors = vec![];

        if !self.frames_dir.is_dir() {
            errors.push(format!(
                "World frames directory missing: {}",
                self.frames_dir.display()
            ));
        }
        if !self.fixations_path.is_file() {
            errors.push(format!(
                "Fixation export missing: {}",
                self.fixations_path.display()
            ));
        }
        if !self.predictions_dir.is_dir() {
            errors.push(format!(
                "Predictions directory missing: {}",
                self.predictions_dir.display()
            ));
        }
        if !self.event_log_path.is_file() {
            errors.push(format!(
                "Engine log missing: {}",
                self.event_log_path.display()
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let dir = std::env::temp_dir().join("ballgaze_test_session_layout");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let session = Session::open("AN755", &dir).unwrap();
        assert_eq!(session.fixations_path(), dir.join("AN755_fixations.csv"));
        assert_eq!(session.event_log_path(), dir.join("AN755_events.log"));
        assert_eq!(session.predictions_dir(), dir.join("predictions"));
        assert_eq!(session.output_dir(), dir.join("extracted_frames"));

        let session = session.with_frames_dir("/elsewhere/frames");
        assert_eq!(session.frames_dir(), Path::new("/elsewhere/frames"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_open_requires_directory() {
        let err = Session::open("AN755", "/nonexistent/ballgaze/session").unwrap_err();
        assert!(matches!(err, GazeError::FileNotFound { .. }));
    }

    #[test]
    fn test_validate_sources_reports_missing() {
        let dir = std::env::temp_dir().join("ballgaze_test_session_validate");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("predictions")).unwrap();
        std::fs::write(dir.join("AN755_events.log"), "Start\t0.0\n").unwrap();

        let session = Session::open("AN755", &dir).unwrap();
        let errors = session.validate_sources();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("Fixation export missing")));
        assert!(errors.iter().any(|e| e.contains("World frames directory missing")));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_prediction_prefix_is_unambiguous() {
        assert_eq!(Session::prediction_prefix(1), "fix1.");
        assert!(!"fix10.txt".starts_with(&Session::prediction_prefix(1)));
    }
}
