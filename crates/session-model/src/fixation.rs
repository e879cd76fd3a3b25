//! Pupil Labs fixation export.
//!
//! The export carries many more columns than analysis needs; parsing
//! projects each row onto the seven fields of [`Fixation`]. Rows are never
//! filtered or reordered.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use ballgaze_common::error::{GazeError, GazeResult};

use crate::table::{column_indices, csv_reader, parse_cell, parse_frame_index};

/// Columns projected out of the fixation export, in [`Fixation`] field order.
pub const FIXATION_COLUMNS: [&str; 7] = [
    "id",
    "start_timestamp",
    "start_frame_index",
    "end_frame_index",
    "norm_pos_x",
    "norm_pos_y",
    "duration",
];

/// One fixation from the eye-tracker export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixation {
    /// Fixation id assigned by Pupil Player.
    pub id: u64,

    /// Start of the fixation on the eye-tracker clock (seconds).
    pub start_timestamp: f64,

    /// First world-video frame covered by the fixation.
    pub start_frame_index: u64,

    /// Last world-video frame covered by the fixation (inclusive).
    pub end_frame_index: u64,

    /// Normalized gaze X [0.0, 1.0].
    pub norm_pos_x: f64,

    /// Normalized gaze Y [0.0, 1.0].
    pub norm_pos_y: f64,

    /// Duration in milliseconds, as exported.
    pub duration: f64,
}

/// An inclusive `[start, end]` world-video frame range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    #[serde(alias = "start_frame_index")]
    pub start: u64,
    #[serde(alias = "end_frame_index")]
    pub end: u64,
}

impl FrameRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: u64, end: u64) -> GazeResult<Self> {
        if start > end {
            return Err(GazeError::InvalidFrameRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Frame in the middle of the range (rounded down).
    pub fn midpoint(&self) -> u64 {
        self.start + (self.end - self.start) / 2
    }

    /// Number of frames between start and end (`end - start`).
    pub fn span(&self) -> u64 {
        self.end - self.start
    }
}

impl Fixation {
    /// Gaze position as `(x, y)`.
    pub fn gaze(&self) -> (f64, f64) {
        (self.norm_pos_x, self.norm_pos_y)
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration / 1000.0
    }

    /// End of the fixation on the eye-tracker clock.
    pub fn end_timestamp(&self) -> f64 {
        self.start_timestamp + self.duration_secs()
    }

    pub fn frame_range(&self) -> FrameRange {
        FrameRange {
            start: self.start_frame_index,
            end: self.end_frame_index,
        }
    }
}

/// Load the fixation export at `path`.
pub fn load_fixations(path: impl AsRef<Path>) -> GazeResult<Vec<Fixation>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(GazeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path)?;
    parse_fixations(BufReader::new(file), path)
}

/// Parse a fixation export. `source` is only used in error messages.
pub fn parse_fixations<R: Read>(reader: R, source: &Path) -> GazeResult<Vec<Fixation>> {
    let mut reader = csv_reader(reader);
    let headers = reader.headers()?.clone();
    let [id, start_ts, start_frame, end_frame, x, y, duration] =
        column_indices(&headers, FIXATION_COLUMNS, source)?;

    let mut fixations: Vec<Fixation> = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let fixation = Fixation {
            id: parse_cell(&record, id, "id", row)?,
            start_timestamp: parse_cell(&record, start_ts, "start_timestamp", row)?,
            start_frame_index: parse_frame_index(&record, start_frame, "start_frame_index", row)?,
            end_frame_index: parse_frame_index(&record, end_frame, "end_frame_index", row)?,
            norm_pos_x: parse_cell(&record, x, "norm_pos_x", row)?,
            norm_pos_y: parse_cell(&record, y, "norm_pos_y", row)?,
            duration: parse_cell(&record, duration, "duration", row)?,
        };
        FrameRange::new(fixation.start_frame_index, fixation.end_frame_index)?;

        if let Some(prev) = fixations.last() {
            if fixation.start_timestamp < prev.start_timestamp {
                tracing::warn!(
                    "Fixation {} starts before fixation {} ({} < {})",
                    fixation.id,
                    prev.id,
                    fixation.start_timestamp,
                    prev.start_timestamp
                );
            }
        }
        fixations.push(fixation);
    }

    tracing::debug!("Parsed {} fixations from {}", fixations.len(), source.display());
    Ok(fixations)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
id,start_timestamp,duration,start_frame_index,end_frame_index,norm_pos_x,norm_pos_y,dispersion,confidence
0,5.0,120.5,30,33,0.41,0.52,1.2,0.98
1,5.4,310.0,42,51,0.60,0.35,0.8,0.95
";

    #[test]
    fn test_projects_required_columns() {
        let fixations = parse_fixations(EXPORT.as_bytes(), Path::new("AN755_fixations.csv")).unwrap();
        assert_eq!(fixations.len(), 2);

        let first = &fixations[0];
        assert_eq!(first.id, 0);
        assert!((first.start_timestamp - 5.0).abs() < 1e-12);
        assert_eq!(first.start_frame_index, 30);
        assert_eq!(first.end_frame_index, 33);
        assert_eq!(first.gaze(), (0.41, 0.52));
        assert!((first.duration_secs() - 0.1205).abs() < 1e-12);
        assert_eq!(fixations[1].frame_range().midpoint(), 46);
    }

    #[test]
    fn test_missing_column_is_error() {
        let export = "id,start_timestamp,start_frame_index,end_frame_index,norm_pos_x,duration\n";
        let err = parse_fixations(export.as_bytes(), Path::new("f.csv")).unwrap_err();
        assert!(matches!(err, GazeError::MissingColumn { ref column, .. } if column == "norm_pos_y"));
    }

    #[test]
    fn test_bad_cell_reports_row() {
        let export = "\
id,start_timestamp,start_frame_index,end_frame_index,norm_pos_x,norm_pos_y,duration
0,5.0,30,33,0.4,0.5,100
1,oops,42,51,0.6,0.3,300
";
        let err = parse_fixations(export.as_bytes(), Path::new("f.csv")).unwrap_err();
        assert!(matches!(
            err,
            GazeError::InvalidField { ref column, row: 2, .. } if column == "start_timestamp"
        ));
    }

    #[test]
    fn test_inverted_frame_range_rejected() {
        let export = "\
id,start_timestamp,start_frame_index,end_frame_index,norm_pos_x,norm_pos_y,duration
0,5.0,40,33,0.4,0.5,100
";
        let err = parse_fixations(export.as_bytes(), Path::new("f.csv")).unwrap_err();
        assert!(matches!(err, GazeError::InvalidFrameRange { start: 40, end: 33 }));
    }

    #[test]
    fn test_parsing_twice_is_identical() {
        let dir = std::env::temp_dir().join("ballgaze_test_fixations_idempotent");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("AN755_fixations.csv");
        std::fs::write(&path, EXPORT).unwrap();

        let first = load_fixations(&path).unwrap();
        let second = load_fixations(&path).unwrap();
        assert_eq!(first, second);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file() {
        let err = load_fixations("/nonexistent/ballgaze/fixations.csv").unwrap_err();
        assert!(matches!(err, GazeError::FileNotFound { .. }));
    }
}
