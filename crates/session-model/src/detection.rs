//! Object-detector output for a fixation frame.
//!
//! Each fixation frame has one plain-text prediction file, one detection per
//! line: `<class_id> <x_center> <y_center> <width> <height>`, all box values
//! normalized to the frame. Files are located by fixation-id prefix.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ballgaze_common::error::{GazeError, GazeResult};

use crate::ball::ball_label;

/// A ball detected in a fixation frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Label from the fixed class table (e.g. "ball_07_yellow").
    pub ball_label: String,

    /// Detector class id.
    pub class_id: u32,

    /// Normalized box center `(x, y)`.
    pub center: (f64, f64),

    /// Normalized box width.
    pub width: f64,

    /// Normalized box height.
    pub height: f64,

    /// `width * height`. Used as a proxy for distance from the camera:
    /// smaller boxes are farther away.
    pub bbox_area: f64,
}

impl Detection {
    /// Euclidean distance between the box center and a normalized point.
    pub fn distance_to(&self, point: (f64, f64)) -> f64 {
        let dx = self.center.0 - point.0;
        let dy = self.center.1 - point.1;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Locate the prediction file whose name starts with `prefix` in `dir`.
///
/// Directory entries are visited in name order and the first match wins;
/// callers choose prefixes that cannot collide (e.g. `fix1.` rather than
/// `fix1`, which would also match `fix10.txt`).
pub fn find_prediction_file(dir: &Path, prefix: &str) -> GazeResult<PathBuf> {
    if !dir.is_dir() {
        return Err(GazeError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name());
        }
    }
    names.sort();

    names
        .into_iter()
        .find(|name| name.to_string_lossy().starts_with(prefix))
        .map(|name| dir.join(name))
        .ok_or_else(|| GazeError::PredictionFileNotFound {
            prefix: prefix.to_string(),
            dir: dir.to_path_buf(),
        })
}

/// Find and parse the prediction file for `prefix`.
pub fn load_predictions(dir: &Path, prefix: &str) -> GazeResult<Vec<Detection>> {
    let path = find_prediction_file(dir, prefix)?;
    let content = std::fs::read_to_string(&path)?;
    let detections = parse_detections(&content, &path)?;
    tracing::debug!(
        "Parsed {} detections from {}",
        detections.len(),
        path.display()
    );
    Ok(detections)
}

/// Parse prediction file content. Blank lines are ignored; any other line
/// that is not exactly five numeric fields fails the whole file.
pub fn parse_detections(content: &str, source: &Path) -> GazeResult<Vec<Detection>> {
    let mut detections = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let malformed = || GazeError::MalformedDetectionLine {
            path: source.to_path_buf(),
            line_no: i + 1,
            line: line.to_string(),
        };

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        let [class_id, x, y, w, h] = parts[..] else {
            return Err(malformed());
        };

        let class_id: i64 = class_id.parse().map_err(|_| malformed())?;
        let label = ball_label(class_id)?;
        let parse = |s: &str| match s.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(malformed()),
        };
        let (x, y, width, height) = (parse(x)?, parse(y)?, parse(w)?, parse(h)?);

        detections.push(Detection {
            ball_label: label.to_string(),
            class_id: class_id as u32,
            center: (x, y),
            width,
            height,
            bbox_area: width * height,
        });
    }

    Ok(detections)
}
