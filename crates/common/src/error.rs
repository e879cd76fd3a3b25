//! Error types shared across ballgaze crates.

use std::path::PathBuf;

/// Top-level error type for ballgaze operations.
///
/// Parsing and lookup failures are fatal to the operation that hit them.
/// Only per-fixation frame reads during batch extraction are tolerated
/// (logged and skipped by the extractor).
#[derive(Debug, thiserror::Error)]
pub enum GazeError {
    #[error("Could not open video source {path}: {message}")]
    VideoOpen { path: PathBuf, message: String },

    #[error("Unsupported fixation file format: {path} (expected .csv or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("No prediction file found for fixation '{prefix}' in {dir}")]
    PredictionFileNotFound { prefix: String, dir: PathBuf },

    #[error("Unknown detector class id {class_id}")]
    UnknownClass { class_id: i64 },

    #[error("Missing column '{column}' in {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("Malformed engine log line {line_no}: {line:?}")]
    MalformedLogLine { line_no: usize, line: String },

    #[error("Engine log contains no Start event")]
    NoStartEvent,

    #[error("Fixation table is empty")]
    EmptyFixationTable,

    #[error("Malformed detection line {line_no} in {path}: {line:?}")]
    MalformedDetectionLine {
        path: PathBuf,
        line_no: usize,
        line: String,
    },

    #[error("Invalid value {value:?} for column '{column}' at row {row}")]
    InvalidField {
        column: String,
        value: String,
        row: usize,
    },

    #[error("Invalid frame range: start {start} is after end {end}")]
    InvalidFrameRange { start: u64, end: u64 },

    #[error("Could not read frame {frame_idx}: {message}")]
    FrameRead { frame_idx: u64, message: String },

    #[error("Could not write image {path}: {message}")]
    ImageWrite { path: PathBuf, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using GazeError.
pub type GazeResult<T> = Result<T, GazeError>;

impl GazeError {
    pub fn video_open(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::VideoOpen {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn missing_column(column: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            path: path.into(),
        }
    }

    pub fn invalid_field(column: impl Into<String>, value: impl Into<String>, row: usize) -> Self {
        Self::InvalidField {
            column: column.into(),
            value: value.into(),
            row,
        }
    }

    pub fn frame_read(frame_idx: u64, msg: impl Into<String>) -> Self {
        Self::FrameRead {
            frame_idx,
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error only affects a single frame and may be skipped
    /// during batch extraction.
    pub fn is_per_frame(&self) -> bool {
        matches!(self, Self::FrameRead { .. } | Self::ImageWrite { .. })
    }
}
