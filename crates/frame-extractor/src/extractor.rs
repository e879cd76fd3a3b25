//! Per-fixation frame extraction.
//!
//! For every fixation range (in input order; the 0-based position becomes the
//! extraction id), the extractor seeks to the selected frame(s), decodes, and
//! saves an image named after the extraction id. A metadata table
//! (`fixation_id,frame_idx,saved_filename`) is written next to the images.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};

use ballgaze_common::config::{ExtractionConfig, SamplingMode};
use ballgaze_common::error::{GazeError, GazeResult};
use ballgaze_session_model::fixation::FrameRange;
use ballgaze_session_model::session::{Session, FRAMES_METADATA_FILE};
use ballgaze_session_model::table::{column_indices, csv_reader, parse_frame_index};

use crate::selector::select_frames;
use crate::source::{FrameSource, ImageSequenceSource};

/// Header of the metadata table.
const METADATA_HEADER: [&str; 3] = ["fixation_id", "frame_idx", "saved_filename"];

/// One saved frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub fixation_id: usize,
    pub frame_idx: u64,
    pub saved_filename: String,
}

/// Outcome of a batch extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Frames saved, in the order they were written.
    pub records: Vec<FrameRecord>,

    /// `(fixation_id, frame_idx)` pairs that could not be extracted.
    pub skipped: Vec<(usize, u64)>,

    /// Where the metadata table was written.
    pub metadata_path: PathBuf,
}

/// Load fixation frame ranges from a `.csv` (columns `start_frame_index`,
/// `end_frame_index`) or `.json` (list of `{start, end}`) file.
pub fn load_frame_ranges(path: impl AsRef<Path>) -> GazeResult<Vec<FrameRange>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let ranges = match extension.as_deref() {
        Some("csv") => {
            let mut reader = csv_reader(BufReader::new(File::open(path)?));
            let headers = reader.headers()?.clone();
            let [start, end] =
                column_indices(&headers, ["start_frame_index", "end_frame_index"], path)?;

            let mut ranges = Vec::new();
            for (i, record) in reader.records().enumerate() {
                let record = record?;
                let row = i + 1;
                ranges.push(FrameRange::new(
                    parse_frame_index(&record, start, "start_frame_index", row)?,
                    parse_frame_index(&record, end, "end_frame_index", row)?,
                )?);
            }
            ranges
        }
        Some("json") => {
            let ranges: Vec<FrameRange> = serde_json::from_reader(BufReader::new(File::open(path)?))?;
            for range in &ranges {
                FrameRange::new(range.start, range.end)?;
            }
            ranges
        }
        _ => {
            return Err(GazeError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    tracing::debug!("Loaded {} fixation ranges from {}", ranges.len(), path.display());
    Ok(ranges)
}

/// Extracts representative frames for a list of fixations.
///
/// The frame source is released on [`FixationFrameExtractor::release`] and
/// again (as a no-op if already released) when the extractor is dropped, so
/// an early return or panic never leaks it.
pub struct FixationFrameExtractor {
    source: Option<Box<dyn FrameSource>>,
    fixations: Vec<FrameRange>,
    sampling: SamplingMode,
    format: ImageFormat,
    extension: String,
}

impl FixationFrameExtractor {
    /// Create an extractor. Fails if the configured image format is unknown.
    pub fn new(config: &ExtractionConfig) -> GazeResult<Self> {
        let extension = config.image_format.trim_start_matches('.').to_ascii_lowercase();
        let format = ImageFormat::from_extension(&extension).ok_or_else(|| {
            GazeError::config(format!("unsupported image format '{}'", config.image_format))
        })?;

        Ok(Self {
            source: None,
            fixations: Vec::new(),
            sampling: config.sampling,
            format,
            extension,
        })
    }

    /// Open a directory of decoded frames as the video source.
    pub fn load(&mut self, frames_dir: impl AsRef<Path>) -> GazeResult<()> {
        let source = ImageSequenceSource::open(frames_dir)?;
        self.set_source(Box::new(source));
        Ok(())
    }

    /// Use an already-open frame source, releasing any previous one.
    pub fn set_source(&mut self, source: Box<dyn FrameSource>) {
        self.release();
        self.source = Some(source);
    }

    /// Load fixation ranges from a `.csv` or `.json` file.
    pub fn load_fixations(&mut self, path: impl AsRef<Path>) -> GazeResult<usize> {
        self.fixations = load_frame_ranges(path)?;
        Ok(self.fixations.len())
    }

    pub fn set_fixations(&mut self, fixations: Vec<FrameRange>) {
        self.fixations = fixations;
    }

    pub fn fixations(&self) -> &[FrameRange] {
        &self.fixations
    }

    /// Frames to pull for one fixation under the configured sampling mode.
    pub fn frames_for(&self, range: &FrameRange) -> Vec<u64> {
        match self.sampling {
            SamplingMode::Midpoint => vec![range.midpoint()],
            SamplingMode::Representative => select_frames(range),
        }
    }

    /// Extract frames for every fixation into `output_dir`.
    ///
    /// Unreadable frames are logged and skipped. Errors opening the output
    /// directory or the metadata table abort the batch.
    pub fn extract_and_save(&mut self, output_dir: impl AsRef<Path>) -> GazeResult<ExtractionReport> {
        let output_dir = output_dir.as_ref();
        let frame_count = match self.source.as_deref() {
            Some(source) if source.is_open() => source.frame_count(),
            _ => return Err(GazeError::video_open(output_dir, "no open frame source")),
        };
        tracing::info!(
            "Extracting {} fixations from a {}-frame source",
            self.fixations.len(),
            frame_count
        );
        std::fs::create_dir_all(output_dir)?;

        let metadata_path = output_dir.join(FRAMES_METADATA_FILE);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&metadata_path)?;
        writer.write_record(METADATA_HEADER)?;

        let plan: Vec<(usize, Vec<u64>)> = self
            .fixations
            .iter()
            .enumerate()
            .map(|(idx, range)| (idx, self.frames_for(range)))
            .collect();

        let source = self.source.as_mut().ok_or_else(|| {
            GazeError::video_open(output_dir, "no frame source loaded")
        })?;

        let mut report = ExtractionReport {
            metadata_path: metadata_path.clone(),
            ..Default::default()
        };

        for (fixation_id, frames) in plan {
            let single = frames.len() == 1;
            for frame_idx in frames {
                let filename = if single {
                    format!("fix{fixation_id}.{}", self.extension)
                } else {
                    format!("fix{fixation_id}_f{frame_idx}.{}", self.extension)
                };

                let saved = source
                    .read_frame(frame_idx)
                    .and_then(|frame| save_frame(&frame, &output_dir.join(&filename), self.format));

                match saved {
                    Ok(()) => {
                        let record = FrameRecord {
                            fixation_id,
                            frame_idx,
                            saved_filename: filename,
                        };
                        writer.serialize(&record)?;
                        report.records.push(record);
                    }
                    Err(e) if e.is_per_frame() => {
                        tracing::warn!(
                            "Could not extract frame {} for fixation {}: {}",
                            frame_idx,
                            fixation_id,
                            e
                        );
                        report.skipped.push((fixation_id, frame_idx));
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        writer.flush()?;
        tracing::info!(
            "Saved {} frames ({} skipped) to {}",
            report.records.len(),
            report.skipped.len(),
            output_dir.display()
        );
        Ok(report)
    }

    /// Release the frame source. Safe to call repeatedly or before loading.
    pub fn release(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
        }
    }
}

impl Drop for FixationFrameExtractor {
    fn drop(&mut self) {
        self.release();
    }
}

/// Extract frames for a whole session: frames from the session's frame
/// directory, ranges from its fixation export, output to its output directory.
pub fn extract_session(session: &Session, config: &ExtractionConfig) -> GazeResult<ExtractionReport> {
    let mut extractor = FixationFrameExtractor::new(config)?;
    extractor.load(session.frames_dir())?;
    let count = extractor.load_fixations(session.fixations_path())?;
    tracing::info!(
        "Extracting frames for {} fixations of patient {}",
        count,
        session.patient_id
    );
    let report = extractor.extract_and_save(session.output_dir());
    extractor.release();
    report
}

fn save_frame(frame: &DynamicImage, path: &Path, format: ImageFormat) -> GazeResult<()> {
    DynamicImage::ImageRgb8(frame.to_rgb8())
        .save_with_format(path, format)
        .map_err(|e| GazeError::ImageWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
