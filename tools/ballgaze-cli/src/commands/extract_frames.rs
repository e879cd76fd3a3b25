//! Extract fixation frames from a session's world video.

use std::path::PathBuf;

use ballgaze_common::config::{AppConfig, SamplingMode};
use ballgaze_frame_extractor::extract_session;

use crate::SessionArgs;

pub fn run(
    args: &SessionArgs,
    config: &AppConfig,
    frames: Option<PathBuf>,
    output: Option<PathBuf>,
    representative: bool,
) -> anyhow::Result<()> {
    let mut session = super::open_session(args)?;
    if let Some(frames) = frames {
        session = session.with_frames_dir(frames);
    }
    if let Some(output) = output {
        session = session.with_output_dir(output);
    }

    let mut extraction = config.extraction.clone();
    if representative {
        extraction.sampling = SamplingMode::Representative;
    }

    println!("Extracting frames for patient {}", session.patient_id);
    println!("  Frames: {}", session.frames_dir().display());
    println!("  Fixations: {}", session.fixations_path().display());

    let report = extract_session(&session, &extraction)
        .map_err(|e| anyhow::anyhow!("Frame extraction failed: {e}"))?;

    println!("  Saved {} frames to {}", report.records.len(), session.output_dir().display());
    if !report.skipped.is_empty() {
        println!("  Skipped {} unreadable frames:", report.skipped.len());
        for (fixation_id, frame_idx) in &report.skipped {
            println!("    - fixation {fixation_id}, frame {frame_idx}");
        }
    }
    println!("  Metadata: {}", report.metadata_path.display());

    Ok(())
}
