//! Check that a session's inputs are present and parse.

use ballgaze_common::config::AppConfig;
use ballgaze_frame_extractor::{FrameSource, ImageSequenceSource};
use ballgaze_session_model::fixation::Fixation;

use crate::SessionArgs;

pub fn run(args: &SessionArgs, config: &AppConfig) -> anyhow::Result<()> {
    println!("Validating session at: {}", args.session_dir.display());
    let session = super::open_session(args)?;

    let errors = session.validate_sources();
    if !errors.is_empty() {
        println!("\nValidation issues:");
        for error in &errors {
            println!("  - {error}");
        }
        println!(
            "\n{} issue(s) found. Session may not be fully usable.",
            errors.len()
        );
        return Ok(());
    }
    println!("  Sources: All present");

    let fixations = session.load_fixations()?;
    println!("  Fixations: {}", fixations.len());
    let events = session.load_engine_log()?;
    println!("  Engine events: {}", events.len());

    config.validate()?;
    println!("  Config: valid ({}fps)", config.sync.fps);

    let mut source = ImageSequenceSource::open(session.frames_dir())?;
    let frame_count = source.frame_count();
    source.release();
    let beyond = fixations_beyond(&fixations, frame_count);
    if beyond.is_empty() {
        println!("  World frames: {frame_count}, all fixations in range");
    } else {
        println!("  World frames: {frame_count}, fixation rows past the end: {beyond:?}");
    }

    let mut missing = 0;
    for index in 0..fixations.len() {
        let prefix = ballgaze_session_model::Session::prediction_prefix(index);
        if let Err(e) = session.load_predictions(&prefix) {
            println!("  - {e}");
            missing += 1;
        }
    }
    if missing == 0 && beyond.is_empty() {
        println!("  Predictions: one per fixation");
        println!("\nSession is valid.");
    } else {
        println!(
            "\n{missing} fixation(s) without usable predictions, {} past the last frame.",
            beyond.len()
        );
    }

    Ok(())
}

/// Rows of fixations whose frame range ends at or past `frame_count`.
fn fixations_beyond(fixations: &[Fixation], frame_count: u64) -> Vec<usize> {
    fixations
        .iter()
        .enumerate()
        .filter(|(_, f)| f.frame_range().end >= frame_count)
        .map(|(row, _)| row)
        .collect()
}
