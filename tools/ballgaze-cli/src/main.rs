//! ballgaze CLI: fixation frame extraction and look-target analysis.
//!
//! Usage:
//!   ballgaze extract-frames <SESSION> --patient ID   Save one image per fixation
//!   ballgaze predictions <SESSION> --patient ID --fixation PREFIX
//!                                                    Show detections for a fixation
//!   ballgaze fixations <SESSION> --patient ID        Show the fixation export
//!   ballgaze sync <SESSION> --patient ID             Synchronize the engine log
//!   ballgaze score <SESSION> --patient ID            Rank look-targets per fixation
//!   ballgaze validate <SESSION> --patient ID         Check session inputs

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use ballgaze_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "ballgaze",
    about = "Gaze analysis for eye-tracked ball sorting sessions",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit structured JSON logs
    #[arg(long, global = true)]
    json_logs: bool,

    /// Configuration file (defaults to the standard location)
    #[arg(long, global = true, value_parser = commands::parse_path)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments shared by every session command.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Path to the session directory
    #[arg(value_parser = commands::parse_path)]
    session_dir: PathBuf,

    /// Patient identifier (e.g. AN755)
    #[arg(short, long)]
    patient: String,

    /// Fixation export (defaults to <SESSION_DIR>/<ID>_fixations.csv)
    #[arg(long, value_parser = commands::parse_path)]
    fixations: Option<PathBuf>,

    /// Prediction directory (defaults to <SESSION_DIR>/predictions)
    #[arg(long, value_parser = commands::parse_path)]
    predictions: Option<PathBuf>,

    /// Engine log (defaults to <SESSION_DIR>/<ID>_events.log)
    #[arg(long, value_parser = commands::parse_path)]
    events: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fixation frames from the world video
    ExtractFrames {
        #[command(flatten)]
        session: SessionArgs,

        /// Directory of decoded world-video frames
        #[arg(long, value_parser = commands::parse_path)]
        frames: Option<PathBuf>,

        /// Output directory for frames and metadata
        #[arg(short, long, value_parser = commands::parse_path)]
        output: Option<PathBuf>,

        /// Save 1, 3, or 5 frames per fixation instead of the midpoint only
        #[arg(long)]
        representative: bool,
    },

    /// Show the detections recorded for one fixation
    Predictions {
        #[command(flatten)]
        session: SessionArgs,

        /// Prediction file name prefix (e.g. "fix3.")
        #[arg(short, long)]
        fixation: String,
    },

    /// Show the parsed fixation export
    Fixations {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Synchronize the engine log onto the eye-tracker clock
    Sync {
        #[command(flatten)]
        session: SessionArgs,

        /// World video frame rate
        #[arg(long)]
        fps: Option<f64>,
    },

    /// Score detected balls as look-targets of every fixation
    Score {
        #[command(flatten)]
        session: SessionArgs,

        /// World video frame rate
        #[arg(long)]
        fps: Option<f64>,

        /// Write all scores to a .csv or .json file
        #[arg(short, long, value_parser = commands::parse_path)]
        output: Option<PathBuf>,

        /// Leave user_cursor detections out of the candidates
        #[arg(long)]
        skip_cursor: bool,
    },

    /// Check that every session input is present
    Validate {
        #[command(flatten)]
        session: SessionArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    ballgaze_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::ExtractFrames {
            session,
            frames,
            output,
            representative,
        } => commands::extract_frames::run(&session, &config, frames, output, representative),
        Commands::Predictions { session, fixation } => {
            commands::predictions::run(&session, &fixation)
        }
        Commands::Fixations { session } => commands::fixations::run(&session),
        Commands::Sync { session, fps } => {
            commands::apply_fps(&mut config, fps)?;
            commands::sync::run(&session, &config)
        }
        Commands::Score {
            session,
            fps,
            output,
            skip_cursor,
        } => {
            commands::apply_fps(&mut config, fps)?;
            if skip_cursor {
                config.scoring.skip_cursor = true;
            }
            commands::score::run(&session, &config, output)
        }
        Commands::Validate { session } => commands::validate::run(&session, &config),
    }
}
