//! ballgaze analysis core
//!
//! Correlates the three session streams and ranks look-targets:
//! - **Sync:** one additive offset carrying engine-log time onto the eye-tracker clock
//! - **Scorer:** per-fixation ball scores from gaze distance, duration, box size,
//!   and synchronized interaction events, with a pluggable weighting strategy
//! - **Pipeline:** loads a session, runs both, and returns the score table
//!
//! Sync and scoring are pure computation over already-parsed inputs; only the
//! pipeline touches the filesystem.

pub mod pipeline;
pub mod scorer;
pub mod sync;

pub use pipeline::{SessionAnalysis, SessionAnalyzer};
pub use scorer::{FixationScorer, FixationScores, ScoreInput, ScoringStrategy, WeightedScore};
pub use sync::{ClockSync, ClockSynchronizer};
