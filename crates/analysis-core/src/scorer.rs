//! Look-target scoring.
//!
//! For each fixation, every detected ball gets a score from four signals:
//!
//! 1. **Distance** between the box center and the gaze point (closer is better).
//! 2. **Duration** of the fixation (longer fixations are more trustworthy).
//! 3. **Box area**, a proxy for how near the ball is to the camera.
//! 4. **Event support**: synchronized interaction events naming the ball
//!    inside the fixation's time window.
//!
//! How the signals combine is a [`ScoringStrategy`]. [`WeightedScore`] is the
//! default; any `Fn(&ScoreInput) -> f64` can be used instead.

use serde::Serialize;

use ballgaze_common::config::ScoringConfig;
use ballgaze_session_model::ball::is_cursor;
use ballgaze_session_model::detection::Detection;
use ballgaze_session_model::engine_event::SyncedEngineEvent;
use ballgaze_session_model::fixation::Fixation;
use ballgaze_session_model::score::{sort_by_score_desc, ScoreEntry};

/// Signals available to a scoring strategy for one (fixation, ball) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInput {
    /// Normalized distance between box center and gaze.
    pub distance: f64,

    /// Fixation duration in seconds.
    pub duration_secs: f64,

    /// Normalized bounding-box area.
    pub bbox_area: f64,

    /// Interaction events naming this ball within the fixation window.
    pub event_support: usize,
}

/// Combines [`ScoreInput`] signals into one number. Higher is better.
///
/// Implementations should decrease with distance and increase with duration.
pub trait ScoringStrategy {
    fn score(&self, input: &ScoreInput) -> f64;
}

impl<F> ScoringStrategy for F
where
    F: Fn(&ScoreInput) -> f64,
{
    fn score(&self, input: &ScoreInput) -> f64 {
        self(input)
    }
}

/// Default strategy:
///
/// ```text
/// exp(-distance / distance_scale)
///   * (1 + duration_weight * ln(1 + duration_secs))
///   * (1 + size_weight * sqrt(bbox_area))
///   + event_boost * event_support
/// ```
#[derive(Debug, Clone)]
pub struct WeightedScore {
    distance_scale: f64,
    duration_weight: f64,
    size_weight: f64,
    event_boost: f64,
}

impl WeightedScore {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            distance_scale: config.distance_scale,
            duration_weight: config.duration_weight,
            size_weight: config.size_weight,
            event_boost: config.event_boost,
        }
    }
}

impl Default for WeightedScore {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl ScoringStrategy for WeightedScore {
    fn score(&self, input: &ScoreInput) -> f64 {
        let proximity = (-input.distance.max(0.0) / self.distance_scale).exp();
        let confidence = 1.0 + self.duration_weight * input.duration_secs.max(0.0).ln_1p();
        let size = 1.0 + self.size_weight * input.bbox_area.max(0.0).sqrt();
        proximity * confidence * size + self.event_boost * input.event_support as f64
    }
}

/// Scores for one fixation, best candidate first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixationScores {
    /// Fixation id from the export.
    pub fixation_id: u64,

    /// Row position in the export (the extraction id).
    pub index: usize,

    pub entries: Vec<ScoreEntry>,
}

impl FixationScores {
    /// The most plausible look-target, if anything was detected.
    pub fn top(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }
}

/// Ranks detected balls as look-targets of a fixation.
#[derive(Debug, Clone)]
pub struct FixationScorer<S = WeightedScore> {
    strategy: S,
    event_window_secs: f64,
    skip_cursor: bool,
}

impl FixationScorer<WeightedScore> {
    /// Scorer using the weighted strategy configured by `config`.
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(WeightedScore::new(config), config.event_window_secs)
            .with_skip_cursor(config.skip_cursor)
    }
}

impl<S: ScoringStrategy> FixationScorer<S> {
    pub fn new(strategy: S, event_window_secs: f64) -> Self {
        Self {
            strategy,
            event_window_secs: event_window_secs.max(0.0),
            skip_cursor: false,
        }
    }

    /// Drop `user_cursor` detections instead of scoring them.
    pub fn with_skip_cursor(mut self, skip_cursor: bool) -> Self {
        self.skip_cursor = skip_cursor;
        self
    }

    /// Count interaction events naming `ball_label` whose synced time falls
    /// within the fixation, widened by the event window on both sides.
    pub fn event_support(
        &self,
        fixation: &Fixation,
        ball_label: &str,
        events: &[SyncedEngineEvent],
    ) -> usize {
        let from = fixation.start_timestamp - self.event_window_secs;
        let to = fixation.end_timestamp() + self.event_window_secs;
        events
            .iter()
            .filter(|e| e.ball_label() == Some(ball_label))
            .filter(|e| e.synced_time >= from && e.synced_time <= to)
            .count()
    }

    /// Score every detection of one fixation. `index` is the fixation's row
    /// position in the export.
    pub fn score_fixation(
        &self,
        index: usize,
        fixation: &Fixation,
        detections: &[Detection],
        events: &[SyncedEngineEvent],
    ) -> FixationScores {
        let gaze = fixation.gaze();
        let duration_secs = fixation.duration_secs();

        let mut entries: Vec<ScoreEntry> = detections
            .iter()
            .filter(|detection| !(self.skip_cursor && is_cursor(detection.class_id)))
            .map(|detection| {
                let input = ScoreInput {
                    distance: detection.distance_to(gaze),
                    duration_secs,
                    bbox_area: detection.bbox_area,
                    event_support: self.event_support(fixation, &detection.ball_label, events),
                };
                ScoreEntry {
                    fixation_id: fixation.id,
                    ball_label: detection.ball_label.clone(),
                    distance_to_gaze: input.distance,
                    score: self.strategy.score(&input),
                }
            })
            .collect();
        sort_by_score_desc(&mut entries);

        if let Some(top) = entries.first() {
            tracing::debug!(
                "Fixation {}: top candidate {} (score {:.4}, distance {:.4}) of {}",
                fixation.id,
                top.ball_label,
                top.score,
                top.distance_to_gaze,
                entries.len()
            );
        }

        FixationScores {
            fixation_id: fixation.id,
            index,
            entries,
        }
    }
}

impl Default for FixationScorer<WeightedScore> {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}
