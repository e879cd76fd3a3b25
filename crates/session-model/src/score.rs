//! Per-fixation look-target scores.

use serde::{Deserialize, Serialize};

/// Score of one detected ball as the look-target of one fixation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub fixation_id: u64,
    pub ball_label: String,
    /// Euclidean distance between box center and gaze, normalized units.
    pub distance_to_gaze: f64,
    pub score: f64,
}

/// Sort entries by score, best first. NaN scores sort last.
pub fn sort_by_score_desc(entries: &mut [ScoreEntry]) {
    entries.sort_by(|a, b| match (a.score.is_nan(), b.score.is_nan()) {
        (false, false) => b.score.total_cmp(&a.score),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    });
}
