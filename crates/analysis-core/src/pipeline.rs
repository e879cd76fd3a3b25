//! Session analysis pipeline.
//!
//! 1. Parse the fixation export and the engine log.
//! 2. Synchronize engine events onto the eye-tracker clock.
//! 3. For each fixation row `i`, parse the prediction file `fix<i>.*`.
//! 4. Score every detection of every fixation.

use serde::Serialize;

use ballgaze_common::config::AppConfig;
use ballgaze_common::error::GazeResult;
use ballgaze_session_model::detection::Detection;
use ballgaze_session_model::engine_event::{EngineEvent, SyncedEngineEvent};
use ballgaze_session_model::fixation::Fixation;
use ballgaze_session_model::score::ScoreEntry;
use ballgaze_session_model::session::Session;

use crate::scorer::{FixationScorer, FixationScores, ScoringStrategy, WeightedScore};
use crate::sync::{ClockSync, ClockSynchronizer};

/// Everything derived for one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionAnalysis {
    pub patient_id: String,

    /// When the analysis ran (RFC 3339).
    pub generated_at: String,

    pub sync: ClockSync,

    pub synced_events: Vec<SyncedEngineEvent>,

    /// One entry per fixation, in export order.
    pub fixations: Vec<FixationScores>,
}

impl SessionAnalysis {
    /// All score rows, fixation by fixation, best first within a fixation.
    pub fn score_rows(&self) -> Vec<ScoreEntry> {
        self.fixations
            .iter()
            .flat_map(|f| f.entries.iter().cloned())
            .collect()
    }

    /// Best candidate per fixation (`None` where nothing was detected).
    pub fn top_candidates(&self) -> Vec<(u64, Option<&ScoreEntry>)> {
        self.fixations
            .iter()
            .map(|f| (f.fixation_id, f.top()))
            .collect()
    }
}

/// Runs synchronization and scoring over a session.
#[derive(Debug, Clone)]
pub struct SessionAnalyzer<S = WeightedScore> {
    synchronizer: ClockSynchronizer,
    scorer: FixationScorer<S>,
}

impl SessionAnalyzer<WeightedScore> {
    /// Analyzer with the configured frame rate and default weighted scoring.
    /// The configuration is validated first.
    pub fn from_config(config: &AppConfig) -> GazeResult<Self> {
        config.validate()?;
        Ok(Self::new(
            ClockSynchronizer::new(&config.sync)?,
            FixationScorer::from_config(&config.scoring),
        ))
    }
}

impl<S: ScoringStrategy> SessionAnalyzer<S> {
    pub fn new(synchronizer: ClockSynchronizer, scorer: FixationScorer<S>) -> Self {
        Self {
            synchronizer,
            scorer,
        }
    }

    /// Load every input of `session` and analyze it.
    pub fn analyze(&self, session: &Session) -> GazeResult<SessionAnalysis> {
        let fixations = session.load_fixations()?;
        let events = session.load_engine_log()?;
        tracing::info!(
            "Analyzing patient {}: {} fixations, {} engine events",
            session.patient_id,
            fixations.len(),
            events.len()
        );

        let detections = (0..fixations.len())
            .map(|i| session.load_predictions(&Session::prediction_prefix(i)))
            .collect::<GazeResult<Vec<_>>>()?;

        self.analyze_inputs(&session.patient_id, &fixations, &events, &detections)
    }

    /// Analyze already-parsed inputs. `detections[i]` belongs to `fixations[i]`;
    /// fixations without a detection list are scored as having none.
    pub fn analyze_inputs(
        &self,
        patient_id: &str,
        fixations: &[Fixation],
        events: &[EngineEvent],
        detections: &[Vec<Detection>],
    ) -> GazeResult<SessionAnalysis> {
        let (sync, synced_events) = self.synchronizer.synchronize(fixations, events)?;

        let scores: Vec<FixationScores> = fixations
            .iter()
            .enumerate()
            .map(|(i, fixation)| {
                let found = detections.get(i).map(Vec::as_slice).unwrap_or_default();
                self.scorer.score_fixation(i, fixation, found, &synced_events)
            })
            .collect();

        tracing::info!(
            "Scored {} fixations ({} candidates), offset {:.3}s",
            scores.len(),
            scores.iter().map(|s| s.entries.len()).sum::<usize>(),
            sync.offset.offset_secs
        );

        Ok(SessionAnalysis {
            patient_id: patient_id.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            sync,
            synced_events,
            fixations: scores,
        })
    }
}
