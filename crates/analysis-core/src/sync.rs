//! Engine-log to eye-tracker clock synchronization.
//!
//! The engine log and the eye-tracker export run on independent clocks. One
//! reference pair ties them together: the first engine `Start` event, and
//! the eye-tracker time at world-video frame 0, back-projected from the first
//! fixation:
//!
//! ```text
//! video_start_time  = first.start_timestamp - first.start_frame_index / fps
//! synced_start_time = video_start_time + engine_start_time
//! offset            = synced_start_time - engine_start_time   (= video_start_time)
//! synced_time       = raw_time + offset
//! ```
//!
//! The engine clock is assumed to share its origin with video frame 0, so
//! `engine_start_time` cancels out of the offset.

use serde::{Deserialize, Serialize};

use ballgaze_common::clock::{ClockOffset, VideoTimebase};
use ballgaze_common::config::SyncConfig;
use ballgaze_common::error::{GazeError, GazeResult};
use ballgaze_session_model::engine_event::{EngineEvent, SyncedEngineEvent};
use ballgaze_session_model::fixation::Fixation;

/// Result of synchronizing one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockSync {
    /// Frame rate used for back-projection.
    pub fps: f64,

    /// Raw time of the first engine `Start` event.
    pub engine_start_time: f64,

    /// Eye-tracker time at world-video frame 0.
    pub video_start_time: f64,

    /// Eye-tracker time of the engine `Start` event.
    pub synced_start_time: f64,

    /// Offset added to every engine timestamp.
    pub offset: ClockOffset,
}

impl ClockSync {
    /// Carry every event onto the eye-tracker clock. Order is preserved.
    pub fn apply(&self, events: &[EngineEvent]) -> Vec<SyncedEngineEvent> {
        events.iter().map(|e| e.synced(self.offset)).collect()
    }
}

/// Computes the engine -> eye-tracker offset for a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockSynchronizer {
    timebase: VideoTimebase,
}

impl ClockSynchronizer {
    pub fn new(config: &SyncConfig) -> GazeResult<Self> {
        Ok(Self {
            timebase: VideoTimebase::new(config.fps)?,
        })
    }

    /// Compute the offset from the first `Start` event and the first fixation.
    pub fn compute(&self, fixations: &[Fixation], events: &[EngineEvent]) -> GazeResult<ClockSync> {
        let engine_start_time = events
            .iter()
            .find(|e| e.is_start())
            .map(|e| e.raw_time)
            .ok_or(GazeError::NoStartEvent)?;

        let first = fixations.first().ok_or(GazeError::EmptyFixationTable)?;
        let video_start_time =
            first.start_timestamp - self.timebase.frame_to_secs(first.start_frame_index);
        let synced_start_time = video_start_time + engine_start_time;
        let offset = ClockOffset::new(video_start_time);

        tracing::debug!(
            "Clock sync: engine start {:.3}s, video start {:.3}s, offset {:.3}s",
            engine_start_time,
            video_start_time,
            offset.offset_secs
        );

        Ok(ClockSync {
            fps: self.timebase.fps(),
            engine_start_time,
            video_start_time,
            synced_start_time,
            offset,
        })
    }

    /// Compute the offset and apply it to every event.
    pub fn synchronize(
        &self,
        fixations: &[Fixation],
        events: &[EngineEvent],
    ) -> GazeResult<(ClockSync, Vec<SyncedEngineEvent>)> {
        let sync = self.compute(fixations, events)?;
        let synced = sync.apply(events);
        Ok((sync, synced))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixation(start_timestamp: f64, start_frame_index: u64) -> Fixation {
        Fixation {
            id: 0,
            start_timestamp,
            start_frame_index,
            end_frame_index: start_frame_index + 5,
            norm_pos_x: 0.5,
            norm_pos_y: 0.5,
            duration: 150.0,
        }
    }

    #[test]
    fn test_reference_scenario() {
        let sync = ClockSynchronizer::default();
        let events = vec![
            EngineEvent::start(2.0),
            EngineEvent::interaction("Touch", "ball_01_pink", 3.5),
        ];
        let (result, synced) = sync.synchronize(&[fixation(5.0, 30)], &events).unwrap();

        assert!((result.video_start_time - 4.0).abs() < 1e-12);
        assert!((result.offset.offset_secs - 4.0).abs() < 1e-12);
        assert!((result.offset.offset_secs - result.video_start_time).abs() < 1e-12);
        assert!((result.synced_start_time - 6.0).abs() < 1e-12);

        assert!((synced[0].synced_time - result.synced_start_time).abs() < 1e-12);
        assert!((synced[1].synced_time - 7.5).abs() < 1e-12);
        assert_eq!(synced[1].ball_label(), Some("ball_01_pink"));
    }

    #[test]
    fn test_uses_first_start_event() {
        let sync = ClockSynchronizer::default();
        let events = vec![
            EngineEvent::interaction("Touch", "ball_01_pink", 0.5),
            EngineEvent::start(1.0),
            EngineEvent::start(9.0),
        ];
        let result = sync.compute(&[fixation(5.0, 30)], &events).unwrap();
        assert!((result.engine_start_time - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fps_is_configurable() {
        let sync = ClockSynchronizer::new(&SyncConfig { fps: 60.0 }).unwrap();
        let result = sync
            .compute(&[fixation(5.0, 30)], &[EngineEvent::start(0.0)])
            .unwrap();
        assert!((result.video_start_time - 4.5).abs() < 1e-12);
        assert!(ClockSynchronizer::new(&SyncConfig { fps: 0.0 }).is_err());
    }

    #[test]
    fn test_failures() {
        let sync = ClockSynchronizer::default();
        let err = sync
            .compute(&[fixation(5.0, 30)], &[EngineEvent::end(3.0)])
            .unwrap_err();
        assert!(matches!(err, GazeError::NoStartEvent));

        let err = sync.compute(&[], &[EngineEvent::start(0.0)]).unwrap_err();
        assert!(matches!(err, GazeError::EmptyFixationTable));
    }
}
