//! Timebase utilities for stream synchronization.
//!
//! Three clocks are in play for every session:
//! - the eye-tracker clock (fixation `start_timestamp`, seconds)
//! - the world video, indexed by frame number at a fixed frame rate
//! - the game engine log clock (seconds since its own origin)
//!
//! Everything downstream is expressed on the eye-tracker clock. This module
//! provides the frame/seconds conversions and the additive offset used to
//! carry engine timestamps across.

use serde::{Deserialize, Serialize};

use crate::error::{GazeError, GazeResult};

/// Pupil Labs world camera default frame rate.
pub const DEFAULT_FPS: f64 = 30.0;

/// Fixed-rate video timebase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoTimebase {
    fps: f64,
}

impl VideoTimebase {
    /// Create a timebase for the given frame rate. Rejects non-positive or
    /// non-finite rates.
    pub fn new(fps: f64) -> GazeResult<Self> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(GazeError::config(format!(
                "frame rate must be positive, got {fps}"
            )));
        }
        Ok(Self { fps })
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Seconds elapsed between frame 0 and `frame`.
    pub fn frame_to_secs(&self, frame: u64) -> f64 {
        frame as f64 / self.fps
    }
}

impl Default for VideoTimebase {
    fn default() -> Self {
        Self { fps: DEFAULT_FPS }
    }
}

/// Additive offset carrying engine-log time onto the eye-tracker clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockOffset {
    /// Seconds added to an engine timestamp.
    pub offset_secs: f64,
}

impl ClockOffset {
    pub fn new(offset_secs: f64) -> Self {
        Self { offset_secs }
    }

    /// Engine time -> eye-tracker time.
    pub fn apply(&self, engine_secs: f64) -> f64 {
        engine_secs + self.offset_secs
    }
}
