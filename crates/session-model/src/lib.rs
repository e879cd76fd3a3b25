//! ballgaze session model
//!
//! Defines the data contracts for one recorded session and the parsers that
//! read them from disk:
//! - **Balls:** the fixed detector class-id to ball-label table
//! - **Fixations:** the Pupil Labs fixation export, narrowed to what analysis needs
//! - **Detections:** per-fixation object-detector output (normalized boxes)
//! - **Engine events:** the Unity game log, before and after clock synchronization
//! - **Session:** the on-disk layout tying the inputs together
//!
//! All positions are normalized to `[0.0, 1.0]` relative to the world video frame.

pub mod ball;
pub mod detection;
pub mod engine_event;
pub mod fixation;
pub mod score;
pub mod session;
pub mod table;

pub use ball::*;
pub use detection::*;
pub use engine_event::*;
pub use fixation::*;
pub use score::*;
pub use session::*;
