//! ballgaze common utilities
//!
//! Shared infrastructure for all ballgaze crates:
//! - Error types and result aliases
//! - Timebase utilities for aligning the eye-tracker, video, and engine clocks
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
