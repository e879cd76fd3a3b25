//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::clock::DEFAULT_FPS;
use crate::error::{GazeError, GazeResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Clock synchronization settings.
    pub sync: SyncConfig,

    /// Weights for the default fixation scoring strategy.
    pub scoring: ScoringConfig,

    /// Frame extraction settings.
    pub extraction: ExtractionConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Clock synchronization parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Frame rate of the world video, used to back-project frame indices
    /// onto the eye-tracker clock.
    pub fps: f64,
}

/// Parameters of the default weighted scoring strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Normalized distance at which the proximity term decays to 1/e.
    pub distance_scale: f64,

    /// Weight of the log-duration confidence term.
    pub duration_weight: f64,

    /// Weight of the bounding-box size term (sqrt of normalized area).
    pub size_weight: f64,

    /// Additive boost per synchronized interaction event naming the ball.
    pub event_boost: f64,

    /// Slack (seconds) around the fixation window when matching events.
    pub event_window_secs: f64,

    /// Leave `user_cursor` detections out of the candidates.
    pub skip_cursor: bool,
}

/// How many frames to pull per fixation during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// One frame at the fixation midpoint.
    #[default]
    Midpoint,
    /// One, three, or five frames depending on fixation length.
    Representative,
}

/// Frame extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Sampling policy.
    pub sampling: SamplingMode,

    /// File extension of saved frames; selects the encoder.
    pub image_format: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "ballgaze=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { fps: DEFAULT_FPS }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            distance_scale: 0.1,
            duration_weight: 0.5,
            size_weight: 1.0,
            event_boost: 1.0,
            event_window_secs: 0.5,
            skip_cursor: false,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            sampling: SamplingMode::Midpoint,
            image_format: "png".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Unlike [`AppConfig::load`], errors
    /// are returned rather than replaced with defaults.
    pub fn load_from(path: impl AsRef<Path>) -> GazeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GazeError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make synchronization or scoring meaningless.
    pub fn validate(&self) -> GazeResult<()> {
        if !(self.sync.fps.is_finite() && self.sync.fps > 0.0) {
            return Err(GazeError::config(format!(
                "sync.fps must be positive, got {}",
                self.sync.fps
            )));
        }
        if !(self.scoring.distance_scale.is_finite() && self.scoring.distance_scale > 0.0) {
            return Err(GazeError::config(format!(
                "scoring.distance_scale must be positive, got {}",
                self.scoring.distance_scale
            )));
        }
        // Negative weights would let a nearer or longer-fixated ball score lower.
        for (name, value) in [
            ("scoring.duration_weight", self.scoring.duration_weight),
            ("scoring.size_weight", self.scoring.size_weight),
            ("scoring.event_boost", self.scoring.event_boost),
            ("scoring.event_window_secs", self.scoring.event_window_secs),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GazeError::config(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("ballgaze").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!((config.sync.fps - 30.0).abs() < 1e-9);
        assert_eq!(config.extraction.sampling, SamplingMode::Midpoint);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = std::env::temp_dir().join("ballgaze_test_config_partial");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let path = dir.join("config.json");
        std::fs::write(&path, r#"{"sync":{"fps":60.0},"extraction":{"sampling":"representative"}}"#)
            .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert!((config.sync.fps - 60.0).abs() < 1e-9);
        assert_eq!(config.extraction.sampling, SamplingMode::Representative);
        assert!((config.scoring.distance_scale - 0.1).abs() < 1e-9);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_rejects_non_positive_fps() {
        let mut config = AppConfig::default();
        config.sync.fps = 0.0;
        assert!(matches!(config.validate(), Err(GazeError::Config { .. })));
    }

    #[test]
    fn test_rejects_negative_scoring_weights() {
        let mut config = AppConfig::default();
        config.scoring.size_weight = -4.0;
        assert!(matches!(config.validate(), Err(GazeError::Config { ref message }) if message.contains("size_weight")));

        let mut config = AppConfig::default();
        config.scoring.event_boost = -1.0;
        assert!(matches!(config.validate(), Err(GazeError::Config { ref message }) if message.contains("event_boost")));

        let mut config = AppConfig::default();
        config.scoring.duration_weight = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scoring.size_weight = 0.0;
        config.scoring.event_boost = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_rejects_negative_size_weight() {
        let dir = std::env::temp_dir().join("ballgaze_test_config_size_weight");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let path = dir.join("config.json");
        std::fs::write(&path, r#"{"scoring":{"size_weight":-4.0}}"#).unwrap();
        assert!(matches!(AppConfig::load_from(&path), Err(GazeError::Config { .. })));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_from_missing_file_is_error() {
        let path = std::env::temp_dir().join("ballgaze_test_config_missing/config.json");
        assert!(AppConfig::load_from(path).is_err());
    }
}
