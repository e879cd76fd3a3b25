pub mod extract_frames;
pub mod fixations;
pub mod predictions;
pub mod score;
pub mod sync;
pub mod validate;

use std::path::PathBuf;

use ballgaze_common::config::AppConfig;
use ballgaze_session_model::Session;

use crate::SessionArgs;

/// Clean a user-supplied path: surrounding whitespace and quotes are dropped,
/// so paths pasted from a file manager work as typed.
pub fn clean_path(raw: &str) -> PathBuf {
    PathBuf::from(raw.trim().trim_matches(|c| c == '"' || c == '\'').trim())
}

/// clap value parser for path arguments.
pub fn parse_path(raw: &str) -> Result<PathBuf, String> {
    let path = clean_path(raw);
    if path.as_os_str().is_empty() {
        return Err("path is empty".to_string());
    }
    Ok(path)
}

/// Open the session named by the command line, applying path overrides.
pub fn open_session(args: &SessionArgs) -> anyhow::Result<Session> {
    let mut session = Session::open(&args.patient, &args.session_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to open session {}: {e}",
            args.session_dir.display()
        )
    })?;
    if let Some(path) = &args.fixations {
        session = session.with_fixations_path(path);
    }
    if let Some(path) = &args.predictions {
        session = session.with_predictions_dir(path);
    }
    if let Some(path) = &args.events {
        session = session.with_event_log_path(path);
    }
    Ok(session)
}

/// Override the configured frame rate from `--fps`.
pub fn apply_fps(config: &mut AppConfig, fps: Option<f64>) -> anyhow::Result<()> {
    if let Some(fps) = fps {
        config.sync.fps = fps;
        config.validate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path_strips_quotes_and_whitespace() {
        assert_eq!(clean_path("  '/data/AN755' \n"), PathBuf::from("/data/AN755"));
        assert_eq!(clean_path("\"/data/my session\""), PathBuf::from("/data/my session"));
        assert_eq!(clean_path("relative/dir"), PathBuf::from("relative/dir"));
    }

    #[test]
    fn test_parse_path_rejects_empty() {
        assert!(parse_path(" \"\" ").is_err());
        assert!(parse_path("/tmp").is_ok());
    }

    #[test]
    fn test_open_session_applies_overrides() {
        let dir = std::env::temp_dir().join("ballgaze_test_cli_session_overrides");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let args = SessionArgs {
            session_dir: dir.clone(),
            patient: "AN755".to_string(),
            fixations: Some(PathBuf::from("/exports/fixations.csv")),
            predictions: None,
            events: Some(PathBuf::from("/logs/unity.log")),
        };
        let session = open_session(&args).unwrap();
        assert_eq!(session.fixations_path(), PathBuf::from("/exports/fixations.csv"));
        assert_eq!(session.predictions_dir(), dir.join("predictions"));
        assert_eq!(session.event_log_path(), PathBuf::from("/logs/unity.log"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_apply_fps() {
        let mut config = AppConfig::default();
        apply_fps(&mut config, Some(60.0)).unwrap();
        assert!((config.sync.fps - 60.0).abs() < 1e-9);

        apply_fps(&mut config, None).unwrap();
        assert!((config.sync.fps - 60.0).abs() < 1e-9);

        assert!(apply_fps(&mut config, Some(-1.0)).is_err());
    }
}
