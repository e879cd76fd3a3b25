//! Unity engine event log.
//!
//! The log is a strict two-column, tab-separated grammar:
//!
//! ```text
//! Start<TAB>0.0
//! Touch - ball ball_01_pink<TAB>12.5
//! End<TAB>301.2
//! ```
//!
//! The event column is matched literally: `" Start"` is not a Start event.
//! Only the timestamp column tolerates surrounding whitespace. Anything that
//! does not fit is a hard error; a log that cannot be parsed means the
//! session inputs are mismatched or corrupt.

use std::path::Path;

use serde::{Deserialize, Serialize};

use ballgaze_common::clock::ClockOffset;
use ballgaze_common::error::{GazeError, GazeResult};

/// Separator between the interaction verb and the ball label.
pub const BALL_SEPARATOR: &str = " - ball ";

/// What happened in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEventKind {
    /// Trial start.
    Start,
    /// Trial end.
    End,
    /// The subject interacted with a ball.
    Interaction { verb: String, ball_label: String },
}

/// A single engine log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineEvent {
    #[serde(flatten)]
    pub kind: EngineEventKind,

    /// Timestamp on the engine clock (seconds).
    pub raw_time: f64,
}

/// An engine event carried onto the eye-tracker clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncedEngineEvent {
    #[serde(flatten)]
    pub event: EngineEvent,

    /// Timestamp on the eye-tracker clock (seconds).
    pub synced_time: f64,
}

impl EngineEvent {
    pub fn start(raw_time: f64) -> Self {
        Self {
            kind: EngineEventKind::Start,
            raw_time,
        }
    }

    pub fn end(raw_time: f64) -> Self {
        Self {
            kind: EngineEventKind::End,
            raw_time,
        }
    }

    pub fn interaction(verb: impl Into<String>, ball_label: impl Into<String>, raw_time: f64) -> Self {
        Self {
            kind: EngineEventKind::Interaction {
                verb: verb.into(),
                ball_label: ball_label.into(),
            },
            raw_time,
        }
    }

    /// "Start", "End", or the interaction verb.
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            EngineEventKind::Start => "Start",
            EngineEventKind::End => "End",
            EngineEventKind::Interaction { verb, .. } => verb,
        }
    }

    /// Ball named by an interaction; `None` for Start/End.
    pub fn ball_label(&self) -> Option<&str> {
        match &self.kind {
            EngineEventKind::Interaction { ball_label, .. } => Some(ball_label),
            _ => None,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self.kind, EngineEventKind::Start)
    }

    /// Attach the eye-tracker timestamp produced by `offset`.
    pub fn synced(&self, offset: ClockOffset) -> SyncedEngineEvent {
        SyncedEngineEvent {
            event: self.clone(),
            synced_time: offset.apply(self.raw_time),
        }
    }
}

impl SyncedEngineEvent {
    pub fn ball_label(&self) -> Option<&str> {
        self.event.ball_label()
    }
}

/// Parse one log line. `line_no` is 1-based and only used for errors.
pub fn parse_log_line(line: &str, line_no: usize) -> GazeResult<EngineEvent> {
    let malformed = || GazeError::MalformedLogLine {
        line_no,
        line: line.to_string(),
    };

    let (event, timestamp) = line.split_once('\t').ok_or_else(malformed)?;
    let raw_time: f64 = timestamp.trim().parse().map_err(|_| malformed())?;

    let kind = match event {
        "Start" => EngineEventKind::Start,
        "End" => EngineEventKind::End,
        other => {
            let (verb, ball_label) = other.split_once(BALL_SEPARATOR).ok_or_else(malformed)?;
            if verb.trim().is_empty() || ball_label.trim().is_empty() {
                return Err(malformed());
            }
            EngineEventKind::Interaction {
                verb: verb.to_string(),
                ball_label: ball_label.to_string(),
            }
        }
    };

    Ok(EngineEvent { kind, raw_time })
}

/// Parse a whole log. Blank lines are skipped; order is preserved.
pub fn parse_engine_log(content: &str) -> GazeResult<Vec<EngineEvent>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_log_line(line.trim_end_matches('\r'), i + 1))
        .collect()
}

/// Load and parse the engine log at `path`.
pub fn load_engine_log(path: impl AsRef<Path>) -> GazeResult<Vec<EngineEvent>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(GazeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let events = parse_engine_log(&content)?;
    tracing::debug!("Parsed {} engine events from {}", events.len(), path.display());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_line() {
        let event = parse_log_line("Touch - ball ball_01_pink\t12.5", 1).unwrap();
        assert_eq!(event.kind_name(), "Touch");
        assert_eq!(event.ball_label(), Some("ball_01_pink"));
        assert!((event.raw_time - 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_start_and_end_lines() {
        let start = parse_log_line("Start\t0.0", 1).unwrap();
        assert_eq!(start, EngineEvent::start(0.0));
        assert_eq!(start.ball_label(), None);
        assert!(start.is_start());

        let end = parse_log_line("End\t301.25", 2).unwrap();
        assert_eq!(end.kind_name(), "End");
        assert_eq!(end.ball_label(), None);
    }

    #[test]
    fn test_malformed_lines() {
        for line in [
            "Touch - ball ball_01_pink 12.5",
            "Start\tnot-a-number",
            "Touch ball_01_pink\t1.0",
            " - ball ball_01_pink\t1.0",
            "Touch - ball \t1.0",
            " Start\t0.0",
            "End \t5.0",
        ] {
            let err = parse_log_line(line, 7).unwrap_err();
            assert!(
                matches!(err, GazeError::MalformedLogLine { line_no: 7, .. }),
                "expected malformed for {line:?}"
            );
        }
    }

    #[test]
    fn test_log_with_crlf_and_blank_lines() {
        let log = "Start\t2.0\r\n\r\nGrab - ball ball_03_yellow\t4.5\r\nEnd\t10.0\r\n";
        let events = parse_engine_log(log).unwrap();
        assert_eq!(
            events,
            vec![
                EngineEvent::start(2.0),
                EngineEvent::interaction("Grab", "ball_03_yellow", 4.5),
                EngineEvent::end(10.0),
            ]
        );
    }

    #[test]
    fn test_error_reports_original_line_number() {
        let log = "Start\t0.0\n\nbroken\n";
        let err = parse_engine_log(log).unwrap_err();
        assert!(matches!(err, GazeError::MalformedLogLine { line_no: 3, .. }));
    }

    #[test]
    fn test_synced_event_serializes_flat() {
        let synced = EngineEvent::interaction("Touch", "ball_05_pink", 1.0).synced(ClockOffset::new(4.0));
        assert!((synced.synced_time - 5.0).abs() < 1e-12);
        let json = serde_json::to_string(&synced).unwrap();
        assert!(json.contains("\"kind\":\"interaction\""));
        assert!(json.contains("\"ball_label\":\"ball_05_pink\""));
        assert!(json.contains("\"synced_time\":5.0"));
    }
}
