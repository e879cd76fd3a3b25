//! Score detected balls as look-targets of every fixation.

use std::path::{Path, PathBuf};

use ballgaze_analysis_core::{SessionAnalysis, SessionAnalyzer};
use ballgaze_common::config::AppConfig;
use ballgaze_common::error::{GazeError, GazeResult};

use crate::SessionArgs;

pub fn run(args: &SessionArgs, config: &AppConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    let session = super::open_session(args)?;
    let analyzer = SessionAnalyzer::from_config(config)?;

    println!("Scoring fixations for patient {}", session.patient_id);
    let analysis = analyzer
        .analyze(&session)
        .map_err(|e| anyhow::anyhow!("Analysis failed: {e}"))?;

    println!(
        "  Offset: {:+.4}s ({} engine events)",
        analysis.sync.offset.offset_secs,
        analysis.synced_events.len()
    );
    println!();
    println!("  {:>5} {:>6} {:<16} {:>9} {:>9}", "row", "id", "top target", "distance", "score");
    for (row, (fixation_id, top)) in analysis.top_candidates().into_iter().enumerate() {
        match top {
            Some(top) => println!(
                "  {:>5} {:>6} {:<16} {:>9.4} {:>9.4}",
                row, fixation_id, top.ball_label, top.distance_to_gaze, top.score
            ),
            None => println!("  {:>5} {:>6} {:<16}", row, fixation_id, "(no detections)"),
        }
    }

    if let Some(path) = output {
        write_report(&analysis, &path)?;
        println!("\nScores saved to: {}", path.display());
    }

    Ok(())
}

/// Write scores by file extension: `.csv` gets one row per candidate,
/// `.json` the whole analysis.
fn write_report(analysis: &SessionAnalysis, path: &Path) -> GazeResult<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => {
            let mut writer = csv::Writer::from_path(path)?;
            for row in analysis.score_rows() {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        Some("json") => {
            let json = serde_json::to_string_pretty(analysis)?;
            std::fs::write(path, json)?;
        }
        _ => {
            return Err(GazeError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    }

    tracing::info!("Wrote scores to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballgaze_session_model::Session;

    fn sample_analysis() -> SessionAnalysis {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/sample-session");
        let session = Session::open("AN755", root).unwrap();
        SessionAnalyzer::from_config(&AppConfig::default())
            .unwrap()
            .analyze(&session)
            .unwrap()
    }

    #[test]
    fn test_write_csv_and_json() {
        let dir = std::env::temp_dir().join("ballgaze_test_score_report");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let analysis = sample_analysis();

        let csv_path = dir.join("scores.csv");
        write_report(&analysis, &csv_path).unwrap();
        let csv = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "fixation_id,ball_label,distance_to_gaze,score");
        assert_eq!(lines.len(), 1 + analysis.score_rows().len());

        let json_path = dir.join("scores.json");
        write_report(&analysis, &json_path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["patient_id"], "AN755");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let path = std::env::temp_dir().join("ballgaze_test_scores.xlsx");
        let err = write_report(&sample_analysis(), &path).unwrap_err();
        assert!(matches!(err, GazeError::UnsupportedFormat { .. }));
    }
}
