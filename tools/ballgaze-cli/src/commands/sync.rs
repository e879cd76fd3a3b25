//! Synchronize a session's engine log onto the eye-tracker clock.

use ballgaze_analysis_core::ClockSynchronizer;
use ballgaze_common::config::AppConfig;

use crate::SessionArgs;

pub fn run(args: &SessionArgs, config: &AppConfig) -> anyhow::Result<()> {
    let session = super::open_session(args)?;
    let fixations = session.load_fixations()?;
    let events = session.load_engine_log()?;

    let synchronizer = ClockSynchronizer::new(&config.sync)?;
    let (sync, synced) = synchronizer.synchronize(&fixations, &events)?;

    println!("Clock sync for patient {} @ {}fps", session.patient_id, sync.fps);
    println!("  Engine start: {:.4}s", sync.engine_start_time);
    println!("  Video start: {:.4}s", sync.video_start_time);
    println!("  Synced start: {:.4}s", sync.synced_start_time);
    println!("  Offset: {:+.4}s", sync.offset.offset_secs);
    println!();

    println!("Events ({}):", synced.len());
    for e in &synced {
        let label = e.ball_label().unwrap_or("-");
        println!(
            "  {:<12} {:<16} {:>10.4} -> {:>10.4}",
            e.event.kind_name(),
            label,
            e.event.raw_time,
            e.synced_time
        );
    }

    Ok(())
}
