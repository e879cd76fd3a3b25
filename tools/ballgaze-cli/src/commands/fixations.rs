//! Show the parsed fixation export.

use crate::SessionArgs;

pub fn run(args: &SessionArgs) -> anyhow::Result<()> {
    let session = super::open_session(args)?;
    let fixations = session.load_fixations()?;

    println!(
        "{} fixations in {}",
        fixations.len(),
        session.fixations_path().display()
    );
    println!(
        "  {:>5} {:>6} {:>12} {:>7} {:>7} {:>7} {:>7} {:>9}",
        "row", "id", "start", "frame0", "frame1", "x", "y", "dur(ms)"
    );
    for (row, f) in fixations.iter().enumerate() {
        println!(
            "  {:>5} {:>6} {:>12.4} {:>7} {:>7} {:>7.3} {:>7.3} {:>9.1}",
            row,
            f.id,
            f.start_timestamp,
            f.start_frame_index,
            f.end_frame_index,
            f.norm_pos_x,
            f.norm_pos_y,
            f.duration
        );
    }

    Ok(())
}
