//! Show the detections recorded for one fixation.

use crate::SessionArgs;

pub fn run(args: &SessionArgs, prefix: &str) -> anyhow::Result<()> {
    let session = super::open_session(args)?;
    let detections = session.load_predictions(prefix)?;

    println!(
        "Detections for '{prefix}' in {}:",
        session.predictions_dir().display()
    );
    if detections.is_empty() {
        println!("  (none)");
        return Ok(());
    }

    println!(
        "  {:<16} {:>5} {:>8} {:>8} {:>8} {:>8} {:>10}",
        "label", "class", "x", "y", "width", "height", "area"
    );
    for d in &detections {
        println!(
            "  {:<16} {:>5} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>10.6}",
            d.ball_label, d.class_id, d.center.0, d.center.1, d.width, d.height, d.bbox_area
        );
    }

    Ok(())
}
