//! Detector class id to ball label lookup.
//!
//! The object detector was trained with 51 classes: fifty balls and the
//! on-screen user cursor. Class ids start at 1. The table is a compile-time
//! constant and must stay byte-for-byte compatible with the trained model.

use ballgaze_common::error::{GazeError, GazeResult};

/// Class id of the user cursor sentinel.
pub const USER_CURSOR_CLASS_ID: u32 = 51;

/// Class labels, indexed by `class_id - 1`.
pub const BALL_LABELS: [&str; 51] = [
    "ball_01_pink",
    "ball_02_pink",
    "ball_02_yellow",
    "ball_03_pink",
    "ball_03_yellow",
    "ball_04_pink",
    "ball_04_yellow",
    "ball_05_pink",
    "ball_05_yellow",
    "ball_06_pink",
    "ball_06_yellow",
    "ball_07_pink",
    "ball_07_yellow",
    "ball_08_pink",
    "ball_08_yellow",
    "ball_09_pink",
    "ball_09_yellow",
    "ball_10_pink",
    "ball_10_yellow",
    "ball_11_pink",
    "ball_11_yellow",
    "ball_12_pink",
    "ball_12_yellow",
    "ball_13_pink",
    "ball_13_yellow",
    "ball_14_pink",
    "ball_14_yellow",
    "ball_15_pink",
    "ball_15_yellow",
    "ball_16_pink",
    "ball_16_yellow",
    "ball_17_pink",
    "ball_17_yellow",
    "ball_18_pink",
    "ball_18_yellow",
    "ball_19_pink",
    "ball_19_yellow",
    "ball_20_pink",
    "ball_20_yellow",
    "ball_21_pink",
    "ball_21_yellow",
    "ball_22_pink",
    "ball_22_yellow",
    "ball_23_pink",
    "ball_23_yellow",
    "ball_24_pink",
    "ball_24_yellow",
    "ball_25_pink",
    "ball_25_yellow",
    "ball_unknown",
    "user_cursor",
];

/// Look up the label for a detector class id.
pub fn ball_label(class_id: i64) -> GazeResult<&'static str> {
    usize::try_from(class_id)
        .ok()
        .and_then(|id| id.checked_sub(1))
        .and_then(|idx| BALL_LABELS.get(idx))
        .copied()
        .ok_or(GazeError::UnknownClass { class_id })
}

/// Whether the class id is the cursor sentinel rather than a ball.
pub fn is_cursor(class_id: u32) -> bool {
    class_id == USER_CURSOR_CLASS_ID
}
