//! Representative frame selection.
//!
//! Short fixations are likely noise and get a single sample. Longer ones get
//! three or five samples so the detector sees how the scene evolves.
//!
//! | span (`end - start`) | frames |
//! |---|---|
//! | 0..=3 | midpoint |
//! | 4..=9 | start, midpoint, end |
//! | 10.. | start, quarter, midpoint, three-quarter, end |

use ballgaze_session_model::fixation::FrameRange;

/// Frame indices representing `range`, ascending and unique.
pub fn select_frames(range: &FrameRange) -> Vec<u64> {
    let start = range.start;
    let span = range.span();

    if span <= 3 {
        vec![start + span / 2]
    } else if span <= 9 {
        vec![start, start + span / 2, range.end]
    } else {
        vec![
            start,
            start + span / 4,
            start + span / 2,
            start + three_quarters(span),
            range.end,
        ]
    }
}

/// `floor(3 * span / 4)` without overflowing for spans near `u64::MAX`.
fn three_quarters(span: u64) -> u64 {
    span / 4 * 3 + span % 4 * 3 / 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn frames(start: u64, end: u64) -> Vec<u64> {
        select_frames(&FrameRange::new(start, end).unwrap())
    }

    #[test]
    fn test_documented_examples() {
        assert_eq!(frames(10, 10), vec![10]);
        assert_eq!(frames(0, 8), vec![0, 4, 8]);
        assert_eq!(frames(0, 19), vec![0, 4, 9, 14, 19]);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(frames(5, 8), vec![6]);
        assert_eq!(frames(5, 9), vec![5, 7, 9]);
        assert_eq!(frames(5, 14), vec![5, 9, 14]);
        assert_eq!(frames(5, 15), vec![5, 7, 10, 12, 15]);
    }

    #[test]
    fn test_short_fixation_matches_midpoint() {
        for end in 100..=103 {
            let range = FrameRange::new(100, end).unwrap();
            assert_eq!(select_frames(&range), vec![range.midpoint()]);
        }
    }

    #[test]
    fn test_full_u64_range_does_not_overflow() {
        let selected = frames(0, u64::MAX);
        assert_eq!(selected.len(), 5);
        assert_eq!(selected[0], 0);
        assert_eq!(selected[3], u64::MAX / 4 * 3 + 2);
        assert_eq!(selected[4], u64::MAX);
        assert!(selected.windows(2).all(|w| w[0] < w[1]));
    }

    proptest! {
        #[test]
        fn three_quarters_matches_wide_arithmetic(span in any::<u64>()) {
            prop_assert_eq!(three_quarters(span) as u128, span as u128 * 3 / 4);
        }

        #[test]
        fn selected_frames_are_sorted_unique_and_bounded(
            start in 0u64..1_000_000,
            span in 0u64..10_000,
        ) {
            let range = FrameRange::new(start, start + span).unwrap();
            let selected = select_frames(&range);

            let expected_len = match span {
                0..=3 => 1,
                4..=9 => 3,
                _ => 5,
            };
            prop_assert_eq!(selected.len(), expected_len);
            prop_assert!(selected.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(selected.iter().all(|f| *f >= range.start && *f <= range.end));
            prop_assert!(selected.contains(&range.midpoint()));
        }
    }
}
