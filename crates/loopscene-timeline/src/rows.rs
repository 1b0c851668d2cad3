//! Row layout: which blocks occupy which display row, and where a freshly
//! created block should land.

use loopscene_core::Duration;
use loopscene_ir::{AnimationBlock, Image, ROW_COUNT};

/// Default placement probed for a newly created block: `[0s, 2s)`.
const PROBE_START: f64 = 0.0;
const PROBE_END: f64 = 2.0;

/// Half-open interval overlap test. Touching endpoints do not overlap, so a
/// block may start exactly where another ends.
pub fn intervals_overlap(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    a_start < b_end && a_end > b_start
}

/// The blocks whose stored row index equals `row`. Strictly a read/query:
/// row assignment happens at creation and drop time, never here.
pub fn blocks_for_row(image: &Image, row: u8) -> Vec<&AnimationBlock> {
    image
        .animation_blocks
        .iter()
        .filter(|b| b.row_index == row)
        .collect()
}

/// Row for a new block: the first of rows 0, 1, 2 whose occupants leave the
/// default `[0s, 2s)` placement free. When every row conflicts, falls back
/// to row 0 and accepts the overlap — the user resolves it by dragging.
/// (Drop placement, by contrast, rejects overlaps outright.)
pub fn default_row(image: &Image) -> u8 {
    for row in 0..ROW_COUNT {
        let conflict = blocks_for_row(image, row).iter().any(|b| {
            intervals_overlap(
                PROBE_START,
                PROBE_END,
                b.start_time.as_seconds(),
                b.end_time().as_seconds(),
            )
        });
        if !conflict {
            return row;
        }
    }
    tracing::debug!("all rows conflict with the default placement, falling back to row 0");
    0
}

/// Whether `candidate_start` for a block of `duration` would overlap any
/// occupant of `row`, excluding the block identified by `exclude_id`.
pub fn row_has_conflict(
    image: &Image,
    row: u8,
    candidate_start: Duration,
    duration: Duration,
    exclude_id: &str,
) -> bool {
    let start = candidate_start.as_seconds();
    let end = start + duration.as_seconds();
    blocks_for_row(image, row)
        .iter()
        .filter(|b| b.id != exclude_id)
        .any(|b| intervals_overlap(start, end, b.start_time.as_seconds(), b.end_time().as_seconds()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopscene_ir::EffectKind;

    fn image_with_blocks(placements: &[(u8, f64, f64)]) -> Image {
        let mut image = Image::new("a.png", "data:image/png;base64,AAAA", 100, 100);
        for &(row, start, duration) in placements {
            let mut block = AnimationBlock::with_defaults(EffectKind::Pan);
            block.row_index = row;
            block.start_time = Duration::from_seconds(start);
            block.duration = Duration::from_seconds(duration);
            image.animation_blocks.push(block);
        }
        image
    }

    #[test]
    fn test_intervals_touching_do_not_overlap() {
        assert!(!intervals_overlap(0.0, 2.0, 2.0, 4.0));
        assert!(!intervals_overlap(2.0, 4.0, 0.0, 2.0));
        assert!(intervals_overlap(0.0, 2.05, 2.0, 4.0));
    }

    #[test]
    fn test_blocks_for_row_filters_by_stored_index() {
        let image = image_with_blocks(&[(0, 0.0, 2.0), (1, 0.0, 2.0), (0, 3.0, 1.0)]);
        assert_eq!(blocks_for_row(&image, 0).len(), 2);
        assert_eq!(blocks_for_row(&image, 1).len(), 1);
        assert_eq!(blocks_for_row(&image, 2).len(), 0);
    }

    #[test]
    fn test_default_row_prefers_first_free() {
        let empty = image_with_blocks(&[]);
        assert_eq!(default_row(&empty), 0);

        let row0_busy = image_with_blocks(&[(0, 0.0, 2.0)]);
        assert_eq!(default_row(&row0_busy), 1);

        let rows01_busy = image_with_blocks(&[(0, 1.0, 2.0), (1, 0.5, 1.0)]);
        assert_eq!(default_row(&rows01_busy), 2);
    }

    #[test]
    fn test_default_row_ignores_blocks_outside_probe() {
        // A block at [2s, 4s) does not touch the half-open [0s, 2s) probe.
        let image = image_with_blocks(&[(0, 2.0, 2.0)]);
        assert_eq!(default_row(&image), 0);
    }

    #[test]
    fn test_default_row_falls_back_to_zero_when_all_conflict() {
        let image = image_with_blocks(&[(0, 0.0, 2.0), (1, 0.0, 2.0), (2, 1.0, 3.0)]);
        assert_eq!(default_row(&image), 0);
    }

    #[test]
    fn test_row_has_conflict_excludes_moved_block() {
        let image = image_with_blocks(&[(0, 0.0, 2.0)]);
        let id = image.animation_blocks[0].id.clone();
        // The block never conflicts with itself.
        assert!(!row_has_conflict(
            &image,
            0,
            Duration::from_seconds(1.0),
            Duration::from_seconds(2.0),
            &id,
        ));
        assert!(row_has_conflict(
            &image,
            0,
            Duration::from_seconds(1.0),
            Duration::from_seconds(2.0),
            "someone-else",
        ));
    }
}
