//! Drag placement: pointer geometry → a snapped, clamped `(startTime, row)`
//! candidate, and the validation/commit path for drops.
//!
//! The same formula backs both the live drag-over placeholder and the final
//! drop, so the preview can never diverge from what a commit would do.

use loopscene_core::{Duration, LoopsceneError, LoopsceneResult, Point2D};
use loopscene_ir::{Image, ROW_COUNT};

use crate::drag::DragContext;
use crate::geometry::TimelineGeometry;
use crate::rows::row_has_conflict;

/// A candidate placement for a dragged block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub start_time: Duration,
    pub row_index: u8,
}

/// Map a pointer position to a placement candidate.
///
/// The horizontal grab offset captured at drag start is subtracted so the
/// block's left edge, not the pointer, is what snaps. Time snaps to the
/// 0.1 s grid and clamps to `[0, duration - blockDuration]`; the row comes
/// from the vertical third the pointer is in, clamped to the outer rows.
pub fn compute_placement(
    pointer: Point2D,
    geometry: &TimelineGeometry,
    drag: &DragContext,
) -> Placement {
    let drop_x = pointer.x - geometry.left - drag.grab_offset;
    let raw_time = drop_x / geometry.width * geometry.duration.as_seconds();
    let start_time = Duration::from_seconds(raw_time)
        .snap_to_tenths()
        .clamp(Duration::zero(), geometry.duration - drag.block_duration);

    let drop_y = pointer.y - geometry.top;
    let row = (drop_y / geometry.row_height()).floor();
    let row_index = (row.max(0.0) as i64).clamp(0, (ROW_COUNT - 1) as i64) as u8;

    Placement {
        start_time,
        row_index,
    }
}

/// Validate a drop candidate against the target row's occupants (excluding
/// the moved block itself). Touching endpoints are allowed; any half-open
/// overlap — however small — is a conflict.
pub fn check_drop(
    image: &Image,
    block_id: &str,
    placement: &Placement,
    block_duration: Duration,
) -> LoopsceneResult<()> {
    if row_has_conflict(
        image,
        placement.row_index,
        placement.start_time,
        block_duration,
        block_id,
    ) {
        return Err(LoopsceneError::placement(format!(
            "block overlaps an occupant of row {} at {:.1}s",
            placement.row_index,
            placement.start_time.as_seconds()
        )));
    }
    Ok(())
}

/// Validate and commit a drop. On rejection the block's `startTime` and
/// `rowIndex` are left exactly as they were.
pub fn commit_drop(
    image: &mut Image,
    block_id: &str,
    placement: &Placement,
) -> LoopsceneResult<()> {
    let duration = image
        .block(block_id)
        .map(|b| b.duration)
        .ok_or_else(|| LoopsceneError::placement(format!("unknown block: {}", block_id)))?;

    check_drop(image, block_id, placement, duration)?;

    let block = image
        .block_mut(block_id)
        .ok_or_else(|| LoopsceneError::placement(format!("unknown block: {}", block_id)))?;
    block.start_time = placement.start_time;
    block.row_index = placement.row_index;
    tracing::debug!(
        block = block_id,
        row = placement.row_index,
        start = placement.start_time.as_seconds(),
        "committed drop"
    );
    Ok(())
}
