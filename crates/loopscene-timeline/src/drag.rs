//! Transient drag-interaction state: the grab context captured at drag
//! start, the live placeholder rectangle, and the self-clearing overlap
//! signal shown after a rejected drop.

use std::time::{Duration as StdDuration, Instant};

use loopscene_core::Duration;

use crate::geometry::TimelineGeometry;
use crate::placement::Placement;

/// How long the overlap signal stays visible after a rejected drop.
pub const OVERLAP_SIGNAL_TTL: StdDuration = StdDuration::from_secs(2);

/// State captured once when a block drag starts and held constant until
/// drop, drag-end, or drag-leave clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct DragContext {
    /// The block being moved.
    pub block_id: String,
    /// Horizontal pointer offset from the block's left edge at drag start.
    pub grab_offset: f64,
    /// The block's duration, fixed for the drag's lifetime.
    pub block_duration: Duration,
}

/// The live placeholder rectangle shown under the pointer during drag-over.
/// Horizontal extent is expressed as fractions of the strip width so the
/// embedding UI can style it as percentages; vertical extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placeholder {
    pub left_frac: f64,
    pub width_frac: f64,
    pub top_px: f64,
    pub height_px: f64,
}

impl Placeholder {
    /// Placeholder for a placement candidate — computed from the same
    /// numbers a drop would commit.
    pub fn for_placement(
        placement: &Placement,
        block_duration: Duration,
        geometry: &TimelineGeometry,
    ) -> Self {
        let total = geometry.duration.as_seconds();
        Self {
            left_frac: placement.start_time.as_seconds() / total,
            width_frac: block_duration.as_seconds() / total,
            top_px: placement.row_index as f64 * geometry.row_height(),
            height_px: geometry.row_height(),
        }
    }
}

/// Transient "overlap" condition raised by a rejected drop. Auto-clears
/// after [`OVERLAP_SIGNAL_TTL`]; never blocks further edits.
#[derive(Debug, Clone, Default)]
pub struct OverlapSignal {
    raised_at: Option<Instant>,
}

impl OverlapSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal (restarting the clock if already raised).
    pub fn raise(&mut self) {
        self.raised_at = Some(Instant::now());
    }

    /// Whether the signal is currently showing.
    pub fn is_active(&self) -> bool {
        self.raised_at
            .map(|at| at.elapsed() < OVERLAP_SIGNAL_TTL)
            .unwrap_or(false)
    }

    /// Clear explicitly (e.g. when a later drop succeeds).
    pub fn clear(&mut self) {
        self.raised_at = None;
    }
}
