//! # loopscene-timeline
//!
//! The timeline engines: row layout (which blocks occupy which of the 3
//! display rows), and drag placement (pointer geometry → snapped, validated
//! `(startTime, row)` candidates).
//!
//! The two sides deliberately differ in strictness: dropping a dragged
//! block onto an occupied interval is rejected, while creating a new block
//! falls back to row 0 even when every row conflicts with the default
//! placement. Both behaviors are part of the contract.

pub mod drag;
pub mod geometry;
pub mod placement;
pub mod rows;

pub use drag::{DragContext, OverlapSignal, Placeholder};
pub use geometry::TimelineGeometry;
pub use placement::{check_drop, commit_drop, compute_placement, Placement};
pub use rows::{blocks_for_row, default_row, intervals_overlap};
