//! # loopscene-compose
//!
//! The compositor: a pure, deterministic function from a project model and
//! a render resolution to a self-contained animated SVG document. The same
//! code path feeds the live preview and every export, so the two can never
//! disagree.

pub mod compositor;
pub mod svg;

pub use compositor::{compose, RenderSize};
