//! # loopscene-core
//!
//! Core types and primitives for the Loopscene composition engine.
//! This crate contains foundational types shared across all Loopscene crates:
//! durations, 2D math, blend modes, and error types.

pub mod error;
pub mod math;
pub mod time;
pub mod types;

pub use error::{LoopsceneError, LoopsceneResult};
pub use math::{Point2D, Size2D};
pub use time::Duration;
pub use types::{BlendMode, PanDirection};
