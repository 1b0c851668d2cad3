//! # loopscene-ir
//!
//! The Loopscene project model — a queryable, serializable, deterministic
//! representation of a layered looping scene: images, their animation
//! blocks, and global canvas/timeline settings.
//!
//! Every editing surface mutates this model before the compositor turns it
//! into an animated document.

pub mod block;
pub mod file;
pub mod image;
pub mod project;
pub mod validate;

pub use block::{AnimationBlock, EffectKind, EffectParams, ROW_COUNT};
pub use image::Image;
pub use project::{Project, MAX_IMAGES};
pub use validate::validate_project;
