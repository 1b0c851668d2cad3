use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loopscene_core::{BlendMode, Size2D};

use crate::block::AnimationBlock;

/// One layered still image in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Unique image identifier.
    pub id: String,
    /// Human-readable name, usually the uploaded file name.
    pub display_name: String,
    /// Opaque embedded raster payload (a base64 data URI).
    pub pixel_data: String,
    /// Paint-order rank. Across a project the ranks form a dense
    /// permutation of `[0, N)`; lower rank paints on top.
    pub order: u32,
    /// Natural pixel width of the raster.
    pub source_width: u32,
    /// Natural pixel height of the raster.
    pub source_height: u32,
    /// Base opacity in `[0, 1]`, multiplied into every opacity animation.
    pub base_opacity: f64,
    /// Compositing mode hint for the layer group.
    pub blend_mode: BlendMode,
    /// Effects attached to this image, in creation order.
    pub animation_blocks: Vec<AnimationBlock>,
}

impl Image {
    /// Create an image from a decoded upload. The paint-order rank is
    /// assigned when the image is appended to a project.
    pub fn new(
        display_name: impl Into<String>,
        pixel_data: impl Into<String>,
        source_width: u32,
        source_height: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            display_name: display_name.into(),
            pixel_data: pixel_data.into(),
            order: 0,
            source_width,
            source_height,
            base_opacity: 1.0,
            blend_mode: BlendMode::Normal,
            animation_blocks: Vec::new(),
        }
    }

    /// Natural raster dimensions as a float size.
    pub fn source_size(&self) -> Size2D {
        Size2D::new(self.source_width as f64, self.source_height as f64)
    }

    /// Get a block by id.
    pub fn block(&self, id: &str) -> Option<&AnimationBlock> {
        self.animation_blocks.iter().find(|b| b.id == id)
    }

    /// Get a mutable reference to a block by id.
    pub fn block_mut(&mut self, id: &str) -> Option<&mut AnimationBlock> {
        self.animation_blocks.iter_mut().find(|b| b.id == id)
    }

    /// Remove a block by id. Returns the removed block, if any.
    pub fn remove_block(&mut self, id: &str) -> Option<AnimationBlock> {
        let idx = self.animation_blocks.iter().position(|b| b.id == id)?;
        Some(self.animation_blocks.remove(idx))
    }
}
