use serde::{Deserialize, Serialize};

use loopscene_core::{LoopsceneError, LoopsceneResult, Size2D};

use crate::block::AnimationBlock;
use crate::image::Image;

/// Hard cap on layered images per project.
pub const MAX_IMAGES: usize = 10;

/// Top-level project — the root of the Loopscene model tree.
///
/// Field names serialize in camelCase to match the on-disk project-file
/// format (`projectWidth`, `selectedImageId`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Canvas width in pixels.
    #[serde(rename = "projectWidth")]
    pub canvas_width: u32,
    /// Canvas height in pixels.
    #[serde(rename = "projectHeight")]
    pub canvas_height: u32,
    /// Layered images. Their `order` ranks form a dense permutation of
    /// `[0, N)`.
    pub images: Vec<Image>,
    /// Currently selected image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_image_id: Option<String>,
}

impl Project {
    /// Create an empty project with the given canvas size.
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            images: Vec::new(),
            selected_image_id: None,
        }
    }

    /// Canvas dimensions as a float size.
    pub fn canvas_size(&self) -> Size2D {
        Size2D::new(self.canvas_width as f64, self.canvas_height as f64)
    }

    /// Images sorted by ascending paint-order rank.
    pub fn sorted_images(&self) -> Vec<&Image> {
        let mut images: Vec<&Image> = self.images.iter().collect();
        images.sort_by_key(|img| img.order);
        images
    }

    /// Get an image by id.
    pub fn image(&self, id: &str) -> Option<&Image> {
        self.images.iter().find(|img| img.id == id)
    }

    /// Get a mutable reference to an image by id.
    pub fn image_mut(&mut self, id: &str) -> Option<&mut Image> {
        self.images.iter_mut().find(|img| img.id == id)
    }

    /// The currently selected image, if any.
    pub fn selected_image(&self) -> Option<&Image> {
        self.selected_image_id
            .as_deref()
            .and_then(|id| self.image(id))
    }

    /// Append a decoded upload batch. Ranks continue the dense paint-order
    /// sequence in batch order. The whole batch is rejected, with no
    /// partial application, if it would exceed [`MAX_IMAGES`].
    pub fn append_images(&mut self, batch: Vec<Image>) -> LoopsceneResult<()> {
        if self.images.len() + batch.len() > MAX_IMAGES {
            return Err(LoopsceneError::Upload(format!(
                "cannot add {} image(s): project holds {} of {} maximum",
                batch.len(),
                self.images.len(),
                MAX_IMAGES
            )));
        }
        let base = self.images.len() as u32;
        for (i, mut image) in batch.into_iter().enumerate() {
            image.order = base + i as u32;
            self.images.push(image);
        }
        Ok(())
    }

    /// Remove an image, compacting the paint-order permutation so it stays
    /// dense and moving the selection to the bottom-most remaining image.
    pub fn remove_image(&mut self, id: &str) -> Option<Image> {
        let idx = self.images.iter().position(|img| img.id == id)?;
        let removed = self.images.remove(idx);
        for img in &mut self.images {
            if img.order > removed.order {
                img.order -= 1;
            }
        }
        if self.selected_image_id.as_deref() == Some(id) {
            self.selected_image_id = self.sorted_images().first().map(|img| img.id.clone());
        }
        Some(removed)
    }

    /// Move `from` to `to`'s rank, shifting the images in between by one —
    /// the list-drag reorder. A no-op when either id is unknown or both
    /// refer to the same image.
    pub fn reorder_image(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        let (Some(from_order), Some(to_order)) = (
            self.image(from).map(|img| img.order),
            self.image(to).map(|img| img.order),
        ) else {
            return;
        };
        for img in &mut self.images {
            if img.id == from {
                img.order = to_order;
            } else if from_order < to_order && img.order > from_order && img.order <= to_order {
                img.order -= 1;
            } else if from_order > to_order && img.order < from_order && img.order >= to_order {
                img.order += 1;
            }
        }
    }

    /// Select an image (or clear the selection). Unknown ids clear it.
    pub fn select_image(&mut self, id: Option<&str>) {
        self.selected_image_id = id.filter(|id| self.image(id).is_some()).map(String::from);
    }

    /// Find a block anywhere in the project, together with its owning image.
    pub fn find_block(&self, block_id: &str) -> Option<(&Image, &AnimationBlock)> {
        self.images.iter().find_map(|img| {
            img.block(block_id).map(|b| (img, b))
        })
    }

    /// The image owning a block, mutably.
    pub fn image_for_block_mut(&mut self, block_id: &str) -> Option<&mut Image> {
        self.images
            .iter_mut()
            .find(|img| img.animation_blocks.iter().any(|b| b.id == block_id))
    }

    /// Remove a block by id from whichever image owns it.
    pub fn remove_block(&mut self, block_id: &str) -> Option<AnimationBlock> {
        self.images
            .iter_mut()
            .find_map(|img| img.remove_block(block_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{AnimationBlock, EffectKind};

    fn image(name: &str) -> Image {
        Image::new(name, "data:image/png;base64,AAAA", 100, 100)
    }

    fn orders(project: &Project) -> Vec<u32> {
        let mut orders: Vec<u32> = project.images.iter().map(|img| img.order).collect();
        orders.sort_unstable();
        orders
    }

    #[test]
    fn test_append_assigns_dense_orders() {
        let mut project = Project::new(600, 600);
        project
            .append_images(vec![image("a"), image("b"), image("c")])
            .unwrap();
        assert_eq!(orders(&project), vec![0, 1, 2]);
    }

    #[test]
    fn test_append_rejects_over_cap_without_partial_application() {
        let mut project = Project::new(600, 600);
        let batch: Vec<Image> = (0..11).map(|i| image(&format!("img{}", i))).collect();
        assert!(project.append_images(batch).is_err());
        assert!(project.images.is_empty());

        project
            .append_images((0..10).map(|i| image(&format!("img{}", i))).collect())
            .unwrap();
        assert!(project.append_images(vec![image("one-too-many")]).is_err());
        assert_eq!(project.images.len(), 10);
    }

    #[test]
    fn test_remove_compacts_order_permutation() {
        let mut project = Project::new(600, 600);
        project
            .append_images(vec![image("a"), image("b"), image("c"), image("d")])
            .unwrap();
        let middle = project.sorted_images()[1].id.clone();
        project.remove_image(&middle);
        assert_eq!(orders(&project), vec![0, 1, 2]);
    }

    #[test]
    fn test_orders_stay_dense_across_insert_delete_sequence() {
        let mut project = Project::new(600, 600);
        project
            .append_images(vec![image("a"), image("b"), image("c")])
            .unwrap();
        let first = project.sorted_images()[0].id.clone();
        project.remove_image(&first);
        project.append_images(vec![image("d"), image("e")]).unwrap();
        let last = project.sorted_images()[3].id.clone();
        project.remove_image(&last);
        assert_eq!(orders(&project), vec![0, 1, 2]);
    }

    #[test]
    fn test_remove_selected_moves_selection() {
        let mut project = Project::new(600, 600);
        project.append_images(vec![image("a"), image("b")]).unwrap();
        let a = project.sorted_images()[0].id.clone();
        let b = project.sorted_images()[1].id.clone();
        project.select_image(Some(&a));
        project.remove_image(&a);
        assert_eq!(project.selected_image_id.as_deref(), Some(b.as_str()));
        project.remove_image(&b);
        assert!(project.selected_image_id.is_none());
    }

    #[test]
    fn test_reorder_image_shuffles_ranks() {
        let mut project = Project::new(600, 600);
        project
            .append_images(vec![image("a"), image("b"), image("c")])
            .unwrap();
        let a = project.sorted_images()[0].id.clone();
        let c = project.sorted_images()[2].id.clone();

        // Move bottom image to the top rank.
        project.reorder_image(&a, &c);
        assert_eq!(project.image(&a).unwrap().order, 2);
        assert_eq!(orders(&project), vec![0, 1, 2]);

        // And back down.
        project.reorder_image(&a, &project.sorted_images()[0].id.clone());
        assert_eq!(project.image(&a).unwrap().order, 0);
        assert_eq!(orders(&project), vec![0, 1, 2]);
    }

    #[test]
    fn test_select_unknown_image_clears_selection() {
        let mut project = Project::new(600, 600);
        project.append_images(vec![image("a")]).unwrap();
        project.select_image(Some("nope"));
        assert!(project.selected_image_id.is_none());
    }

    #[test]
    fn test_find_and_remove_block_across_images() {
        let mut project = Project::new(600, 600);
        project.append_images(vec![image("a"), image("b")]).unwrap();
        let block = AnimationBlock::with_defaults(EffectKind::Rotate);
        let block_id = block.id.clone();
        let b = project.sorted_images()[1].id.clone();
        project
            .image_mut(&b)
            .unwrap()
            .animation_blocks
            .push(block);

        let (owner, found) = project.find_block(&block_id).unwrap();
        assert_eq!(owner.id, b);
        assert_eq!(found.kind(), EffectKind::Rotate);

        assert!(project.remove_block(&block_id).is_some());
        assert!(project.find_block(&block_id).is_none());
    }
}
