use std::collections::HashSet;

use loopscene_core::LoopsceneError;

use crate::block::ROW_COUNT;
use crate::project::{Project, MAX_IMAGES};

/// Validate a Project for structural correctness.
///
/// Used by the atomic project-file load (a file producing any error here
/// never replaces the live project) and by the CLI `validate` command.
pub fn validate_project(project: &Project) -> Result<(), Vec<LoopsceneError>> {
    let mut errors = Vec::new();

    if project.canvas_width == 0 || project.canvas_height == 0 {
        errors.push(LoopsceneError::validation(
            "canvas dimensions must be positive",
        ));
    }

    if project.images.len() > MAX_IMAGES {
        errors.push(LoopsceneError::validation(format!(
            "project holds {} images, maximum is {}",
            project.images.len(),
            MAX_IMAGES
        )));
    }

    // Paint-order ranks must form a dense permutation of [0, N).
    let mut orders: Vec<u32> = project.images.iter().map(|img| img.order).collect();
    orders.sort_unstable();
    if orders
        .iter()
        .enumerate()
        .any(|(i, &order)| order != i as u32)
    {
        errors.push(LoopsceneError::validation(
            "image paint-order ranks must form a dense permutation of [0, N)",
        ));
    }

    let mut image_ids = HashSet::new();
    let mut block_ids = HashSet::new();
    for image in &project.images {
        if !image_ids.insert(&image.id) {
            errors.push(LoopsceneError::validation(format!(
                "duplicate image id: {}",
                image.id
            )));
        }

        if !(0.0..=1.0).contains(&image.base_opacity) {
            errors.push(LoopsceneError::validation(format!(
                "image '{}' base opacity {} outside [0, 1]",
                image.display_name, image.base_opacity
            )));
        }

        for block in &image.animation_blocks {
            if !block_ids.insert(&block.id) {
                errors.push(LoopsceneError::validation(format!(
                    "duplicate block id: {}",
                    block.id
                )));
            }
            if block.duration.as_seconds() <= 0.0 {
                errors.push(LoopsceneError::validation(format!(
                    "block '{}' has non-positive duration",
                    block.id
                )));
            }
            if block.row_index >= ROW_COUNT {
                errors.push(LoopsceneError::validation(format!(
                    "block '{}' row index {} outside 0..{}",
                    block.id, block.row_index, ROW_COUNT
                )));
            }
        }
    }

    if let Some(selected) = project.selected_image_id.as_deref() {
        if project.image(selected).is_none() {
            errors.push(LoopsceneError::validation(format!(
                "selected image id '{}' does not exist",
                selected
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
