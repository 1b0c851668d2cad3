//! The editing session: an explicitly owned store around the project model.
//!
//! Every handler mutates the project through this API from a single
//! event-processing thread, runs to completion, and (on success) schedules
//! a debounced preview recompile. There is no hidden global state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use loopscene_compose::{compose, RenderSize};
use loopscene_core::{BlendMode, Duration, LoopsceneError, LoopsceneResult, Point2D};
use loopscene_ir::{file, AnimationBlock, EffectKind, Image, Project};
use loopscene_timeline::{
    commit_drop, compute_placement, default_row, DragContext, OverlapSignal, Placeholder,
    TimelineGeometry,
};

use crate::export::{ExportFormat, RenderClient};
use crate::preview::PreviewDriver;

/// Which image dimension a numeric edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDimension {
    Width,
    Height,
}

/// Clears the export busy flag when dropped, so the flag can never be left
/// set — not even when compose or the collaborator request fails.
pub struct ExportGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// The single live editing session.
pub struct Session {
    project: Project,
    timeline_duration: Duration,
    selected_block_id: Option<String>,
    overlap: OverlapSignal,
    drag: Option<DragContext>,
    placeholder: Option<Placeholder>,
    exporting: Arc<AtomicBool>,
    preview: Option<PreviewDriver>,
}

impl Session {
    /// Create a session without a preview driver (headless / tests).
    pub fn new(project: Project) -> Self {
        Self {
            project,
            timeline_duration: Duration::from_seconds(10.0),
            selected_block_id: None,
            overlap: OverlapSignal::new(),
            drag: None,
            placeholder: None,
            exporting: Arc::new(AtomicBool::new(false)),
            preview: None,
        }
    }

    /// Create a session that republishes a preview after each mutation.
    pub fn with_preview(project: Project, driver: PreviewDriver) -> Self {
        let mut session = Self::new(project);
        session.preview = Some(driver);
        session.touch();
        session
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn timeline_duration(&self) -> Duration {
        self.timeline_duration
    }

    pub fn set_timeline_duration(&mut self, duration: Duration) -> LoopsceneResult<()> {
        if duration.as_seconds() <= 0.0 {
            return Err(LoopsceneError::validation(
                "timeline duration must be positive",
            ));
        }
        self.timeline_duration = duration;
        Ok(())
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.selected_block_id.as_deref()
    }

    /// Whether the transient overlap signal is currently showing.
    pub fn overlap_active(&self) -> bool {
        self.overlap.is_active()
    }

    /// The live drag placeholder, if a drag is over the timeline.
    pub fn placeholder(&self) -> Option<Placeholder> {
        self.placeholder
    }

    /// Whether an export request is outstanding.
    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::SeqCst)
    }

    fn touch(&mut self) {
        if let Some(driver) = &self.preview {
            driver.schedule(self.project.clone());
        }
    }

    // ---- project file ----------------------------------------------------

    /// Atomically replace the project from a project-file text. On any
    /// parse or validation error the live project is left untouched.
    pub fn load_project(&mut self, text: &str) -> LoopsceneResult<()> {
        let project = file::from_json_str(text)?;
        self.project = project;
        self.selected_block_id = None;
        self.drag = None;
        self.placeholder = None;
        tracing::info!(images = self.project.images.len(), "project loaded");
        self.touch();
        Ok(())
    }

    pub fn save_project(&self) -> LoopsceneResult<String> {
        file::to_json_string(&self.project)
    }

    // ---- images ----------------------------------------------------------

    /// Append a decoded upload batch; the first upload into an empty
    /// selection becomes the selected image.
    pub fn append_images(&mut self, batch: Vec<Image>) -> LoopsceneResult<()> {
        let first_id = batch.first().map(|img| img.id.clone());
        self.project.append_images(batch)?;
        if self.project.selected_image_id.is_none() {
            self.project.select_image(first_id.as_deref());
        }
        self.touch();
        Ok(())
    }

    pub fn select_image(&mut self, id: &str) {
        self.project.select_image(Some(id));
        self.selected_block_id = None;
        self.touch();
    }

    pub fn delete_image(&mut self, id: &str) -> LoopsceneResult<()> {
        let removed = self
            .project
            .remove_image(id)
            .ok_or_else(|| LoopsceneError::validation(format!("unknown image: {}", id)))?;
        if let Some(block_id) = &self.selected_block_id {
            if removed.block(block_id).is_some() {
                self.selected_block_id = None;
            }
        }
        self.touch();
        Ok(())
    }

    pub fn reorder_images(&mut self, from: &str, to: &str) {
        self.project.reorder_image(from, to);
        self.touch();
    }

    pub fn set_base_opacity(&mut self, id: &str, value: f64) -> LoopsceneResult<()> {
        if !(0.0..=1.0).contains(&value) {
            return Err(LoopsceneError::validation(format!(
                "base opacity {} outside [0, 1]",
                value
            )));
        }
        let image = self
            .project
            .image_mut(id)
            .ok_or_else(|| LoopsceneError::validation(format!("unknown image: {}", id)))?;
        image.base_opacity = value;
        self.touch();
        Ok(())
    }

    pub fn set_blend_mode(&mut self, id: &str, mode: BlendMode) -> LoopsceneResult<()> {
        let image = self
            .project
            .image_mut(id)
            .ok_or_else(|| LoopsceneError::validation(format!("unknown image: {}", id)))?;
        image.blend_mode = mode;
        self.touch();
        Ok(())
    }

    /// Edit one source dimension; the other follows to preserve the
    /// image's aspect ratio. Invalid values leave the model unchanged.
    pub fn resize_image(
        &mut self,
        id: &str,
        dimension: ImageDimension,
        value: u32,
    ) -> LoopsceneResult<()> {
        if value == 0 {
            return Err(LoopsceneError::validation(
                "image dimensions must be positive",
            ));
        }
        let image = self
            .project
            .image_mut(id)
            .ok_or_else(|| LoopsceneError::validation(format!("unknown image: {}", id)))?;
        let (w, h) = (image.source_width as f64, image.source_height as f64);
        match dimension {
            ImageDimension::Width => {
                image.source_width = value;
                image.source_height = ((h / w) * value as f64).round().max(1.0) as u32;
            }
            ImageDimension::Height => {
                image.source_height = value;
                image.source_width = ((w / h) * value as f64).round().max(1.0) as u32;
            }
        }
        self.touch();
        Ok(())
    }

    // ---- animation blocks ------------------------------------------------

    /// Add an effect to the selected image at the default `[0s, 2s)`
    /// placement, on the first row that leaves it free (row 0 fallback).
    pub fn add_effect(&mut self, kind: EffectKind) -> LoopsceneResult<String> {
        let selected = self
            .project
            .selected_image_id
            .clone()
            .ok_or_else(|| LoopsceneError::validation("no image selected"))?;
        let image = self
            .project
            .image_mut(&selected)
            .ok_or_else(|| LoopsceneError::validation(format!("unknown image: {}", selected)))?;

        let mut block = AnimationBlock::with_defaults(kind);
        block.row_index = default_row(image);
        let id = block.id.clone();
        image.animation_blocks.push(block);
        self.selected_block_id = Some(id.clone());
        self.touch();
        Ok(id)
    }

    pub fn delete_block(&mut self, id: &str) -> LoopsceneResult<()> {
        self.project
            .remove_block(id)
            .ok_or_else(|| LoopsceneError::validation(format!("unknown block: {}", id)))?;
        if self.selected_block_id.as_deref() == Some(id) {
            self.selected_block_id = None;
        }
        self.touch();
        Ok(())
    }

    /// Select a block, which also selects its owning image.
    pub fn select_block(&mut self, id: &str) -> LoopsceneResult<()> {
        let owner = self
            .project
            .find_block(id)
            .map(|(image, _)| image.id.clone())
            .ok_or_else(|| LoopsceneError::validation(format!("unknown block: {}", id)))?;
        self.project.select_image(Some(&owner));
        self.selected_block_id = Some(id.to_string());
        self.touch();
        Ok(())
    }

    // ---- drag / drop -----------------------------------------------------

    /// Capture drag state: the grab offset from the block's left edge is
    /// recorded once and held constant for the drag's duration.
    pub fn begin_drag(&mut self, block_id: &str, grab_offset: f64) -> LoopsceneResult<()> {
        let (_, block) = self
            .project
            .find_block(block_id)
            .ok_or_else(|| LoopsceneError::validation(format!("unknown block: {}", block_id)))?;
        self.drag = Some(DragContext {
            block_id: block_id.to_string(),
            grab_offset,
            block_duration: block.duration,
        });
        Ok(())
    }

    /// Drag-over: update and return the live placeholder, computed with the
    /// identical formula a drop would use.
    pub fn drag_over(
        &mut self,
        pointer: Point2D,
        geometry: &TimelineGeometry,
    ) -> Option<Placeholder> {
        let drag = self.drag.as_ref()?;
        let placement = compute_placement(pointer, geometry, drag);
        let placeholder = Placeholder::for_placement(&placement, drag.block_duration, geometry);
        self.placeholder = Some(placeholder);
        Some(placeholder)
    }

    /// Hide the placeholder once the pointer leaves the strip.
    pub fn drag_leave(&mut self, pointer: Point2D, geometry: &TimelineGeometry) {
        if !geometry.contains(pointer.x, pointer.y) {
            self.placeholder = None;
        }
    }

    /// Abandon a drag without dropping.
    pub fn drag_end(&mut self) {
        self.drag = None;
        self.placeholder = None;
    }

    /// Drop the dragged block. On acceptance the block's placement commits
    /// and it becomes selected; on rejection the transient overlap signal
    /// raises and the model is untouched. Drag state clears either way.
    pub fn drop_block(
        &mut self,
        pointer: Point2D,
        geometry: &TimelineGeometry,
    ) -> LoopsceneResult<()> {
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        self.placeholder = None;

        let placement = compute_placement(pointer, geometry, &drag);
        let image = self
            .project
            .image_for_block_mut(&drag.block_id)
            .ok_or_else(|| {
                LoopsceneError::placement(format!("unknown block: {}", drag.block_id))
            })?;

        match commit_drop(image, &drag.block_id, &placement) {
            Ok(()) => {
                self.overlap.clear();
                self.select_block(&drag.block_id)?;
                Ok(())
            }
            Err(e) => {
                self.overlap.raise();
                Err(e)
            }
        }
    }

    // ---- export ----------------------------------------------------------

    /// Claim the single export slot. Fails while another export is
    /// outstanding; the returned guard clears the flag on drop.
    pub fn try_begin_export(&self) -> LoopsceneResult<ExportGuard> {
        if self
            .exporting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(LoopsceneError::export(
                "busy",
                "an export is already in progress",
            ));
        }
        Ok(ExportGuard {
            flag: Arc::clone(&self.exporting),
        })
    }

    /// Compile the project at canvas resolution and hand it to the render
    /// collaborator. Failures surface the collaborator's diagnostic and
    /// never touch the project; the busy flag clears on every path.
    pub fn export(&self, format: ExportFormat, client: &RenderClient) -> LoopsceneResult<Vec<u8>> {
        let _guard = self.try_begin_export()?;
        let svg = compose(&self.project, RenderSize::of_canvas(&self.project))?;
        client.render(&svg, self.timeline_duration, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopscene_ir::EffectParams;

    fn png_image(name: &str) -> Image {
        Image::new(name, "data:image/png;base64,AAAA", 400, 200)
    }

    fn session_with_image() -> Session {
        let mut session = Session::new(Project::new(600, 600));
        session.append_images(vec![png_image("a.png")]).unwrap();
        session
    }

    fn geometry() -> TimelineGeometry {
        TimelineGeometry::new(0.0, 0.0, 1000.0, 90.0, Duration::from_seconds(10.0))
    }

    #[test]
    fn test_first_upload_becomes_selected() {
        let session = session_with_image();
        assert!(session.project().selected_image_id.is_some());
    }

    #[test]
    fn test_add_effect_cascades_rows_then_falls_back() {
        let mut session = session_with_image();
        let a = session.add_effect(EffectKind::Pan).unwrap();
        let b = session.add_effect(EffectKind::Zoom).unwrap();
        let c = session.add_effect(EffectKind::Rotate).unwrap();
        let d = session.add_effect(EffectKind::Opacity).unwrap();
        let image = session.project().selected_image().unwrap();
        assert_eq!(image.block(&a).unwrap().row_index, 0);
        assert_eq!(image.block(&b).unwrap().row_index, 1);
        assert_eq!(image.block(&c).unwrap().row_index, 2);
        // All rows conflict with [0s, 2s): lenient fallback to row 0.
        assert_eq!(image.block(&d).unwrap().row_index, 0);
        assert_eq!(session.selected_block_id(), Some(d.as_str()));
    }

    #[test]
    fn test_add_effect_requires_selection() {
        let mut session = Session::new(Project::new(600, 600));
        assert!(session.add_effect(EffectKind::Pan).is_err());
    }

    #[test]
    fn test_drop_rejection_raises_signal_and_leaves_model() {
        let mut session = session_with_image();
        let first = session.add_effect(EffectKind::Pan).unwrap();
        let second = session.add_effect(EffectKind::Zoom).unwrap();
        // Move the second block (row 1) onto the first's interval on row 0.
        session.begin_drag(&second, 0.0).unwrap();
        // Pointer at 100px = 1.0s, top third -> row 0: overlaps [0, 2).
        let err = session.drop_block(Point2D::new(100.0, 10.0), &geometry());
        assert!(err.is_err());
        assert!(session.overlap_active());

        let image = session.project().images.first().unwrap();
        let block = image.block(&second).unwrap();
        assert_eq!(block.row_index, 1);
        assert!(block.start_time.as_seconds().abs() < 1e-9);
        let untouched = image.block(&first).unwrap();
        assert!(untouched.start_time.as_seconds().abs() < 1e-9);

        // Drag state cleared unconditionally: a second drop is a no-op.
        assert!(session.drop_block(Point2D::new(100.0, 10.0), &geometry()).is_ok());
    }

    #[test]
    fn test_drop_at_touching_boundary_commits_and_selects() {
        let mut session = session_with_image();
        let _first = session.add_effect(EffectKind::Pan).unwrap();
        let second = session.add_effect(EffectKind::Zoom).unwrap();
        session.begin_drag(&second, 0.0).unwrap();
        // Pointer at 200px = 2.0s exactly, row 0: touches [0, 2) but no overlap.
        session
            .drop_block(Point2D::new(200.0, 10.0), &geometry())
            .unwrap();
        assert!(!session.overlap_active());
        let image = session.project().images.first().unwrap();
        let block = image.block(&second).unwrap();
        assert_eq!(block.row_index, 0);
        assert!((block.start_time.as_seconds() - 2.0).abs() < 1e-9);
        assert_eq!(session.selected_block_id(), Some(second.as_str()));
    }

    #[test]
    fn test_drag_over_placeholder_matches_drop_formula() {
        let mut session = session_with_image();
        let block = session.add_effect(EffectKind::Pan).unwrap();
        session.begin_drag(&block, 0.0).unwrap();
        let ph = session
            .drag_over(Point2D::new(312.0, 45.0), &geometry())
            .unwrap();
        // 3.1s of 10s, row 1.
        assert!((ph.left_frac - 0.31).abs() < 1e-9);
        assert!((ph.top_px - 30.0).abs() < 1e-9);

        session.drag_leave(Point2D::new(-5.0, 45.0), &geometry());
        assert!(session.placeholder().is_none());
    }

    #[test]
    fn test_load_error_leaves_project_untouched() {
        let mut session = session_with_image();
        let before = session.project().clone();
        assert!(session.load_project("{\"images\": 3}").is_err());
        assert_eq!(*session.project(), before);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut session = session_with_image();
        session.add_effect(EffectKind::Rotate).unwrap();
        let saved = session.save_project().unwrap();

        let mut other = Session::new(Project::new(10, 10));
        other.load_project(&saved).unwrap();
        assert_eq!(*other.project(), *session.project());
    }

    #[test]
    fn test_delete_image_clears_owned_block_selection() {
        let mut session = session_with_image();
        let block = session.add_effect(EffectKind::Pan).unwrap();
        assert_eq!(session.selected_block_id(), Some(block.as_str()));
        let id = session.project().images.first().unwrap().id.clone();
        session.delete_image(&id).unwrap();
        assert!(session.selected_block_id().is_none());
        assert!(session.project().images.is_empty());
    }

    #[test]
    fn test_resize_preserves_aspect() {
        let mut session = session_with_image();
        let id = session.project().images.first().unwrap().id.clone();
        session
            .resize_image(&id, ImageDimension::Width, 200)
            .unwrap();
        let image = session.project().image(&id).unwrap();
        assert_eq!(image.source_width, 200);
        assert_eq!(image.source_height, 100);

        assert!(session.resize_image(&id, ImageDimension::Width, 0).is_err());
    }

    #[test]
    fn test_opacity_edit_validation() {
        let mut session = session_with_image();
        let id = session.project().images.first().unwrap().id.clone();
        assert!(session.set_base_opacity(&id, 1.5).is_err());
        let image = session.project().image(&id).unwrap();
        assert!((image.base_opacity - 1.0).abs() < 1e-9);
        session.set_base_opacity(&id, 0.5).unwrap();
    }

    #[test]
    fn test_export_busy_flag_is_exclusive_and_self_clearing() {
        let session = session_with_image();
        assert!(!session.is_exporting());
        let guard = session.try_begin_export().unwrap();
        assert!(session.is_exporting());
        assert!(session.try_begin_export().is_err());
        drop(guard);
        assert!(!session.is_exporting());
        assert!(session.try_begin_export().is_ok());
    }

    #[test]
    fn test_block_params_survive_session_mutations() {
        let mut session = session_with_image();
        let id = session.add_effect(EffectKind::Zoom).unwrap();
        let (_, block) = session.project().find_block(&id).unwrap();
        assert!(matches!(
            block.params,
            EffectParams::Zoom { use_center: true, .. }
        ));
    }
}
