use loopscene_core::Duration;
use loopscene_ir::ROW_COUNT;

/// On-screen geometry of the timeline strip, captured by the embedding UI.
///
/// Horizontal pixels map linearly onto `[0, duration]`; the vertical extent
/// is split evenly into [`ROW_COUNT`] rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGeometry {
    /// Left edge of the strip in viewport pixels.
    pub left: f64,
    /// Top edge of the strip in viewport pixels.
    pub top: f64,
    /// Width of the strip in pixels.
    pub width: f64,
    /// Height of the strip in pixels.
    pub height: f64,
    /// Total timeline duration the strip represents.
    pub duration: Duration,
}

impl TimelineGeometry {
    pub fn new(left: f64, top: f64, width: f64, height: f64, duration: Duration) -> Self {
        Self {
            left,
            top,
            width,
            height,
            duration,
        }
    }

    /// Height of one display row.
    pub fn row_height(&self) -> f64 {
        self.height / ROW_COUNT as f64
    }

    /// Whether a viewport point lies inside the strip. Used to detect
    /// drag-leave, where the placeholder must be hidden.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.left && x < self.left + self.width && y > self.top && y < self.top + self.height
    }
}
