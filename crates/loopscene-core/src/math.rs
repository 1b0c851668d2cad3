use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Scale both components by a uniform factor.
    pub fn scaled(&self, factor: f64) -> Point2D {
        Point2D {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::zero()
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

impl Size2D {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Center point of a rectangle of this size anchored at the origin.
    pub fn center(&self) -> Point2D {
        Point2D::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Uniform scale factor that fits `source` inside `target` while preserving
/// aspect ratio: `min(target.w / source.w, target.h / source.h)`.
pub fn fit_scale(source: Size2D, target: Size2D) -> f64 {
    if source.width <= 0.0 || source.height <= 0.0 {
        return 0.0;
    }
    (target.width / source.width).min(target.height / source.height)
}

/// Top-left offset that centers a `source`-sized rectangle, scaled by
/// `scale`, inside `target`.
pub fn centered_offset(source: Size2D, target: Size2D, scale: f64) -> Point2D {
    Point2D::new(
        (target.width - source.width * scale) / 2.0,
        (target.height - source.height * scale) / 2.0,
    )
}
