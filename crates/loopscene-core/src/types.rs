use serde::{Deserialize, Serialize};

use crate::math::Point2D;

/// Compositing blend mode for an image layer.
///
/// Serialized in lowercase to match the project-file format
/// (`"blendMode": "multiply"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Standard alpha blending (Porter-Duff "over").
    Normal,
    Multiply,
    Screen,
    Overlay,
}

impl Default for BlendMode {
    fn default() -> Self {
        BlendMode::Normal
    }
}

impl BlendMode {
    /// The CSS `mix-blend-mode` keyword for this mode.
    pub fn css_name(&self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
        }
    }
}

impl std::fmt::Display for BlendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.css_name())
    }
}

/// Direction of a pan effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    /// Unit vector in screen coordinates (y grows downward).
    pub fn unit_vector(&self) -> Point2D {
        match self {
            PanDirection::Up => Point2D::new(0.0, -1.0),
            PanDirection::Down => Point2D::new(0.0, 1.0),
            PanDirection::Left => Point2D::new(-1.0, 0.0),
            PanDirection::Right => Point2D::new(1.0, 0.0),
        }
    }
}
