use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loopscene_core::{Duration, PanDirection};

/// Number of parallel timeline rows available per image.
pub const ROW_COUNT: u8 = 3;

/// The kind of effect an animation block applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Pan,
    Zoom,
    Rotate,
    Opacity,
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectKind::Pan => write!(f, "pan"),
            EffectKind::Zoom => write!(f, "zoom"),
            EffectKind::Rotate => write!(f, "rotate"),
            EffectKind::Opacity => write!(f, "opacity"),
        }
    }
}

/// Type-specific effect parameters — a tagged sum type so the compositor
/// gets compile-time exhaustiveness when it switches on the effect kind.
///
/// Serializes as `"type": "pan", "parameters": { ... }` inside the block,
/// matching the project-file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "parameters",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum EffectParams {
    Pan {
        direction: PanDirection,
        /// Pan distance in source-image pixels.
        distance: f64,
        auto_reverse: bool,
    },
    Zoom {
        start_scale: f64,
        end_scale: f64,
        auto_reverse: bool,
        use_center: bool,
        /// Pivot in source-image pixels; ignored when `use_center` is set.
        pivot_x: f64,
        pivot_y: f64,
    },
    Rotate {
        degrees: f64,
        auto_reverse: bool,
        use_center: bool,
        pivot_x: f64,
        pivot_y: f64,
    },
    Opacity {
        start_opacity: f64,
        end_opacity: f64,
        auto_reverse: bool,
    },
}

impl EffectParams {
    /// The default parameter set for a freshly created block of `kind`.
    pub fn defaults(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Pan => EffectParams::Pan {
                direction: PanDirection::Right,
                distance: 100.0,
                auto_reverse: true,
            },
            EffectKind::Zoom => EffectParams::Zoom {
                start_scale: 1.0,
                end_scale: 1.5,
                auto_reverse: true,
                use_center: true,
                pivot_x: 0.0,
                pivot_y: 0.0,
            },
            EffectKind::Rotate => EffectParams::Rotate {
                degrees: 90.0,
                auto_reverse: false,
                use_center: true,
                pivot_x: 0.0,
                pivot_y: 0.0,
            },
            EffectKind::Opacity => EffectParams::Opacity {
                start_opacity: 1.0,
                end_opacity: 0.0,
                auto_reverse: true,
            },
        }
    }

    /// The kind this parameter set belongs to.
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectParams::Pan { .. } => EffectKind::Pan,
            EffectParams::Zoom { .. } => EffectKind::Zoom,
            EffectParams::Rotate { .. } => EffectKind::Rotate,
            EffectParams::Opacity { .. } => EffectKind::Opacity,
        }
    }
}

/// A single timed effect attached to one image on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationBlock {
    /// Unique block identifier.
    pub id: String,
    /// Offset of the block's left edge on the timeline.
    pub start_time: Duration,
    /// Length of the block. Must be positive.
    pub duration: Duration,
    /// Whether the effect repeats indefinitely or plays once.
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    /// Display row on the 3-row timeline, in `0..ROW_COUNT`.
    pub row_index: u8,
    /// Type-specific parameters.
    #[serde(flatten)]
    pub params: EffectParams,
}

impl AnimationBlock {
    /// Create a block with the default placement (`[0s, 2s)`, looping) and
    /// the default parameters for `kind`. Row assignment is the timeline
    /// engine's job; this starts at row 0.
    pub fn with_defaults(kind: EffectKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start_time: Duration::zero(),
            duration: Duration::from_seconds(2.0),
            loop_playback: true,
            row_index: 0,
            params: EffectParams::defaults(kind),
        }
    }

    /// The block's end time (`start + duration`), half-open.
    pub fn end_time(&self) -> Duration {
        self.start_time + self.duration
    }

    pub fn kind(&self) -> EffectKind {
        self.params.kind()
    }
}
