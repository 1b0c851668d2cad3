use loopscene_core::{math, LoopsceneError, LoopsceneResult, Point2D, Size2D};
use loopscene_ir::{AnimationBlock, EffectParams, Image, Project};

use crate::svg::{escape_attr, fmt_num};

/// Requested output resolution for a composition pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSize {
    pub width: u32,
    pub height: u32,
}

impl RenderSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Render at the project's own canvas size.
    pub fn of_canvas(project: &Project) -> Self {
        Self {
            width: project.canvas_width,
            height: project.canvas_height,
        }
    }

    fn as_size2d(&self) -> Size2D {
        Size2D::new(self.width as f64, self.height as f64)
    }
}

/// Compile a project into a self-contained animated SVG document.
///
/// Pure and deterministic: the same project and resolution always produce
/// byte-identical output. Images are emitted in descending paint-order rank,
/// so the lowest rank is written last and paints on top. Blocks are emitted
/// in their natural collection order — additive transforms stack in emission
/// order, which makes that order part of the contract.
pub fn compose(project: &Project, size: RenderSize) -> LoopsceneResult<String> {
    if size.width == 0 || size.height == 0 {
        return Err(LoopsceneError::Compose(
            "render resolution must be positive".into(),
        ));
    }

    let render = size.as_size2d();
    let mut out = String::new();
    out.push_str(&format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\" \
         xmlns:xlink=\"http://www.w3.org/1999/xlink\">",
        size.width, size.height
    ));
    out.push_str(&format!(
        "<defs><clipPath id=\"canvas-clip\"><rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" />\
         </clipPath></defs>",
        size.width, size.height
    ));
    out.push_str("<g clip-path=\"url(#canvas-clip)\">");

    let mut images = project.sorted_images();
    images.reverse();
    for image in images {
        emit_image(&mut out, image, render);
    }

    out.push_str("</g></svg>");
    tracing::debug!(
        images = project.images.len(),
        width = size.width,
        height = size.height,
        bytes = out.len(),
        "composed document"
    );
    Ok(out)
}

fn emit_image(out: &mut String, image: &Image, render: Size2D) {
    // Uniform fit scale; the same factor converts every positional effect
    // parameter from source-image pixels, so motion amplitude tracks what
    // the user saw regardless of render resolution.
    let scale = math::fit_scale(image.source_size(), render);
    let offset = math::centered_offset(image.source_size(), render, scale);
    let center = render.center();

    out.push_str("<g");
    if (image.base_opacity - 1.0).abs() > f64::EPSILON {
        out.push_str(&format!(" opacity=\"{}\"", fmt_num(image.base_opacity)));
    }
    if image.blend_mode != loopscene_core::BlendMode::Normal {
        out.push_str(&format!(
            " style=\"mix-blend-mode: {}\"",
            image.blend_mode.css_name()
        ));
    }
    out.push('>');

    for block in &image.animation_blocks {
        emit_block(out, block, scale, center, image.base_opacity);
    }

    out.push_str(&format!(
        "<image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" />",
        escape_attr(&image.pixel_data),
        fmt_num(offset.x),
        fmt_num(offset.y),
        fmt_num(image.source_width as f64 * scale),
        fmt_num(image.source_height as f64 * scale),
    ));
    out.push_str("</g>");
}

/// Timing attributes shared by every primitive of a block.
fn timing_attrs(block: &AnimationBlock) -> String {
    let repeat = if block.loop_playback { "indefinite" } else { "1" };
    format!(
        "begin=\"{}s\" dur=\"{}s\" repeatCount=\"{}\"",
        fmt_num(block.start_time.as_seconds()),
        fmt_num(block.duration.as_seconds()),
        repeat
    )
}

/// Value attributes for a from→to animation, or the three-keyframe
/// out-and-back triad when auto-reverse is set.
fn value_attrs(from: &str, to: &str, auto_reverse: bool) -> String {
    if auto_reverse {
        format!("values=\"{from}; {to}; {from}\" keyTimes=\"0; 0.5; 1\"")
    } else {
        format!("from=\"{from}\" to=\"{to}\"")
    }
}

fn emit_block(
    out: &mut String,
    block: &AnimationBlock,
    scale: f64,
    center: Point2D,
    base_opacity: f64,
) {
    let timing = timing_attrs(block);
    match &block.params {
        EffectParams::Pan {
            direction,
            distance,
            auto_reverse,
        } => {
            let target = direction.unit_vector().scaled(distance * scale);
            let to = format!("{} {}", fmt_num(target.x), fmt_num(target.y));
            out.push_str(&format!(
                "<animateTransform attributeName=\"transform\" type=\"translate\" \
                 additive=\"sum\" {} {} />",
                timing,
                value_attrs("0 0", &to, *auto_reverse)
            ));
        }
        EffectParams::Zoom {
            start_scale,
            end_scale,
            auto_reverse,
            use_center,
            pivot_x,
            pivot_y,
        } => {
            let pivot = if *use_center {
                center
            } else {
                Point2D::new(pivot_x * scale, pivot_y * scale)
            };
            out.push_str(&format!(
                "<animateTransform attributeName=\"transform\" type=\"scale\" \
                 additive=\"sum\" {} {} />",
                timing,
                value_attrs(&fmt_num(*start_scale), &fmt_num(*end_scale), *auto_reverse)
            ));
            // Paired compensation so the zoom appears anchored at the pivot:
            // translate(t) = pivot * (1 - scaleFactor(t)).
            let from_t = format!(
                "{} {}",
                fmt_num(pivot.x * (1.0 - start_scale)),
                fmt_num(pivot.y * (1.0 - start_scale))
            );
            let to_t = format!(
                "{} {}",
                fmt_num(pivot.x * (1.0 - end_scale)),
                fmt_num(pivot.y * (1.0 - end_scale))
            );
            out.push_str(&format!(
                "<animateTransform attributeName=\"transform\" type=\"translate\" \
                 additive=\"sum\" {} {} />",
                timing,
                value_attrs(&from_t, &to_t, *auto_reverse)
            ));
        }
        EffectParams::Rotate {
            degrees,
            auto_reverse,
            use_center,
            pivot_x,
            pivot_y,
        } => {
            let pivot = if *use_center {
                center
            } else {
                Point2D::new(pivot_x * scale, pivot_y * scale)
            };
            let cx = fmt_num(pivot.x);
            let cy = fmt_num(pivot.y);
            let from = format!("0 {cx} {cy}");
            let to = format!("{} {cx} {cy}", fmt_num(*degrees));
            out.push_str(&format!(
                "<animateTransform attributeName=\"transform\" type=\"rotate\" \
                 additive=\"sum\" {} {} />",
                timing,
                value_attrs(&from, &to, *auto_reverse)
            ));
        }
        EffectParams::Opacity {
            start_opacity,
            end_opacity,
            auto_reverse,
        } => {
            // Opacity values scale with the image's base opacity, never with
            // pixels. fill="freeze" holds the final value after a single run.
            let from = fmt_num(start_opacity * base_opacity);
            let to = fmt_num(end_opacity * base_opacity);
            out.push_str(&format!(
                "<animate attributeName=\"opacity\" fill=\"freeze\" {} {} />",
                timing,
                value_attrs(&from, &to, *auto_reverse)
            ));
        }
    }
}
