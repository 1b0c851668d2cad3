//! End-to-end compositor scenarios over realistic projects.

use loopscene_compose::{compose, RenderSize};
use loopscene_core::{Duration, PanDirection};
use loopscene_ir::{file, AnimationBlock, EffectKind, EffectParams, Image, Project};

fn pan_project() -> Project {
    // 600x600 canvas, one 400x200 image, pan right 100px auto-reversing.
    let mut project = Project::new(600, 600);
    let mut image = Image::new("hero.png", "data:image/png;base64,AAAA", 400, 200);
    let mut block = AnimationBlock::with_defaults(EffectKind::Pan);
    block.params = EffectParams::Pan {
        direction: PanDirection::Right,
        distance: 100.0,
        auto_reverse: true,
    };
    block.start_time = Duration::zero();
    block.duration = Duration::from_seconds(2.0);
    block.loop_playback = true;
    image.animation_blocks.push(block);
    project.append_images(vec![image]).unwrap();
    project
}

#[test]
fn pan_distance_scales_with_image_fit() {
    // fit scale = min(600/400, 600/200) = 1.5, so 100px of pan becomes 150.
    let svg = compose(&pan_project(), RenderSize::new(600, 600)).unwrap();
    assert!(svg.contains("type=\"translate\""));
    assert!(svg.contains("additive=\"sum\""));
    assert!(svg.contains("values=\"0 0; 150 0; 0 0\" keyTimes=\"0; 0.5; 1\""));
    assert!(svg.contains("begin=\"0s\" dur=\"2s\" repeatCount=\"indefinite\""));
}

#[test]
fn opacity_parameters_are_never_pixel_scaled() {
    let mut project = pan_project();
    let mut block = AnimationBlock::with_defaults(EffectKind::Opacity);
    block.params = EffectParams::Opacity {
        start_opacity: 1.0,
        end_opacity: 0.0,
        auto_reverse: true,
    };
    project.images[0].animation_blocks.push(block);
    let svg = compose(&project, RenderSize::new(1200, 1200)).unwrap();
    // Doubling the render resolution doubles pan amplitude but leaves
    // opacity keyframes untouched.
    assert!(svg.contains("values=\"0 0; 300 0; 0 0\""));
    assert!(svg.contains("values=\"1; 0; 1\""));
}

#[test]
fn compile_is_idempotent() {
    let project = pan_project();
    let size = RenderSize::new(600, 600);
    let first = compose(&project, size).unwrap();
    let second = compose(&project, size).unwrap();
    assert_eq!(first, second);
}

#[test]
fn save_load_compile_matches_direct_compile() {
    let project = pan_project();
    let json = file::to_json_string(&project).unwrap();
    let loaded = file::from_json_str(&json).unwrap();
    let size = RenderSize::new(600, 600);
    assert_eq!(
        compose(&project, size).unwrap(),
        compose(&loaded, size).unwrap()
    );
}

#[test]
fn every_image_gets_its_own_clipped_layer_group() {
    let mut project = pan_project();
    project
        .append_images(vec![Image::new(
            "overlay.png",
            "data:image/png;base64,BBBB",
            600,
            600,
        )])
        .unwrap();
    let svg = compose(&project, RenderSize::new(600, 600)).unwrap();
    assert_eq!(svg.matches("<image ").count(), 2);
    assert!(svg.contains("clip-path=\"url(#canvas-clip)\""));
    assert!(svg.ends_with("</g></svg>"));
}
