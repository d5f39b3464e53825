//! End-to-end tests of batch icon generation
//!
//! Every test writes into its own temporary directory.

use std::sync::Arc;

use approx::assert_relative_eq;
use icon_engine::animation::{AnimationClip, AnimationSelection, AnimationTrack, Channel, Keyframe};
use icon_engine::foundation::math::{Transform, Vec3};
use icon_engine::pipeline::{
    render_icon, BatchObserver, BatchProgress, IconBatchPipeline, ItemErrorKind, ItemOutcome, ItemState,
    NullObserver,
};
use icon_engine::render::{Material, Mesh, PixelBuffer, RenderContext, RenderError, RenderSettings, Vertex};
use icon_engine::scene::{IconAsset, MeshRenderer, SceneObject};

fn box_asset(name: &str, half_extents: Vec3, color: (f32, f32, f32)) -> IconAsset {
    IconAsset::from_prototype(SceneObject::with_mesh(
        name,
        Arc::new(Mesh::cuboid(half_extents)),
        Material::new().with_color(color.0, color.1, color.2),
    ))
}

fn lamp_post() -> IconAsset {
    let mut object = SceneObject::with_mesh(
        "LampPost",
        Arc::new(Mesh::cuboid(Vec3::new(0.1, 1.5, 0.1))),
        Material::new().with_color(0.3, 0.3, 0.3),
    );
    let lamp = object
        .add_child(object.root_id(), "Lamp", Transform::from_position(Vec3::new(0.0, 1.6, 0.0)))
        .unwrap();
    object.node_mut(lamp).unwrap().renderer = Some(MeshRenderer::new(
        Arc::new(Mesh::cuboid(Vec3::new(0.3, 0.2, 0.3))),
        Material::new().with_color(1.0, 0.9, 0.4),
    ));
    IconAsset::from_prototype(object)
}

fn malformed_asset(name: &str) -> IconAsset {
    let mesh = Mesh::new(
        vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ],
        vec![0, 1, 7],
    );
    IconAsset::from_prototype(SceneObject::with_mesh(name, Arc::new(mesh), Material::new()))
}

fn standard_settings() -> RenderSettings {
    RenderSettings {
        resolution: 256,
        camera_rotation_degrees: Vec3::new(30.0, -135.0, 0.0),
        camera_position_offset: Vec3::zeros(),
        padding: 0.1,
    }
}

#[test]
fn three_assets_produce_three_rgba_icons() {
    let dir = tempfile::tempdir().unwrap();
    let assets = vec![
        box_asset("Crate", Vec3::new(0.5, 0.5, 0.5), (0.8, 0.6, 0.3)),
        box_asset("Plank", Vec3::new(2.0, 0.1, 0.3), (0.6, 0.4, 0.2)),
        lamp_post(),
    ];
    let pipeline = IconBatchPipeline::new(standard_settings(), AnimationSelection::none(), dir.path());
    let mut ctx = RenderContext::new();

    let report = pipeline.run_batch(&mut ctx, &assets, &mut NullObserver).unwrap();

    assert_eq!(report.attempted(), 3);
    assert_eq!(report.succeeded(), 3);
    assert!(!report.cancelled);
    for name in ["Crate", "Plank", "LampPost"] {
        let path = dir.path().join(format!("{name}.png"));
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgba8);
        assert_eq!((decoded.width(), decoded.height()), (256, 256));

        let icon = PixelBuffer::load_png(&path).unwrap();
        assert!(icon.coverage() > 0, "{name} rendered nothing");
        assert_eq!(icon.pixel(0, 255), Some([0, 0, 0, 0]), "{name} background not transparent");
    }
}

#[test]
fn malformed_asset_fails_alone() {
    let dir = tempfile::tempdir().unwrap();
    let assets = vec![
        box_asset("A", Vec3::repeat(0.5), (1.0, 0.0, 0.0)),
        box_asset("B", Vec3::repeat(0.5), (0.0, 1.0, 0.0)),
        malformed_asset("Broken"),
        box_asset("D", Vec3::repeat(0.5), (0.0, 0.0, 1.0)),
    ];
    let pipeline = IconBatchPipeline::new(RenderSettings::with_resolution(64), AnimationSelection::none(), dir.path());
    let mut ctx = RenderContext::new();
    let before = ctx.stats();

    let report = pipeline.run_batch(&mut ctx, &assets, &mut NullObserver).unwrap();

    let names: Vec<&str> = report.outcomes.iter().map(|o| o.asset_name.as_str()).collect();
    assert_eq!(names, ["A", "B", "Broken", "D"]);
    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.failed(), 1);

    let failure = report.outcomes[2].result.as_ref().unwrap_err();
    assert_eq!(failure.stage, ItemState::Framed);
    assert!(matches!(failure.kind, ItemErrorKind::Render(RenderError::MalformedMesh { .. })));
    assert!(!dir.path().join("Broken.png").exists());
    assert!(dir.path().join("D.png").exists());

    let after = ctx.stats();
    assert_eq!(after.live_instances, before.live_instances);
    assert_eq!(after.targets.live_targets, before.targets.live_targets);
    assert_eq!(after.total_instances_created, after.total_instances_destroyed);
    assert_eq!(after.targets.total_leases, after.targets.total_releases);
}

#[test]
fn animation_is_sampled_at_scaled_time() {
    let clip = Arc::new(
        AnimationClip::new("Grow", 2.0)
            .with_track(AnimationTrack::new(
                "",
                Channel::Translation(vec![
                    Keyframe::new(0.0, Vec3::zeros()),
                    Keyframe::new(2.0, Vec3::new(4.0, 0.0, 0.0)),
                ]),
            ))
            .with_track(AnimationTrack::new(
                "",
                Channel::Scale(vec![Keyframe::new(0.0, Vec3::repeat(1.0)), Keyframe::new(2.0, Vec3::repeat(3.0))]),
            )),
    );
    let selection = AnimationSelection::at(clip, 0.5);
    let settings = RenderSettings::with_resolution(64);
    let assets = vec![
        box_asset("Small", Vec3::repeat(0.5), (1.0, 1.0, 1.0)),
        box_asset("Wide", Vec3::new(1.0, 0.5, 0.5), (1.0, 1.0, 1.0)),
    ];

    let mut ctx = RenderContext::new();
    for asset in &assets {
        let mut warnings = Vec::new();
        let icon = render_icon(&mut ctx, asset, &settings, &selection, &mut warnings).unwrap();
        assert_eq!(icon.pose.sampled_time, Some(1.0));
        assert!(warnings.is_empty());
        assert_relative_eq!(icon.bounds.center, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-5);
    }

    let small = render_icon(&mut ctx, &assets[0], &settings, &selection, &mut Vec::new()).unwrap();
    assert_relative_eq!(small.bounds.size, Vec3::repeat(2.0), epsilon = 1e-5);

    // The batch poses the same way
    let dir = tempfile::tempdir().unwrap();
    let pipeline = IconBatchPipeline::new(settings, selection, dir.path());
    let report = pipeline.run_batch(&mut ctx, &assets[..1], &mut NullObserver).unwrap();
    assert_eq!(report.succeeded(), 1);
    let written = PixelBuffer::load_png(dir.path().join("Small.png")).unwrap();
    assert_eq!(written, small.pixels);
}

#[test]
fn cancellation_stops_at_item_boundary() {
    struct StopAfter {
        limit: usize,
        seen: Vec<usize>,
        finished: usize,
    }

    impl BatchObserver for StopAfter {
        fn on_item_started(&mut self, progress: BatchProgress<'_>) {
            assert_eq!(progress.total_count, 5);
            self.seen.push(progress.current_index);
        }

        fn should_cancel(&mut self) -> bool {
            self.seen.len() >= self.limit
        }

        fn on_item_finished(&mut self, _outcome: &ItemOutcome) {
            self.finished += 1;
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let assets: Vec<IconAsset> = (0..5)
        .map(|i| box_asset(&format!("Item{i}"), Vec3::repeat(0.5), (1.0, 1.0, 1.0)))
        .collect();
    let pipeline = IconBatchPipeline::new(RenderSettings::with_resolution(32), AnimationSelection::none(), dir.path());
    let mut ctx = RenderContext::new();
    let mut observer = StopAfter {
        limit: 2,
        seen: Vec::new(),
        finished: 0,
    };

    let report = pipeline.run_batch(&mut ctx, &assets, &mut observer).unwrap();

    assert!(report.cancelled);
    assert_eq!(observer.seen, vec![0, 1]);
    assert_eq!(observer.finished, 2);
    assert_eq!(report.attempted(), 2);
    assert!(dir.path().join("Item1.png").exists());
    assert!(!dir.path().join("Item2.png").exists());
    assert_eq!(ctx.stats().live_instances, 0);
}

#[test]
fn missing_animation_target_is_a_warning() {
    let clip = Arc::new(AnimationClip::new("Wave", 1.0).with_track(AnimationTrack::new(
        "Arm",
        Channel::Translation(vec![Keyframe::new(0.0, Vec3::repeat(1.0))]),
    )));
    let dir = tempfile::tempdir().unwrap();
    let pipeline = IconBatchPipeline::new(
        RenderSettings::with_resolution(32),
        AnimationSelection::at(clip, 0.0),
        dir.path(),
    );
    let mut ctx = RenderContext::new();

    let report = pipeline
        .run_batch(&mut ctx, &[box_asset("Armless", Vec3::repeat(0.5), (1.0, 1.0, 1.0))], &mut NullObserver)
        .unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.outcomes[0].warnings.len(), 1);
    assert_eq!(report.warnings[0].target_path, "Arm");
}
