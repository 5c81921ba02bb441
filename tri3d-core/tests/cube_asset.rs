use std::f32::consts::PI;
use std::path::PathBuf;

use tri3d_core::{
    load_mesh, FrameBuffers, Mesh, MeshObject, Pose, RenderContext, RenderMode, SceneObject,
};

fn cube_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../assets/cube.obj")
}

#[test]
fn test_asset_matches_builtin_cube() {
    let mesh = load_mesh(cube_path());
    assert_eq!(mesh, Mesh::cube(1.0));
}

#[test]
fn test_spinning_cube_frames() {
    let mut object = MeshObject::load(cube_path()).with_pose(Pose::at(0.0, 0.0, 3.0));
    let mut context = RenderContext::default();
    context.mode = RenderMode::Solid;
    context.resize(800, 600);
    let mut out = FrameBuffers::with_capacity(36);

    for _ in 0..120 {
        out.reset();
        let stats = object.render(&context, PI / 60.0, &mut out).unwrap();

        // A convex mesh shows between one and three faces.
        assert_eq!(stats.processed, 12);
        assert_eq!(stats.degenerate, 0);
        assert!((2..=6).contains(&stats.emitted), "{:?}", stats);
        assert_eq!(out.index_count(), stats.emitted * 3);
        assert_eq!(out.color_count(), stats.emitted * 12);

        assert!(out.positions().iter().all(|c| c.is_finite()));
        for depth in out.positions().iter().skip(2).step_by(3) {
            assert!((0.0..1.0).contains(depth));
        }
        for color in out.colors().chunks(4) {
            assert_eq!(color[0], 1.0);
            assert!((0.0..=0.8).contains(&color[1]));
            assert_eq!(color[3], 1.0);
        }
    }

    assert!((object.pose().angle - 2.0 * PI).abs() < 1e-3);
}
