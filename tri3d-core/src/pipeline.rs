/// Per-frame transform, cull, light and project pipeline
///
/// Triangles are processed in mesh order. Each one is transformed into world
/// space, culled if it faces away from the eye (or has no area), given a flat
/// color from a single directional light, projected and appended to the
/// frame's output buffers.
use crate::config::RenderConfig;
use crate::emit::{EmitError, FrameBuffers, RenderMode};
use crate::geometry::{Mesh, Triangle};
use crate::matrix::Mat4;
use crate::projection::{aspect_ratio, Camera, ProjectionParams};
use crate::vector::Vec3;

/// Scale applied to the light term before clamping
const DIFFUSE_SCALE: f32 = 0.8;

/// What happened to a single triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleOutcome {
    Emitted,
    /// Facing away from the eye
    Culled,
    /// Zero-area triangle, no normal
    Degenerate,
}

/// Counters for one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub processed: usize,
    pub emitted: usize,
    pub culled: usize,
    pub degenerate: usize,
    /// Projected vertices whose `w` was negative
    pub behind_eye: usize,
}

impl FrameStats {
    fn record(&mut self, outcome: TriangleOutcome) {
        self.processed += 1;
        match outcome {
            TriangleOutcome::Emitted => self.emitted += 1,
            TriangleOutcome::Culled => self.culled += 1,
            TriangleOutcome::Degenerate => self.degenerate += 1,
        }
    }
}

/// Flat RGBA color for a given light intensity
pub fn shade(intensity: f32) -> [f32; 4] {
    [1.0, intensity, intensity, 1.0]
}

/// Everything the pipeline reads besides the mesh and the pose
#[derive(Debug, Clone)]
pub struct RenderContext {
    params: ProjectionParams,
    aspect_ratio: f32,
    projection: Mat4,
    pub camera: Camera,
    light_direction: Vec3,
    pub mode: RenderMode,
    pub angular_rate: f32,
}

impl RenderContext {
    pub fn new(config: &RenderConfig, aspect_ratio: f32) -> Self {
        let [x, y, z] = config.eye;
        let mut context = Self {
            params: config.projection,
            aspect_ratio,
            projection: config.projection.matrix(aspect_ratio),
            camera: Camera::new(Vec3::new(x, y, z)),
            light_direction: Vec3::direction(0.0, 0.0, -1.0),
            mode: config.mode,
            angular_rate: config.angular_rate,
        };
        let [x, y, z] = config.light_direction;
        context.set_light_direction(Vec3::direction(x, y, z));
        context
    }

    /// Recompute the projection for a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.set_aspect_ratio(aspect_ratio(width, height));
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.projection = self.params.matrix(aspect_ratio);
        tracing::debug!(aspect_ratio, "updated projection");
    }

    /// The light is normalized on the way in. A zero direction is ignored.
    pub fn set_light_direction(&mut self, direction: Vec3) {
        let direction = Vec3::direction(direction.x, direction.y, direction.z);
        if direction.length() > 0.0 {
            self.light_direction = direction.normalize();
        } else {
            tracing::warn!("ignoring zero light direction");
        }
    }

    pub fn light_direction(&self) -> Vec3 {
        self.light_direction
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Light intensity for a unit face normal, clamped to `[0, 0.8]`.
    pub fn intensity(&self, normal: &Vec3) -> f32 {
        (self.light_direction.dot(normal) * DIFFUSE_SCALE).max(0.0)
    }

    /// Run one triangle through the pipeline.
    ///
    /// `Ok` carries what happened to the triangle; only running out of output
    /// space is an error.
    pub fn process_triangle(
        &self,
        triangle: &Triangle,
        world: &Mat4,
        out: &mut FrameBuffers,
        stats: &mut FrameStats,
    ) -> Result<TriangleOutcome, EmitError> {
        let transformed = triangle.map(|v| world.apply_to_point(v));

        let Some(normal) = transformed.normal() else {
            tracing::trace!(?triangle, "degenerate triangle");
            return Ok(TriangleOutcome::Degenerate);
        };

        // A first vertex sitting on the eye normalizes to NaN, which fails the
        // comparison and culls the triangle.
        let view_direction = (transformed.vertices[0] - self.camera.eye).normalize();
        let facing_eye = view_direction.dot(&normal) < 0.0;
        if !facing_eye {
            return Ok(TriangleOutcome::Culled);
        }

        let color = shade(self.intensity(&normal));

        let projected = transformed.map(|v| self.projection.project(v));
        stats.behind_eye += projected.vertices.iter().filter(|v| v.w < 0.0).count();

        out.push_triangle(&projected.vertices, color, self.mode)?;
        Ok(TriangleOutcome::Emitted)
    }

    /// Run every triangle of `mesh` through the pipeline, in order.
    ///
    /// Stops at the first triangle that doesn't fit into `out`.
    pub fn render_mesh(
        &self,
        mesh: &Mesh,
        world: &Mat4,
        out: &mut FrameBuffers,
    ) -> Result<FrameStats, EmitError> {
        let mut stats = FrameStats::default();

        for triangle in mesh.triangles() {
            match self.process_triangle(triangle, world, out, &mut stats) {
                Ok(outcome) => stats.record(outcome),
                Err(error) => {
                    tracing::error!(%error, emitted = stats.emitted, "aborting frame");
                    return Err(error);
                }
            }
        }

        if stats.behind_eye > 0 {
            tracing::trace!(vertices = stats.behind_eye, "projected vertices behind the eye");
        }

        Ok(stats)
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(&RenderConfig::default(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Face;
    use crate::transform::Pose;
    use std::f32::consts::PI;

    /// Faces the eye at the origin: normal is -z.
    fn facing_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
        )
    }

    fn run(triangle: &Triangle, world: &Mat4) -> (TriangleOutcome, FrameBuffers) {
        let context = RenderContext::default();
        let mut out = FrameBuffers::with_capacity(30);
        let mut stats = FrameStats::default();
        let outcome = context
            .process_triangle(triangle, world, &mut out, &mut stats)
            .unwrap();
        (outcome, out)
    }

    #[test]
    fn test_front_facing_triangle_is_emitted() {
        let (outcome, out) = run(&facing_triangle(), &Mat4::identity());

        assert_eq!(outcome, TriangleOutcome::Emitted);
        assert_eq!(out.vertex_count(), 3);
        assert_eq!(out.position_count(), 9);
        assert_eq!(out.color_count(), 12);
        assert_eq!(out.indices(), &[0, 1, 1, 2, 2, 0]);

        // Light along -z hits the -z normal head on.
        let expected = [1.0, 0.8, 0.8, 1.0];
        for color in out.colors().chunks(4) {
            for (c, e) in color.iter().zip(expected) {
                assert!((c - e).abs() < 1e-5);
            }
        }

        // 90 degree fov, aspect 1: x and y are divided by z = 1.
        let p = out.positions();
        assert!((p[3] - 0.0).abs() < 1e-5);
        assert!((p[4] - 1.0).abs() < 1e-5);
        assert!((p[6] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_facing_away_is_culled() {
        let triangle = Triangle::new(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        );
        let (outcome, out) = run(&triangle, &Mat4::identity());
        assert_eq!(outcome, TriangleOutcome::Culled);
        assert_eq!(out.vertex_count(), 0);
    }

    #[test]
    fn test_half_turn_about_y_culls() {
        // Same triangle in object space at z = 0, pushed in front of the eye.
        let object = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        );

        let (outcome, _) = run(&object, &Pose::at(0.0, 0.0, 1.0).world_matrix());
        assert_eq!(outcome, TriangleOutcome::Emitted);

        let turned = Mat4::translation(0.0, 0.0, 1.0) * Mat4::rotation_y(PI);
        let (outcome, out) = run(&object, &turned);
        assert_eq!(outcome, TriangleOutcome::Culled);
        assert_eq!(out.index_count(), 0);

        let pose = Pose::new(PI, 0.0, 0.0, 1.0);
        let (outcome, _) = run(&object, &pose.world_matrix());
        assert_eq!(outcome, TriangleOutcome::Culled);
    }

    #[test]
    fn test_degenerate_triangle_is_never_emitted() {
        let vertices = [Vec3::new(0.0, 0.0, 1.0)];
        let face = Face::from_one_based(0, [1, 1, 1], 1).unwrap();
        let mesh = Mesh::from_faces(&vertices, &[face]).unwrap();

        let context = RenderContext::default();
        let mut out = FrameBuffers::with_capacity(30);
        let stats = context
            .render_mesh(&mesh, &Mat4::identity(), &mut out)
            .unwrap();

        assert_eq!(stats.degenerate, 1);
        assert_eq!(stats.emitted, 0);
        assert_eq!(out.vertex_count(), 0);
    }

    #[test]
    fn test_intensity_is_clamped() {
        let context = RenderContext::default();
        assert_eq!(context.intensity(&Vec3::direction(0.0, 0.0, 1.0)), 0.0);
        assert!((context.intensity(&Vec3::direction(0.0, 0.0, -1.0)) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_light_direction_is_normalized() {
        let mut context = RenderContext::default();
        context.set_light_direction(Vec3::direction(0.0, 0.0, -4.0));
        assert!((context.light_direction().length() - 1.0).abs() < 1e-6);

        context.set_light_direction(Vec3::direction(0.0, 0.0, 0.0));
        assert!((context.light_direction().z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cube_in_front_of_eye() {
        let cube = Mesh::cube(1.0);
        let context = RenderContext::default();
        let mut out = FrameBuffers::with_capacity(100);
        let world = Pose::at(0.0, 0.0, 3.0).world_matrix();
        let stats = context.render_mesh(&cube, &world, &mut out).unwrap();

        // Only the two triangles of the face towards the eye survive.
        assert_eq!(stats.processed, 12);
        assert_eq!(stats.emitted, 2);
        assert_eq!(stats.culled, 10);
        assert_eq!(stats.behind_eye, 0);
        assert_eq!(out.vertex_count(), 6);
        assert!(out.positions().iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_render_preserves_mesh_order() {
        let near = facing_triangle();
        let far = near.map(|v| Mat4::translation(0.0, 0.0, 4.0).apply_to_point(v));
        let mesh = Mesh::from_triangles(vec![far, near]);

        let context = RenderContext::default();
        let mut out = FrameBuffers::with_capacity(6);
        context
            .render_mesh(&mesh, &Mat4::identity(), &mut out)
            .unwrap();

        // The far triangle comes first: its second vertex is (0, 1/5).
        assert!((out.positions()[4] - 0.2).abs() < 1e-5);
        assert!((out.positions()[13] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_buffer_exhaustion_is_an_error() {
        let mesh = Mesh::from_triangles(vec![facing_triangle(); 3]);
        let context = RenderContext::default();
        let mut out = FrameBuffers::with_capacity(7);

        let result = context.render_mesh(&mesh, &Mat4::identity(), &mut out);
        assert!(matches!(
            result,
            Err(EmitError::OutputBufferExhausted {
                required: 9,
                capacity: 7
            })
        ));
        assert_eq!(out.vertex_count(), 6);
    }

    #[test]
    fn test_behind_eye_vertices_are_counted() {
        // Faces the eye but straddles the eye plane.
        let triangle = Triangle::new(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(5.0, 0.0, 2.0),
            Vec3::new(0.0, 5.0, 2.0),
        );
        let mesh = Mesh::from_triangles(vec![triangle]);
        let context = RenderContext::default();
        let mut out = FrameBuffers::with_capacity(3);
        let stats = context
            .render_mesh(&mesh, &Mat4::identity(), &mut out)
            .unwrap();

        assert_eq!(stats.emitted, 1);
        assert_eq!(stats.behind_eye, 1);
    }

    #[test]
    fn test_resize_updates_projection() {
        let mut context = RenderContext::default();
        context.resize(800, 400);
        assert!((context.aspect_ratio() - 0.5).abs() < 1e-6);
        assert!((context.projection().get(0, 0) - 0.5).abs() < 1e-5);
    }
}
