/// Renderable scene objects
use std::path::{Path, PathBuf};

use crate::emit::{EmitError, FrameBuffers};
use crate::geometry::Mesh;
use crate::obj::load_mesh;
use crate::pipeline::{FrameStats, RenderContext};
use crate::transform::Pose;

/// An object that owns a mesh and a pose and can be drawn each frame
pub trait SceneObject {
    fn name(&self) -> &str;

    fn pose(&self) -> &Pose;

    fn pose_mut(&mut self) -> &mut Pose;

    fn mesh(&self) -> &Mesh;

    /// Rebuild the mesh, dropping the previous one.
    fn reload(&mut self);

    /// Draw the object with its current pose, then advance the pose by
    /// `elapsed` seconds.
    fn render(
        &mut self,
        context: &RenderContext,
        elapsed: f32,
        out: &mut FrameBuffers,
    ) -> Result<FrameStats, EmitError> {
        let world = self.pose().world_matrix();
        self.pose_mut().advance(elapsed, context.angular_rate);
        context.render_mesh(self.mesh(), &world, out)
    }
}

/// An object whose mesh comes from a file
#[derive(Debug, Clone)]
pub struct MeshObject {
    path: PathBuf,
    mesh: Mesh,
    pose: Pose,
}

impl MeshObject {
    /// Load the mesh at `path`. A file that can't be loaded gives an object
    /// with an empty mesh.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_owned();
        let mesh = load_mesh(&path);
        Self {
            path,
            mesh,
            pose: Pose::zero(),
        }
    }

    /// An object for a mesh that's already in memory, e.g. parsed from text.
    pub fn from_mesh(name: impl Into<PathBuf>, mesh: Mesh) -> Self {
        Self {
            path: name.into(),
            mesh,
            pose: Pose::zero(),
        }
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SceneObject for MeshObject {
    fn name(&self) -> &str {
        self.path.to_str().unwrap_or("mesh")
    }

    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn pose_mut(&mut self) -> &mut Pose {
        &mut self.pose
    }

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn reload(&mut self) {
        self.mesh = load_mesh(&self.path);
        tracing::debug!(path = %self.path.display(), triangles = self.mesh.count(), "reloaded mesh");
    }
}

/// A procedurally built cube
#[derive(Debug, Clone)]
pub struct CubeObject {
    size: f32,
    mesh: Mesh,
    pose: Pose,
}

impl CubeObject {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            mesh: Mesh::cube(size),
            pose: Pose::zero(),
        }
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }
}

impl SceneObject for CubeObject {
    fn name(&self) -> &str {
        "cube"
    }

    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn pose_mut(&mut self) -> &mut Pose {
        &mut self.pose
    }

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn reload(&mut self) {
        self.mesh = Mesh::cube(self.size);
    }
}
