/// TRI3D Core Library - Mesh transform, culling and projection pipeline
///
/// This library provides the vector and matrix algebra, mesh assembly and
/// loading, and the per-frame pipeline that turns a mesh plus a pose into
/// plain arrays of projected positions, colors and indices for a host to draw.

pub mod config;
pub mod emit;
pub mod geometry;
pub mod matrix;
pub mod obj;
pub mod object;
pub mod pipeline;
pub mod projection;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use config::{ConfigError, RenderConfig};
pub use emit::{EmitError, FrameBuffers, RenderMode};
pub use geometry::{Face, Mesh, MeshError, Triangle};
pub use matrix::Mat4;
pub use obj::{load_mesh, parse_mesh, try_load_mesh, LoadError};
pub use object::{CubeObject, MeshObject, SceneObject};
pub use pipeline::{FrameStats, RenderContext, TriangleOutcome};
pub use projection::{Camera, ProjectionParams};
pub use transform::{Nudge, Pose};
pub use vector::Vec3;
