/// Camera and projection utilities
use serde::Deserialize;

use crate::matrix::Mat4;
use crate::vector::Vec3;

/// Parameters of the perspective projection
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectionParams {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl ProjectionParams {
    /// Projection matrix for a viewport with `aspect_ratio = height / width`.
    pub fn matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective(self.fov_degrees, aspect_ratio, self.near, self.far)
    }

    /// Check that the parameters give a finite projection.
    ///
    /// `near` must be positive, `far` beyond it and the field of view
    /// strictly between 0 and 180 degrees.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.near.is_finite() && self.near > 0.0) {
            return Err("near must be a positive distance");
        }
        if !(self.far.is_finite() && self.far > self.near) {
            return Err("far must be greater than near");
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err("fov_degrees must be between 0 and 180");
        }
        Ok(())
    }
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Viewer position used for back-face culling
///
/// The eye looks down `+z`; `target` and `up` only matter for
/// [`Camera::view_matrix`], which the per-frame pipeline doesn't apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new(eye: Vec3) -> Self {
        Self {
            eye,
            target: eye + Vec3::direction(0.0, 0.0, 1.0),
            up: Vec3::direction(0.0, 1.0, 0.0),
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(&self.eye, &self.target, &self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::origin())
    }
}

/// Aspect ratio as used by the projection: `height / width`.
///
/// Falls back to `1.0` for an empty viewport.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        height as f32 / width as f32
    }
}
