/// 4x4 transformation matrices
///
/// Entries are addressed as `M[row][col]` and transforms are applied as
/// `v' = M * v` with `v` a column vector. Every constructor below spells out its
/// entries row by row in that convention.
use nalgebra::{Matrix4, Vector4};
use std::ops::Mul;

use crate::vector::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(pub Matrix4<f32>);

impl Mat4 {
    /// Build from rows.
    pub fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        let [r0, r1, r2, r3] = rows;
        // `Matrix4::new` takes its arguments in row-major order.
        Self(Matrix4::new(
            r0[0], r0[1], r0[2], r0[3], //
            r1[0], r1[1], r1[2], r1[3], //
            r2[0], r2[1], r2[2], r2[3], //
            r3[0], r3[1], r3[2], r3[3],
        ))
    }

    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    pub fn rotation_x(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Perspective projection.
    ///
    /// `fov_degrees` is the vertical field of view and `aspect_ratio` is
    /// `height / width`. The eye looks down `+z`. With
    /// `q = far / (far - near)` the depth row produces `z' = q * (z - near)` and
    /// the last row copies `z` into `w`, so after the perspective divide a
    /// point on the near plane lands at depth `0` and one on the far plane at
    /// depth `1`.
    pub fn perspective(fov_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let inv_tan = 1.0 / (fov_degrees.to_radians() * 0.5).tan();
        let q = far / (far - near);
        Self::from_rows([
            [aspect_ratio * inv_tan, 0.0, 0.0, 0.0],
            [0.0, inv_tan, 0.0, 0.0],
            [0.0, 0.0, q, -near * q],
            [0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// View matrix for an eye at `eye` looking at `target`.
    ///
    /// `up` is re-orthogonalized against the forward axis (Gram-Schmidt) and the
    /// rows of the result are the right, up and forward axes, each carrying
    /// `-dot(axis, eye)` as its translation.
    pub fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Self {
        let forward = (*target - *eye).normalize();
        let up = (*up - forward.scale(up.dot(&forward))).normalize();
        let right = up.cross(&forward);

        Self::from_rows([
            [right.x, right.y, right.z, -right.dot(eye)],
            [up.x, up.y, up.z, -up.dot(eye)],
            [forward.x, forward.y, forward.z, -forward.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.0[(row, col)]
    }

    pub fn rows(&self) -> [[f32; 4]; 4] {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, entry) in row.iter_mut().enumerate() {
                *entry = self.get(r, c);
            }
        }
        rows
    }

    pub fn multiply(&self, other: &Mat4) -> Mat4 {
        Mat4(self.0 * other.0)
    }

    pub fn transpose(&self) -> Mat4 {
        Mat4(self.0.transpose())
    }

    /// `M * v` using `v.w` as the homogeneous coefficient.
    pub fn transform(&self, v: &Vec3) -> Vec3 {
        (self.0 * Vector4::from(*v)).into()
    }

    /// `M * v` treating `v` as a point (`w = 1`). The resulting `w` is kept.
    pub fn apply_to_point(&self, v: &Vec3) -> Vec3 {
        self.transform(&Vec3::new(v.x, v.y, v.z))
    }

    /// Apply the matrix to a point and perform the perspective divide.
    ///
    /// When the resulting `w` is exactly zero the divide is skipped and the
    /// undivided `x, y, z` are returned. The pre-divide `w` is reported in the
    /// result's `w` either way; a negative value means the point was behind the
    /// eye and its divided coordinates are mirrored.
    pub fn project(&self, v: &Vec3) -> Vec3 {
        let clip = self.apply_to_point(v);
        if clip.w == 0.0 {
            return clip;
        }
        Vec3::with_w(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w, clip.w)
    }

    pub fn approx_eq(&self, other: &Mat4, epsilon: f32) -> bool {
        (self.0 - other.0).iter().all(|d| d.abs() < epsilon)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, other: Mat4) -> Mat4 {
        self.multiply(&other)
    }
}

impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        self.transform(&v)
    }
}

impl From<Matrix4<f32>> for Mat4 {
    fn from(m: Matrix4<f32>) -> Self {
        Self(m)
    }
}

impl From<Mat4> for Matrix4<f32> {
    fn from(m: Mat4) -> Self {
        m.0
    }
}
