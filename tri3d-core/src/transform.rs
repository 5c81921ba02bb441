/// Object pose and world matrix construction
use crate::matrix::Mat4;

/// Rotation angle and translation offset of a scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Radians. Advanced by elapsed time every frame.
    pub angle: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Pose {
    pub fn new(angle: f32, x: f32, y: f32, z: f32) -> Self {
        Self { angle, x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(0.0, x, y, z)
    }

    /// Advance the rotation by `elapsed * angular_rate`.
    pub fn advance(&mut self, elapsed: f32, angular_rate: f32) {
        self.angle += elapsed * angular_rate;
    }

    /// Move by delta amounts
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// `translation * (rot_z * rot_x)`, both rotations by the same angle.
    ///
    /// There's no rotation about Y in the composition; an angle of `PI` still
    /// turns the object half way around Y since `rot_z(PI) * rot_x(PI)` equals
    /// `rot_y(PI)`.
    pub fn world_matrix(&self) -> Mat4 {
        let rotation = Mat4::rotation_z(self.angle) * Mat4::rotation_x(self.angle);
        Mat4::translation(self.x, self.y, self.z) * rotation
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::zero()
    }
}

/// Commands from external input that move an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Forward,
    Back,
    Left,
    Right,
}

impl Nudge {
    /// `w`/`s` move along z, `a`/`d` along x.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(Self::Forward),
            's' => Some(Self::Back),
            'a' => Some(Self::Left),
            'd' => Some(Self::Right),
            _ => None,
        }
    }

    pub fn apply(self, pose: &mut Pose, step: f32) {
        match self {
            Self::Forward => pose.translate(0.0, 0.0, step),
            Self::Back => pose.translate(0.0, 0.0, -step),
            Self::Left => pose.translate(-step, 0.0, 0.0),
            Self::Right => pose.translate(step, 0.0, 0.0),
        }
    }
}
