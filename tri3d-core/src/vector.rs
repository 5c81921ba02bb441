/// Three-component vectors with a homogeneous `w` coefficient
use nalgebra::{Point3, Vector3, Vector4};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A 3D vector or point.
///
/// `w` is the homogeneous coefficient: `1.0` for points, `0.0` for directions.
/// Every operation returns a new value and leaves its operands untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec3 {
    /// A point (`w = 1`)
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    /// A direction (`w = 0`)
    pub const fn direction(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, w: 0.0 }
    }

    pub const fn with_w(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn add(&self, other: &Vec3) -> Vec3 {
        Vec3::with_w(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }

    pub fn subtract(&self, other: &Vec3) -> Vec3 {
        Vec3::with_w(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }

    /// Multiply every component, `w` included, by `s`.
    pub fn scale(&self, s: f32) -> Vec3 {
        Vec3::with_w(self.x * s, self.y * s, self.z * s, self.w * s)
    }

    /// Divide every component by `s`.
    ///
    /// Follows IEEE-754: dividing by zero yields `inf`/`NaN` components rather
    /// than panicking.
    pub fn divide(&self, s: f32) -> Vec3 {
        Vec3::with_w(self.x / s, self.y / s, self.z / s, self.w / s)
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Scale to unit length.
    ///
    /// Only meaningful for directions with non-zero length; the zero vector
    /// normalizes to `NaN`.
    pub fn normalize(&self) -> Vec3 {
        self.divide(self.length())
    }

    pub fn dot(&self, other: &Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product of the `xyz` parts, returned as a direction.
    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3::direction(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::origin()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::add(&self, &other)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        self.subtract(&other)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;

    fn div(self, s: f32) -> Vec3 {
        self.divide(s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        self.scale(-1.0)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Vec3::new(x, y, z)
    }
}

impl From<Point3<f32>> for Vec3 {
    fn from(p: Point3<f32>) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

impl From<Vector3<f32>> for Vec3 {
    fn from(v: Vector3<f32>) -> Self {
        Vec3::direction(v.x, v.y, v.z)
    }
}

impl From<Vector4<f32>> for Vec3 {
    fn from(v: Vector4<f32>) -> Self {
        Vec3::with_w(v.x, v.y, v.z, v.w)
    }
}

impl From<Vec3> for Vector3<f32> {
    fn from(v: Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Point3<f32> {
    fn from(v: Vec3) -> Self {
        Point3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vector4<f32> {
    fn from(v: Vec3) -> Self {
        Vector4::new(v.x, v.y, v.z, v.w)
    }
}
