//! 2D point / vector type shared by geometry, forces and sensors.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Norms below this are treated as zero when normalizing.
pub const NORM_EPSILON: f32 = 1e-8;

/// A point (or free vector) in world coordinates, meters.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point2D {
    /// X coordinate in meters
    pub x: f32,
    /// Y coordinate in meters
    pub y: f32,
}

impl Point2D {
    /// Zero vector / origin
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    /// Create a new point
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` (radians, CCW from +X)
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin)
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(self, other: Point2D) -> f32 {
        (self - other).length()
    }

    /// Squared distance (avoids sqrt)
    #[inline]
    pub fn distance_squared(self, other: Point2D) -> f32 {
        (self - other).length_squared()
    }

    /// Vector length
    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Squared vector length
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Angle of this vector (radians, CCW from +X)
    #[inline]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Angle from this point to another
    #[inline]
    pub fn angle_to(self, other: Point2D) -> f32 {
        (other - self).angle()
    }

    /// Unit vector in the same direction.
    ///
    /// Returns the zero vector when the length is below [`NORM_EPSILON`],
    /// so callers never divide by a near-zero norm.
    #[inline]
    pub fn normalized(self) -> Point2D {
        self.normalized_with_length().0
    }

    /// Unit vector plus the original length (zero vector for degenerate input).
    #[inline]
    pub fn normalized_with_length(self) -> (Point2D, f32) {
        let len = self.length();
        if len < NORM_EPSILON {
            (Point2D::ZERO, len)
        } else {
            (Point2D::new(self.x / len, self.y / len), len)
        }
    }

    /// Rotate around the origin by `angle` radians
    #[inline]
    pub fn rotate(self, angle: f32) -> Point2D {
        let (sin, cos) = angle.sin_cos();
        Point2D::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Dot product
    #[inline]
    pub fn dot(self, other: Point2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Z-component of the 3D cross product
    #[inline]
    pub fn cross(self, other: Point2D) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Both coordinates are finite
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Clamp the vector length to `max_length`, keeping its direction.
    #[inline]
    pub fn clamp_length(self, max_length: f32) -> Point2D {
        let (dir, len) = self.normalized_with_length();
        if len > max_length { dir * max_length } else { self }
    }
}

impl From<[f32; 2]> for Point2D {
    fn from(v: [f32; 2]) -> Self {
        Point2D::new(v[0], v[1])
    }
}

impl From<Point2D> for [f32; 2] {
    fn from(p: Point2D) -> Self {
        [p.x, p.y]
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point2D::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Point2D {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Point2D::new(self.x * scalar, self.y * scalar)
    }
}

impl Neg for Point2D {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Point2D::new(-self.x, -self.y)
    }
}
