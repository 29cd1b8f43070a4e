//! 2D pose type for robot position and orientation.

use super::math::normalize_angle;
use super::point::Point2D;
use serde::{Deserialize, Serialize};

/// A 2D pose: position in meters plus heading in radians.
///
/// The heading is kept in [-π, π); constructors normalize it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters.
    pub x: f32,
    /// Y position in meters.
    pub y: f32,
    /// Heading angle in radians [-π, π), CCW positive from X-axis.
    pub theta: f32,
}

impl Pose2D {
    /// Create a new pose (heading is normalized).
    #[inline]
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
        }
    }

    /// Origin, facing +X.
    #[inline]
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    /// Create a pose from position and heading.
    #[inline]
    pub fn from_position(position: Point2D, theta: f32) -> Self {
        Self::new(position.x, position.y, theta)
    }

    /// Position as a point.
    #[inline]
    pub fn position(self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Unit vector along the heading.
    #[inline]
    pub fn forward(self) -> Point2D {
        Point2D::from_angle(self.theta)
    }

    /// Transform a point from this pose's local frame to world frame.
    #[inline]
    pub fn transform_point(self, point: Point2D) -> Point2D {
        self.position() + point.rotate(self.theta)
    }

    /// Transform a world point into this pose's local frame.
    #[inline]
    pub fn inverse_transform_point(self, point: Point2D) -> Point2D {
        (point - self.position()).rotate(-self.theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_new_normalizes_angle() {
        let pose = Pose2D::new(0.0, 0.0, 3.0 * PI);
        assert!(pose.theta.abs() - PI < 1e-5);
        let pose = Pose2D::new(0.0, 0.0, 2.0 * PI + 0.25);
        assert_relative_eq!(pose.theta, 0.25, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_round_trip() {
        let pose = Pose2D::new(1.0, 2.0, FRAC_PI_2);
        let world = Point2D::new(3.0, 4.0);
        let back = pose.transform_point(pose.inverse_transform_point(world));
        assert_relative_eq!(back.x, world.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, world.y, epsilon = 1e-5);
    }

    #[test]
    fn test_forward() {
        let fwd = Pose2D::new(0.0, 0.0, FRAC_PI_2).forward();
        assert_relative_eq!(fwd.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(fwd.y, 1.0, epsilon = 1e-6);
    }
}
