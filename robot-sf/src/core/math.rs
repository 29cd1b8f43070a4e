//! Angle utilities and ray/circle geometry.
//!
//! All angles are in radians, counter-clockwise positive from +X.

use super::point::Point2D;
use std::f32::consts::PI;

/// Two times PI (full circle in radians).
pub const TWO_PI: f32 = 2.0 * PI;

/// Normalize angle to [-π, π).
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TWO_PI;
    if a >= PI {
        a -= TWO_PI;
    } else if a < -PI {
        a += TWO_PI;
    }
    a
}

/// Signed shortest angular difference from `from` to `to`, in [-π, π).
#[inline]
pub fn angle_diff(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Distance along a ray to the first intersection with a circle.
///
/// `direction` must be a unit vector. Returns `None` when the ray misses
/// the circle or the circle lies entirely behind the origin. An origin
/// inside the circle reports distance 0.
pub fn ray_circle_intersection(
    origin: Point2D,
    direction: Point2D,
    center: Point2D,
    radius: f32,
) -> Option<f32> {
    let to_center = center - origin;
    let c = to_center.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    // |o + t*d - c|^2 = r^2 with |d| = 1  =>  t^2 - 2bt + c = 0
    let b = to_center.dot(direction);
    if b <= 0.0 {
        return None;
    }

    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    Some(b - disc.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_angle() {
        assert_relative_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(PI).abs() - PI).abs() < 1e-6);
        assert!(normalize_angle(TWO_PI).abs() < 1e-6);
        assert_relative_eq!(normalize_angle(5.0 * PI / 4.0), -3.0 * PI / 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_diff_wraps() {
        let diff = angle_diff(-0.9 * PI, 0.9 * PI);
        assert_relative_eq!(diff, -0.2 * PI, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_circle_hit() {
        let t = ray_circle_intersection(
            Point2D::ZERO,
            Point2D::new(1.0, 0.0),
            Point2D::new(5.0, 0.0),
            1.0,
        );
        assert_relative_eq!(t.unwrap(), 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_circle_miss_and_behind() {
        let dir = Point2D::new(1.0, 0.0);
        assert!(ray_circle_intersection(Point2D::ZERO, dir, Point2D::new(5.0, 3.0), 1.0).is_none());
        assert!(ray_circle_intersection(Point2D::ZERO, dir, Point2D::new(-5.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_ray_origin_inside_circle() {
        let t = ray_circle_intersection(Point2D::ZERO, Point2D::new(0.0, 1.0), Point2D::ZERO, 0.5);
        assert_eq!(t, Some(0.0));
    }
}
