//! Line segment type using endpoint representation.
//!
//! Obstacle edges are stored as segments; all distance and intersection
//! queries guard against zero-length segments.

use super::point::Point2D;
use serde::{Deserialize, Serialize};

/// Segments shorter than this are degenerate and dropped at map load.
pub const MIN_SEGMENT_LENGTH: f32 = 1e-6;

/// A 2D line segment defined by its endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line2D {
    /// Start point of the segment.
    pub start: Point2D,
    /// End point of the segment.
    pub end: Point2D,
}

impl Line2D {
    /// Create a new segment.
    #[inline]
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    /// Direction vector from start to end (not normalized).
    #[inline]
    pub fn direction(&self) -> Point2D {
        self.end - self.start
    }

    /// Length of the segment.
    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    /// Shorter than [`MIN_SEGMENT_LENGTH`].
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length() < MIN_SEGMENT_LENGTH
    }

    /// Point at parameter t (0 = start, 1 = end).
    #[inline]
    pub fn point_at(&self, t: f32) -> Point2D {
        self.start + self.direction() * t
    }

    /// Project a point onto the infinite line, returning parameter t.
    #[inline]
    pub fn project_point(&self, point: Point2D) -> f32 {
        let dir = self.direction();
        let len_sq = dir.length_squared();

        if len_sq < f32::EPSILON {
            return 0.0;
        }

        (point - self.start).dot(dir) / len_sq
    }

    /// Distance from a point to the segment (not the infinite line).
    #[inline]
    pub fn distance_to_point(&self, point: Point2D) -> f32 {
        let t = self.project_point(point).clamp(0.0, 1.0);
        point.distance(self.point_at(t))
    }

    /// Distance along a ray to this segment.
    ///
    /// `ray_direction` must be a unit vector. Returns `None` for parallel
    /// rays and for hits behind the origin.
    pub fn ray_intersection(&self, ray_origin: Point2D, ray_direction: Point2D) -> Option<f32> {
        let seg = self.direction();
        let denom = ray_direction.cross(seg);

        if denom.abs() < f32::EPSILON {
            return None;
        }

        let origin_to_start = self.start - ray_origin;
        let t = origin_to_start.cross(seg) / denom;
        let s = origin_to_start.cross(ray_direction) / denom;

        if t >= 0.0 && (0.0..=1.0).contains(&s) {
            Some(t)
        } else {
            None
        }
    }

    /// Whether this segment crosses another one.
    pub fn intersects(&self, other: &Line2D) -> bool {
        let d1 = self.direction();
        let d2 = other.direction();
        let denom = d1.cross(d2);

        if denom.abs() < f32::EPSILON {
            return false;
        }

        let diff = other.start - self.start;
        let t = diff.cross(d2) / denom;
        let s = diff.cross(d1) / denom;
        (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&s)
    }
}
