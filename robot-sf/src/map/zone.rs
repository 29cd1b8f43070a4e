//! Spawn / goal zones and routes.

use crate::core::Point2D;
use rand::Rng;
use serde::Deserialize;

/// Oriented rectangle spanned by three corners.
///
/// `p2` is the corner shared by the two edges `p2→p1` and `p2→p3`.
/// The edges are expected to be perpendicular but this is not enforced;
/// a skewed zone is sampled as a parallelogram.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "[Point2D; 3]")]
pub struct Zone {
    /// First corner
    pub p1: Point2D,
    /// Shared corner
    pub p2: Point2D,
    /// Third corner
    pub p3: Point2D,
}

impl From<[Point2D; 3]> for Zone {
    fn from(c: [Point2D; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl Zone {
    /// Create a zone from its three corners
    pub fn new(p1: Point2D, p2: Point2D, p3: Point2D) -> Self {
        Self { p1, p2, p3 }
    }

    /// Axis-aligned rectangle from its min and max corner
    pub fn axis_aligned(min: Point2D, max: Point2D) -> Self {
        Self::new(
            Point2D::new(max.x, min.y),
            min,
            Point2D::new(min.x, max.y),
        )
    }

    /// Uniform sample inside the zone
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point2D {
        let a: f32 = rng.gen_range(0.0..1.0);
        let b: f32 = rng.gen_range(0.0..1.0);
        self.p2 + (self.p1 - self.p2) * a + (self.p3 - self.p2) * b
    }

    /// Zone area in m²
    pub fn area(&self) -> f32 {
        (self.p1 - self.p2).cross(self.p3 - self.p2).abs()
    }

    /// Zone center
    pub fn center(&self) -> Point2D {
        self.p2 + (self.p1 - self.p2) * 0.5 + (self.p3 - self.p2) * 0.5
    }

    /// Whether all corners are finite numbers
    pub fn is_finite(&self) -> bool {
        self.p1.is_finite() && self.p2.is_finite() && self.p3.is_finite()
    }
}

/// A route between a spawn zone and a goal zone.
///
/// Zone indices refer to the spawn / goal zone lists of the owning map
/// (robot zones for robot routes, pedestrian zones for pedestrian routes).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GlobalRoute {
    /// Index of the spawn zone
    pub spawn_zone: usize,
    /// Index of the goal zone
    pub goal_zone: usize,
    /// Ordered intermediate waypoints
    #[serde(default)]
    pub waypoints: Vec<Point2D>,
}

impl GlobalRoute {
    /// Total polyline length of the waypoints
    pub fn length(&self) -> f32 {
        self.waypoints
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }

    /// Consecutive waypoint pairs
    pub fn sections(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        self.waypoints.windows(2).map(|w| (w[0], w[1]))
    }
}
