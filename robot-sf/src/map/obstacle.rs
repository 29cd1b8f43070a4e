//! Polygonal obstacles.

use crate::core::{Line2D, Point2D};
use serde::Deserialize;

/// Immutable closed polygon.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Obstacle {
    vertices: Vec<Point2D>,
}

impl Obstacle {
    /// Create an obstacle from its vertices (implicitly closed)
    pub fn new(vertices: Vec<Point2D>) -> Self {
        Self { vertices }
    }

    /// Polygon vertices
    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    /// All polygon edges, including the closing edge.
    ///
    /// A two-vertex obstacle is a single wall segment.
    pub fn edges(&self) -> Vec<Line2D> {
        let n = self.vertices.len();
        match n {
            0 | 1 => Vec::new(),
            2 => vec![Line2D::new(self.vertices[0], self.vertices[1])],
            _ => (0..n)
                .map(|i| Line2D::new(self.vertices[i], self.vertices[(i + 1) % n]))
                .collect(),
        }
    }

    /// Point-in-polygon test (even-odd rule).
    pub fn contains(&self, point: Point2D) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[j];
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}
