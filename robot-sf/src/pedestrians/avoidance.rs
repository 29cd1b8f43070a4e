//! Obstacle-aware choice of a pedestrian's walking direction.
//!
//! A pedestrian whose straight line to the goal is blocked within its view
//! distance tries a fan of rotated directions and takes the free one closest
//! to where it was heading before.

use crate::core::{Line2D, Point2D, angle_diff};

/// Result of a direction choice
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionChoice {
    /// Unit walking direction (zero when already at the goal)
    pub direction: Point2D,
    /// Line of sight to the goal was blocked
    pub triggered: bool,
}

/// Segment from `from` to `to` crosses any obstacle.
pub fn is_path_blocked(from: Point2D, to: Point2D, obstacles: &[Line2D]) -> bool {
    let sight = Line2D::new(from, to);
    if sight.is_degenerate() {
        return false;
    }
    obstacles.iter().any(|o| sight.intersects(o))
}

/// Pick the walking direction for one pedestrian.
///
/// `naive` is the unit direction to the goal and `previous` the direction
/// chosen on the last tick (zero if unknown). Candidates are `naive`
/// rotated by each of `angles`.
pub fn choose_direction(
    position: Point2D,
    goal: Point2D,
    naive: Point2D,
    previous: Point2D,
    angles: &[f32],
    view_distance: f32,
    obstacles: &[Line2D],
) -> DirectionChoice {
    let keep = DirectionChoice {
        direction: naive,
        triggered: false,
    };
    if naive == Point2D::ZERO {
        return keep;
    }

    let sight = position.distance(goal).min(view_distance);
    if !is_path_blocked(position, position + naive * sight, obstacles) {
        return keep;
    }

    let reference = if previous == Point2D::ZERO {
        naive
    } else {
        previous
    }
    .angle();

    let best = angles
        .iter()
        .map(|&a| naive.rotate(a))
        .filter(|c| !is_path_blocked(position, position + *c * view_distance, obstacles))
        .map(|c| (angle_diff(reference, c.angle()).abs(), c))
        .fold(None, |best: Option<(f32, Point2D)>, cand| match best {
            Some(b) if b.0 <= cand.0 => Some(b),
            _ => Some(cand),
        });

    DirectionChoice {
        direction: best.map_or(naive, |(_, c)| c),
        triggered: true,
    }
}
