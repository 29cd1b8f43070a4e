//! Robot-relative goal observation.

use crate::core::{Point2D, Pose2D, normalize_angle};

/// Distance and heading-relative angle from `pose` to `target`.
pub fn rel_pos(pose: Pose2D, target: Point2D) -> (f32, f32) {
    let origin = pose.position();
    let distance = origin.distance(target);
    let angle = normalize_angle(origin.angle_to(target) - pose.theta);
    (distance, angle)
}

/// Turn angle at `p2` when travelling `p1 → p2 → p3`, in [-π, π).
pub fn turn_angle(p1: Point2D, p2: Point2D, p3: Point2D) -> f32 {
    normalize_angle((p3 - p2).angle() - (p2 - p1).angle())
}

/// `[target_distance, target_angle, next_target_angle]`.
///
/// The next target angle is the turn the robot takes at the goal towards
/// the following waypoint, 0 when the goal is the last one.
pub fn target_sensor_obs(pose: Pose2D, goal: Point2D, next_goal: Option<Point2D>) -> [f32; 3] {
    let (distance, angle) = rel_pos(pose, goal);
    let next_angle = next_goal.map_or(0.0, |next| turn_angle(pose.position(), goal, next));
    [distance, angle, next_angle]
}
