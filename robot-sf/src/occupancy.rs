//! Continuous occupancy and collision queries.
//!
//! [`ContinuousOccupancy`] holds the static geometry of the active map and
//! an [`OccupancySnapshot`] of the dynamic entities. The snapshot is
//! replaced once per tick; every query reads it without mutating.

use crate::core::{Line2D, Point2D};
use crate::map::MapDefinition;
use std::sync::Arc;

/// Dynamic entity positions at one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OccupancySnapshot {
    /// Robot center
    pub robot_position: Point2D,
    /// Current robot goal
    pub goal_position: Point2D,
    /// Pedestrian centers
    pub ped_positions: Vec<Point2D>,
}

/// Collision geometry for one map.
#[derive(Clone, Debug)]
pub struct ContinuousOccupancy {
    map: Arc<MapDefinition>,
    robot_radius: f32,
    ped_radius: f32,
    goal_radius: f32,
    snapshot: OccupancySnapshot,
}

impl ContinuousOccupancy {
    /// Occupancy for a map with the given body radii
    pub fn new(
        map: Arc<MapDefinition>,
        robot_radius: f32,
        ped_radius: f32,
        goal_radius: f32,
    ) -> Self {
        Self {
            map,
            robot_radius,
            ped_radius,
            goal_radius,
            snapshot: OccupancySnapshot::default(),
        }
    }

    /// Replace the dynamic snapshot
    pub fn update(&mut self, snapshot: OccupancySnapshot) {
        self.snapshot = snapshot;
    }

    /// Current snapshot
    pub fn snapshot(&self) -> &OccupancySnapshot {
        &self.snapshot
    }

    /// Obstacle edges and map boundaries
    pub fn obstacle_lines(&self) -> &[Line2D] {
        self.map.obstacle_lines()
    }

    /// Pedestrian centers of the current snapshot
    pub fn ped_positions(&self) -> &[Point2D] {
        &self.snapshot.ped_positions
    }

    /// Pedestrian body radius
    pub fn ped_radius(&self) -> f32 {
        self.ped_radius
    }

    /// Robot body radius
    pub fn robot_radius(&self) -> f32 {
        self.robot_radius
    }

    /// Active map
    pub fn map(&self) -> &Arc<MapDefinition> {
        &self.map
    }

    /// Any pedestrian body closer to the robot body than `threshold`.
    pub fn is_pedestrian_collision(&self, threshold: f32) -> bool {
        let robot = self.snapshot.robot_position;
        let reach = self.robot_radius + self.ped_radius;
        self.snapshot
            .ped_positions
            .iter()
            .any(|p| p.distance(robot) - reach < threshold)
    }

    /// Any obstacle segment closer to the robot body than `threshold`.
    pub fn is_obstacle_collision(&self, threshold: f32) -> bool {
        let robot = self.snapshot.robot_position;
        self.obstacle_lines()
            .iter()
            .any(|line| line.distance_to_point(robot) - self.robot_radius < threshold)
    }

    /// `margin <= x <= width - margin` and likewise for y.
    pub fn in_bounds(&self, point: Point2D, margin: f32) -> bool {
        (margin..=self.map.width() - margin).contains(&point.x)
            && (margin..=self.map.height() - margin).contains(&point.y)
    }

    /// Robot center within `robot_radius + goal_radius` of its goal.
    pub fn is_robot_at_goal(&self) -> bool {
        let dist = self
            .snapshot
            .robot_position
            .distance(self.snapshot.goal_position);
        dist < self.robot_radius + self.goal_radius
    }

    /// Point is outside every obstacle and at least `clearance` from
    /// every obstacle segment.
    pub fn is_obstacle_free(&self, point: Point2D, clearance: f32) -> bool {
        self.map.is_point_free(point, clearance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MapLayout, Obstacle, Zone};

    fn open_map() -> MapDefinition {
        let zone = Zone::axis_aligned(Point2D::new(1.0, 1.0), Point2D::new(2.0, 2.0));
        MapDefinition::new(MapLayout {
            width: 20.0,
            height: 10.0,
            obstacles: vec![Obstacle::new(vec![
                Point2D::new(8.0, 3.0),
                Point2D::new(12.0, 3.0),
                Point2D::new(12.0, 7.0),
                Point2D::new(8.0, 7.0),
            ])],
            robot_spawn_zones: vec![zone],
            robot_goal_zones: vec![zone],
            ..Default::default()
        })
        .unwrap()
    }

    fn occupancy_with(robot: Point2D, peds: Vec<Point2D>) -> ContinuousOccupancy {
        let mut occ = ContinuousOccupancy::new(Arc::new(open_map()), 1.0, 0.4, 1.0);
        occ.update(OccupancySnapshot {
            robot_position: robot,
            goal_position: Point2D::new(18.0, 8.0),
            ped_positions: peds,
        });
        occ
    }

    #[test]
    fn test_pedestrian_collision_threshold() {
        // gap = 2.0 - 1.4 = 0.6
        let occ = occupancy_with(Point2D::new(4.0, 5.0), vec![Point2D::new(6.0, 5.0)]);
        assert!(!occ.is_pedestrian_collision(0.0));
        assert!(!occ.is_pedestrian_collision(0.59));
        assert!(occ.is_pedestrian_collision(0.61));

        let occ = occupancy_with(Point2D::new(4.0, 5.0), vec![Point2D::new(5.0, 5.0)]);
        assert!(occ.is_pedestrian_collision(0.0));
    }

    #[test]
    fn test_obstacle_collision() {
        // 0.5 m from the left face of the box, robot radius 1.0
        let occ = occupancy_with(Point2D::new(7.5, 5.0), vec![]);
        assert!(occ.is_obstacle_collision(0.0));

        let occ = occupancy_with(Point2D::new(4.0, 5.0), vec![]);
        assert!(!occ.is_obstacle_collision(0.0));

        // map boundary counts as an obstacle
        let occ = occupancy_with(Point2D::new(0.5, 5.0), vec![]);
        assert!(occ.is_obstacle_collision(0.0));
    }

    #[test]
    fn test_in_bounds_margin_inclusive() {
        let occ = occupancy_with(Point2D::new(4.0, 5.0), vec![]);
        assert!(occ.in_bounds(Point2D::new(1.0, 1.0), 1.0));
        assert!(occ.in_bounds(Point2D::new(19.0, 9.0), 1.0));
        assert!(!occ.in_bounds(Point2D::new(0.99, 5.0), 1.0));
        assert!(!occ.in_bounds(Point2D::new(5.0, 9.01), 1.0));
    }

    #[test]
    fn test_robot_at_goal() {
        let occ = occupancy_with(Point2D::new(16.5, 8.0), vec![]);
        assert!(occ.is_robot_at_goal());
        let occ = occupancy_with(Point2D::new(15.0, 8.0), vec![]);
        assert!(!occ.is_robot_at_goal());
    }

    #[test]
    fn test_obstacle_free() {
        let occ = occupancy_with(Point2D::new(4.0, 5.0), vec![]);
        assert!(occ.is_obstacle_free(Point2D::new(4.0, 5.0), 1.0));
        // inside the box, far from its edges
        assert!(!occ.is_obstacle_free(Point2D::new(10.0, 5.0), 1.0));
        // too close to the box
        assert!(!occ.is_obstacle_free(Point2D::new(7.5, 5.0), 1.0));
        assert!(!occ.is_obstacle_free(Point2D::new(f32::NAN, 5.0), 1.0));
    }

    #[test]
    fn test_queries_do_not_mutate() {
        let occ = occupancy_with(Point2D::new(4.0, 5.0), vec![Point2D::new(6.0, 5.0)]);
        let before = occ.snapshot().clone();
        let _ = occ.is_pedestrian_collision(0.0);
        let _ = occ.is_obstacle_collision(0.0);
        let _ = occ.is_robot_at_goal();
        assert_eq!(occ.snapshot(), &before);
    }
}
