//! Waypoint follower for the robot's route.

use crate::core::Point2D;

/// Tracks progress of the robot along a list of waypoints.
#[derive(Clone, Debug, Default)]
pub struct RouteNavigator {
    waypoints: Vec<Point2D>,
    waypoint_id: usize,
    proximity_threshold: f32,
    position: Point2D,
    reached_waypoint: bool,
}

impl RouteNavigator {
    /// Navigator that counts a waypoint as reached within `proximity_threshold`
    pub fn new(proximity_threshold: f32) -> Self {
        Self {
            proximity_threshold,
            ..Default::default()
        }
    }

    /// Start a new route from `position`
    pub fn new_route(&mut self, waypoints: Vec<Point2D>, position: Point2D) {
        self.waypoints = waypoints;
        self.waypoint_id = 0;
        self.position = position;
        self.reached_waypoint = false;
    }

    /// Record the robot position and advance past a reached waypoint.
    pub fn update_position(&mut self, position: Point2D) {
        self.position = position;
        self.reached_waypoint = match self.waypoints.get(self.waypoint_id) {
            Some(wp) => wp.distance(position) < self.proximity_threshold,
            None => false,
        };
        if self.reached_waypoint && self.waypoint_id + 1 < self.waypoints.len() {
            self.waypoint_id += 1;
            log::debug!(
                "Waypoint {} of {} reached",
                self.waypoint_id,
                self.waypoints.len()
            );
        }
    }

    /// The last update reached a waypoint
    pub fn reached_waypoint(&self) -> bool {
        self.reached_waypoint
    }

    /// The robot is at the final waypoint (or the route is empty)
    pub fn reached_destination(&self) -> bool {
        match self.waypoints.last() {
            Some(last) => last.distance(self.position) < self.proximity_threshold,
            None => true,
        }
    }

    /// Waypoint currently driven to
    pub fn current_waypoint(&self) -> Option<Point2D> {
        self.waypoints.get(self.waypoint_id).copied()
    }

    /// Waypoint after the current one
    pub fn next_waypoint(&self) -> Option<Point2D> {
        self.waypoints.get(self.waypoint_id + 1).copied()
    }

    /// Index of the current waypoint
    pub fn waypoint_index(&self) -> usize {
        self.waypoint_id
    }

    /// All waypoints of the route
    pub fn waypoints(&self) -> &[Point2D] {
        &self.waypoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator() -> RouteNavigator {
        let mut nav = RouteNavigator::new(1.0);
        nav.new_route(
            vec![Point2D::new(5.0, 0.0), Point2D::new(10.0, 0.0)],
            Point2D::ZERO,
        );
        nav
    }

    #[test]
    fn test_advances_through_waypoints() {
        let mut nav = navigator();
        assert_eq!(nav.current_waypoint(), Some(Point2D::new(5.0, 0.0)));
        assert_eq!(nav.next_waypoint(), Some(Point2D::new(10.0, 0.0)));

        nav.update_position(Point2D::new(2.0, 0.0));
        assert!(!nav.reached_waypoint());
        assert!(!nav.reached_destination());

        nav.update_position(Point2D::new(4.5, 0.0));
        assert!(nav.reached_waypoint());
        assert_eq!(nav.waypoint_index(), 1);
        assert_eq!(nav.next_waypoint(), None);

        nav.update_position(Point2D::new(7.0, 0.0));
        assert!(!nav.reached_waypoint());

        nav.update_position(Point2D::new(9.5, 0.0));
        assert!(nav.reached_waypoint());
        assert!(nav.reached_destination());
        // stays on the last waypoint
        assert_eq!(nav.waypoint_index(), 1);
    }

    #[test]
    fn test_empty_route_is_complete() {
        let mut nav = RouteNavigator::new(1.0);
        nav.new_route(Vec::new(), Point2D::ZERO);
        nav.update_position(Point2D::new(1.0, 1.0));
        assert!(nav.reached_destination());
        assert!(!nav.reached_waypoint());
        assert_eq!(nav.current_waypoint(), None);
    }
}
