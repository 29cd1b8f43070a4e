//! Pedestrian crowd driven by a social force model.
//!
//! - [`forces`]: robot repulsion, goal seeking with obstacle avoidance and
//!   group cohesion, summed by a [`ForceModel`]
//! - [`integrator`]: the [`PedestrianIntegrator`] seam and its Euler default
//! - [`population`]: crowd spawning, grouping and goal updates

pub mod avoidance;
pub mod forces;
pub mod integrator;
pub mod population;

pub use forces::{
    DesiredForce, ForceContext, ForceModel, GroupCohesionForce, PedRobotForce, PedestrianForce,
    ROBOT_SENTINEL,
};
pub use integrator::{EulerIntegrator, PedestrianIntegrator, reject_non_finite};
pub use population::Crowd;

use crate::core::Point2D;

/// How a pedestrian picks its goals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PedestrianBehavior {
    /// Walks to random goals inside a crowded zone
    Wanderer {
        /// Index into the map's crowded zones
        zone: usize,
    },
    /// Walks along a pedestrian route and restarts at its first waypoint
    RouteFollower {
        /// Index into the map's pedestrian routes
        route: usize,
        /// Index of the waypoint currently walked to
        waypoint: usize,
    },
}

/// Single pedestrian state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pedestrian {
    /// Center position (m)
    pub position: Point2D,
    /// Velocity (m/s)
    pub velocity: Point2D,
    /// Current goal
    pub goal: Point2D,
    /// Speed limit applied by the integrator (m/s)
    pub max_speed: f32,
    /// Group id, `None` for pedestrians walking alone
    pub group: Option<usize>,
    /// Goal selection behavior
    pub behavior: PedestrianBehavior,
}

impl Pedestrian {
    /// Standing pedestrian
    pub fn new(position: Point2D, goal: Point2D, max_speed: f32, behavior: PedestrianBehavior) -> Self {
        Self {
            position,
            velocity: Point2D::ZERO,
            goal,
            max_speed,
            group: None,
            behavior,
        }
    }
}
