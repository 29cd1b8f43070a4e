//! Immutable copies of the simulation state for renderers.

use crate::core::{Point2D, Pose2D};
use crate::robot::RobotAction;
use serde::Serialize;

/// Everything a renderer draws for one tick.
///
/// Published after every reset and every tick. Receivers own their copy,
/// so the simulation keeps mutating its live state without sharing it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SimSnapshot {
    /// Episode index
    pub episode: u64,
    /// Ticks completed in this episode
    pub timestep: u64,
    /// Robot pose after the tick
    pub robot_pose: Pose2D,
    /// Action applied in this tick (`None` right after reset)
    pub last_action: Option<RobotAction>,
    /// Waypoint the robot is driving to
    pub goal: Option<Point2D>,
    /// Pedestrian centers
    pub ped_positions: Vec<Point2D>,
    /// Pedestrian velocities, same order as `ped_positions`
    pub ped_velocities: Vec<Point2D>,
    /// World coordinates where each lidar ray ended
    pub ray_end_points: Vec<Point2D>,
}
