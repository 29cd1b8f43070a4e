//! Per-tick episode status.

use serde::Serialize;

/// Status flags and counters recomputed after every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimulationMetadata {
    /// Ticks since the environment was created
    pub step: u64,
    /// Episode index, 1 for the first episode
    pub episode: u64,
    /// Ticks completed in this episode
    pub step_of_episode: u64,
    /// Robot touches a pedestrian
    pub is_pedestrian_collision: bool,
    /// Robot touches an obstacle or the map boundary
    pub is_obstacle_collision: bool,
    /// Robot reached a waypoint in this tick
    pub is_robot_at_goal: bool,
    /// Robot reached the last waypoint of its route
    pub is_route_complete: bool,
    /// Episode ran out of ticks
    pub is_timesteps_exceeded: bool,
    /// Episode length in ticks
    pub max_sim_steps: u64,
}

impl SimulationMetadata {
    /// Either kind of collision
    pub fn is_collision(&self) -> bool {
        self.is_pedestrian_collision || self.is_obstacle_collision
    }
}
