//! Episode timing, spawn sampling and reward settings.

use super::robot::require_positive;
use crate::error::{Error, Result};
use serde::Deserialize;

/// Simulation configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimulationSettings {
    /// Episode length before timeout (seconds)
    #[serde(default = "default_sim_time")]
    pub sim_time_in_secs: f32,

    /// Physics step (seconds)
    #[serde(default = "default_time_per_step")]
    pub time_per_step_in_secs: f32,

    /// Number of frames kept by the observation window
    #[serde(default = "default_stack_steps")]
    pub stack_steps: usize,

    /// Extra distance around the robot at which a goal counts as reached (meters)
    #[serde(default = "default_goal_radius")]
    pub goal_radius: f32,

    /// Gap below which contact counts as a collision (meters)
    #[serde(default)]
    pub collision_threshold: f32,

    /// Minimum spawn-to-goal distance is `max(width, height)` divided by this
    #[serde(default = "default_spawn_clearance_divisor")]
    pub spawn_clearance_divisor: f32,

    /// Rejection sampling budget for each spawn or goal draw
    #[serde(default = "default_max_spawn_attempts")]
    pub max_spawn_attempts: usize,

    /// Capacity of each snapshot subscriber channel
    #[serde(default = "default_snapshot_capacity")]
    pub snapshot_capacity: usize,
}

fn default_sim_time() -> f32 {
    200.0
}
fn default_time_per_step() -> f32 {
    0.1
}
fn default_stack_steps() -> usize {
    3
}
fn default_goal_radius() -> f32 {
    1.0
}
fn default_spawn_clearance_divisor() -> f32 {
    20.0
}
fn default_max_spawn_attempts() -> usize {
    1000
}
fn default_snapshot_capacity() -> usize {
    16
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            sim_time_in_secs: default_sim_time(),
            time_per_step_in_secs: default_time_per_step(),
            stack_steps: default_stack_steps(),
            goal_radius: default_goal_radius(),
            collision_threshold: 0.0,
            spawn_clearance_divisor: default_spawn_clearance_divisor(),
            max_spawn_attempts: default_max_spawn_attempts(),
            snapshot_capacity: default_snapshot_capacity(),
        }
    }
}

impl SimulationSettings {
    /// Number of ticks before an episode times out
    pub fn max_sim_steps(&self) -> u64 {
        (self.sim_time_in_secs / self.time_per_step_in_secs).ceil() as u64
    }

    /// Validate timing and sampling parameters.
    pub fn validate(&self) -> Result<()> {
        require_positive("sim_time_in_secs", self.sim_time_in_secs)?;
        require_positive("time_per_step_in_secs", self.time_per_step_in_secs)?;
        require_positive("goal_radius", self.goal_radius)?;
        require_positive("spawn_clearance_divisor", self.spawn_clearance_divisor)?;
        if self.stack_steps == 0 {
            return Err(Error::Config("stack_steps must be at least 1".to_string()));
        }
        if self.max_spawn_attempts == 0 {
            return Err(Error::Config(
                "max_spawn_attempts must be at least 1".to_string(),
            ));
        }
        if self.snapshot_capacity == 0 {
            return Err(Error::Config(
                "snapshot_capacity must be at least 1".to_string(),
            ));
        }
        if !self.collision_threshold.is_finite() {
            return Err(Error::Config(format!(
                "collision_threshold must be finite, got {}",
                self.collision_threshold
            )));
        }
        Ok(())
    }
}

/// Reward shaping for the default reward function
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RewardSettings {
    /// Total step penalty spread over a full-length episode
    #[serde(default = "default_step_penalty")]
    pub step_penalty: f32,

    /// Penalty for touching a pedestrian or obstacle
    #[serde(default = "default_collision_penalty")]
    pub collision_penalty: f32,

    /// Bonus for reaching a waypoint
    #[serde(default = "default_goal_bonus")]
    pub goal_bonus: f32,
}

fn default_step_penalty() -> f32 {
    0.1
}
fn default_collision_penalty() -> f32 {
    2.0
}
fn default_goal_bonus() -> f32 {
    1.0
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            step_penalty: default_step_penalty(),
            collision_penalty: default_collision_penalty(),
            goal_bonus: default_goal_bonus(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_sim_steps() {
        let s = SimulationSettings::default();
        assert_eq!(s.max_sim_steps(), 2000);

        let s = SimulationSettings {
            sim_time_in_secs: 1.05,
            ..Default::default()
        };
        assert_eq!(s.max_sim_steps(), 11);
    }

    #[test]
    fn test_rejects_zero_stack() {
        let s = SimulationSettings {
            stack_steps: 0,
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }
}
