//! Pedestrian force and crowd population settings.

use super::robot::require_positive;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::f32::consts::PI;

/// Robot-repulsion force parameters.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PedRobotForceSettings {
    /// Include this force in the model
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Gap (meters) at or above which the force vanishes
    #[serde(default = "default_activation_threshold")]
    pub activation_threshold: f32,

    /// Exponential decay length of the repulsion (meters)
    #[serde(default = "default_sigma")]
    pub sigma: f32,

    /// Overall scale of the force
    #[serde(default = "default_robot_force_multiplier")]
    pub force_multiplier: f32,
}

fn default_true() -> bool {
    true
}
fn default_activation_threshold() -> f32 {
    2.0
}
fn default_sigma() -> f32 {
    0.2
}
fn default_robot_force_multiplier() -> f32 {
    10.0
}

impl Default for PedRobotForceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            activation_threshold: default_activation_threshold(),
            sigma: default_sigma(),
            force_multiplier: default_robot_force_multiplier(),
        }
    }
}

/// Goal-seeking force parameters.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DesiredForceSettings {
    /// Overall scale of the force
    #[serde(default = "default_one")]
    pub factor: f32,

    /// Time to reach the desired velocity (seconds)
    #[serde(default = "default_relaxation_time")]
    pub relaxation_time: f32,

    /// Distance below which a pedestrian brakes at its goal (meters)
    #[serde(default = "default_goal_threshold")]
    pub goal_threshold: f32,

    /// Steer around obstacles blocking the line of sight to the goal
    #[serde(default)]
    pub obstacle_avoidance: bool,

    /// Candidate direction offsets around the goal direction (radians)
    #[serde(default = "default_avoidance_angles")]
    pub avoidance_angles: Vec<f32>,

    /// How far ahead candidate directions are checked (meters)
    #[serde(default = "default_view_distance")]
    pub view_distance: f32,

    /// Weight of the new force against the previous one (0.0-1.0)
    #[serde(default = "default_forgetting_factor")]
    pub forgetting_factor: f32,
}

fn default_one() -> f32 {
    1.0
}
fn default_relaxation_time() -> f32 {
    0.5
}
fn default_goal_threshold() -> f32 {
    0.1
}
fn default_avoidance_angles() -> Vec<f32> {
    [-1.0, -0.5, -0.25, 0.25, 0.5, 1.0]
        .iter()
        .map(|f| f * PI)
        .collect()
}
fn default_view_distance() -> f32 {
    15.0
}
fn default_forgetting_factor() -> f32 {
    0.8
}

impl Default for DesiredForceSettings {
    fn default() -> Self {
        Self {
            factor: 1.0,
            relaxation_time: default_relaxation_time(),
            goal_threshold: default_goal_threshold(),
            obstacle_avoidance: false,
            avoidance_angles: default_avoidance_angles(),
            view_distance: default_view_distance(),
            forgetting_factor: default_forgetting_factor(),
        }
    }
}

/// Group cohesion force parameters.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GroupForceSettings {
    /// Include this force in the model
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Overall scale of the force
    #[serde(default = "default_one")]
    pub factor: f32,

    /// Pairs farther apart than this do not interact (meters)
    #[serde(default = "default_group_threshold")]
    pub threshold: f32,
}

fn default_group_threshold() -> f32 {
    0.55
}

impl Default for GroupForceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            factor: 1.0,
            threshold: default_group_threshold(),
        }
    }
}

/// Pedestrian crowd configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PedestrianSettings {
    /// Pedestrian body radius (meters)
    #[serde(default = "default_ped_radius")]
    pub radius: f32,

    /// Preferred walking speed (m/s)
    #[serde(default = "default_preferred_speed")]
    pub preferred_speed: f32,

    /// Max speed as a multiple of the preferred speed
    #[serde(default = "default_speed_mult")]
    pub peds_speed_mult: f32,

    /// Crowd density in crowded zones (pedestrians per m²)
    #[serde(default = "default_peds_per_area")]
    pub peds_per_area_m2: f32,

    /// Spacing between pedestrians spawned along routes (meters)
    #[serde(default = "default_route_spawn_spacing")]
    pub route_spawn_spacing: f32,

    /// Largest group size; 1 disables grouping
    #[serde(default = "default_max_peds_per_group")]
    pub max_peds_per_group: usize,

    /// Robot-repulsion force
    #[serde(default)]
    pub robot_force: PedRobotForceSettings,

    /// Goal-seeking force
    #[serde(default)]
    pub desired_force: DesiredForceSettings,

    /// Group cohesion force
    #[serde(default)]
    pub group_force: GroupForceSettings,
}

fn default_ped_radius() -> f32 {
    0.4
}
fn default_preferred_speed() -> f32 {
    1.0
}
fn default_speed_mult() -> f32 {
    1.3
}
fn default_peds_per_area() -> f32 {
    0.02
}
fn default_route_spawn_spacing() -> f32 {
    10.0
}
fn default_max_peds_per_group() -> usize {
    6
}

impl Default for PedestrianSettings {
    fn default() -> Self {
        Self {
            radius: default_ped_radius(),
            preferred_speed: default_preferred_speed(),
            peds_speed_mult: default_speed_mult(),
            peds_per_area_m2: default_peds_per_area(),
            route_spawn_spacing: default_route_spawn_spacing(),
            max_peds_per_group: default_max_peds_per_group(),
            robot_force: PedRobotForceSettings::default(),
            desired_force: DesiredForceSettings::default(),
            group_force: GroupForceSettings::default(),
        }
    }
}

impl PedestrianSettings {
    /// Max speed of a single pedestrian
    pub fn max_speed(&self) -> f32 {
        self.preferred_speed * self.peds_speed_mult
    }

    /// Validate crowd and force parameters.
    pub fn validate(&self) -> Result<()> {
        require_positive("ped radius", self.radius)?;
        require_positive("preferred_speed", self.preferred_speed)?;
        require_positive("peds_speed_mult", self.peds_speed_mult)?;
        require_positive("route_spawn_spacing", self.route_spawn_spacing)?;
        if self.peds_per_area_m2 < 0.0 || !self.peds_per_area_m2.is_finite() {
            return Err(Error::Config(format!(
                "peds_per_area_m2 must be non-negative, got {}",
                self.peds_per_area_m2
            )));
        }
        if self.max_peds_per_group == 0 {
            return Err(Error::Config(
                "max_peds_per_group must be at least 1".to_string(),
            ));
        }

        require_positive("robot_force.sigma", self.robot_force.sigma)?;

        let desired = &self.desired_force;
        require_positive("desired_force.relaxation_time", desired.relaxation_time)?;
        require_positive("desired_force.view_distance", desired.view_distance)?;
        if !(0.0..=1.0).contains(&desired.forgetting_factor) {
            return Err(Error::Config(format!(
                "forgetting_factor must be within [0, 1], got {}",
                desired.forgetting_factor
            )));
        }
        if desired.obstacle_avoidance && desired.avoidance_angles.is_empty() {
            return Err(Error::Config(
                "obstacle avoidance needs at least one candidate angle".to_string(),
            ));
        }
        if self.group_force.threshold < 0.0 {
            return Err(Error::Config(format!(
                "group_force.threshold must be non-negative, got {}",
                self.group_force.threshold
            )));
        }
        Ok(())
    }
}
