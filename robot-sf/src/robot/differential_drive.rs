//! Differential drive kinematics.
//!
//! The action is a velocity *change* (linear, angular) added to the current
//! velocity. The pose is integrated from the averaged wheel speeds of the
//! previous and the new command, using the midpoint heading.

use super::RobotAction;
use crate::config::DifferentialDriveSettings;
use crate::core::Pose2D;
use crate::error::Result;

/// Wheel speeds (left, right) in rad/s
pub type WheelSpeeds = (f32, f32);

/// Differential drive state
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DifferentialDriveState {
    /// Robot pose
    pub pose: Pose2D,
    /// Linear velocity (m/s)
    pub linear_velocity: f32,
    /// Angular velocity (rad/s)
    pub angular_velocity: f32,
    /// Wheel speeds before the last move
    pub last_wheel_speeds: WheelSpeeds,
    /// Current wheel speeds
    pub wheel_speeds: WheelSpeeds,
}

impl DifferentialDriveState {
    /// Standing still at `pose`
    pub fn at(pose: Pose2D) -> Self {
        Self {
            pose,
            ..Default::default()
        }
    }
}

/// Validated differential drive model
#[derive(Clone, Debug)]
pub struct DifferentialDriveMotion {
    settings: DifferentialDriveSettings,
}

impl DifferentialDriveMotion {
    /// Validate settings and build the model
    pub fn new(settings: DifferentialDriveSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Drive settings
    pub fn settings(&self) -> &DifferentialDriveSettings {
        &self.settings
    }

    /// Advance `state` by one step of `dt` seconds.
    pub fn advance(
        &self,
        state: &DifferentialDriveState,
        action: RobotAction,
        dt: f32,
    ) -> DifferentialDriveState {
        let (linear, angular) = self.robot_velocity(state, action);
        let new_wheels = self.wheel_speeds(linear, angular);

        let (old_l, old_r) = state.wheel_speeds;
        let avg_left = (old_l + new_wheels.0) / 2.0;
        let avg_right = (old_r + new_wheels.1) / 2.0;

        let r_w = self.settings.wheel_radius;
        let distance = r_w / 2.0 * (avg_left + avg_right) * dt;
        let turn = r_w / self.settings.interaxis_length * (avg_right - avg_left) * dt;

        let old_theta = state.pose.theta;
        let new_theta = old_theta + turn;
        let mid_theta = (old_theta + new_theta) / 2.0;

        DifferentialDriveState {
            pose: Pose2D::new(
                state.pose.x + distance * mid_theta.cos(),
                state.pose.y + distance * mid_theta.sin(),
                new_theta,
            ),
            linear_velocity: linear,
            angular_velocity: angular,
            last_wheel_speeds: state.wheel_speeds,
            wheel_speeds: new_wheels,
        }
    }

    fn robot_velocity(&self, state: &DifferentialDriveState, action: RobotAction) -> (f32, f32) {
        let max_ang = self.settings.max_angular_speed;
        let linear = (state.linear_velocity + action.linear).clamp(0.0, self.settings.max_linear_speed);
        let angular = (state.angular_velocity + action.angular).clamp(-max_ang, max_ang);
        (linear, angular)
    }

    fn wheel_speeds(&self, linear: f32, angular: f32) -> WheelSpeeds {
        let diff = self.settings.interaxis_length * angular / 2.0;
        let r_w = self.settings.wheel_radius;
        ((linear - diff) / r_w, (linear + diff) / r_w)
    }
}
