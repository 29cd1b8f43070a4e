//! Robot kinematics.
//!
//! Two drive models share one action type:
//!
//! | Model | `linear` | `angular` |
//! |-------|----------|-----------|
//! | Differential | linear velocity change (m/s) | angular velocity change (rad/s) |
//! | Bicycle | acceleration (m/s²) | steering angle (rad) |

mod bicycle_drive;
mod differential_drive;

pub use bicycle_drive::{BicycleDriveMotion, BicycleDriveState};
pub use differential_drive::{DifferentialDriveMotion, DifferentialDriveState, WheelSpeeds};

use crate::config::RobotSettings;
use crate::core::{Point2D, Pose2D};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Control action for either drive model
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotAction {
    /// Linear command
    pub linear: f32,
    /// Angular command
    pub angular: f32,
}

impl RobotAction {
    /// Create an action
    pub const fn new(linear: f32, angular: f32) -> Self {
        Self { linear, angular }
    }

    /// Both components are finite
    pub fn is_finite(&self) -> bool {
        self.linear.is_finite() && self.angular.is_finite()
    }
}

impl From<[f32; 2]> for RobotAction {
    fn from(a: [f32; 2]) -> Self {
        Self::new(a[0], a[1])
    }
}

/// Robot with its drive model and state.
#[derive(Clone, Debug)]
pub enum RobotKinematics {
    /// Differential drive robot
    Differential {
        /// Drive model
        motion: DifferentialDriveMotion,
        /// Current state
        state: DifferentialDriveState,
    },
    /// Bicycle model robot
    Bicycle {
        /// Drive model
        motion: BicycleDriveMotion,
        /// Current state
        state: BicycleDriveState,
    },
}

impl RobotKinematics {
    /// Build the configured drive model, standing at the origin.
    pub fn from_settings(settings: &RobotSettings) -> Result<Self> {
        Ok(match settings {
            RobotSettings::Differential(s) => Self::Differential {
                motion: DifferentialDriveMotion::new(s.clone())?,
                state: DifferentialDriveState::default(),
            },
            RobotSettings::Bicycle(s) => Self::Bicycle {
                motion: BicycleDriveMotion::new(s.clone())?,
                state: BicycleDriveState::default(),
            },
        })
    }

    /// Current pose
    pub fn pose(&self) -> Pose2D {
        match self {
            Self::Differential { state, .. } => state.pose,
            Self::Bicycle { state, .. } => state.pose,
        }
    }

    /// Current position
    pub fn position(&self) -> Point2D {
        self.pose().position()
    }

    /// Body radius
    pub fn radius(&self) -> f32 {
        match self {
            Self::Differential { motion, .. } => motion.settings().radius,
            Self::Bicycle { motion, .. } => motion.settings().radius,
        }
    }

    /// Speed observation: (linear, angular) for differential drive,
    /// (velocity, steering angle) for the bicycle model.
    pub fn current_speed(&self) -> (f32, f32) {
        match self {
            Self::Differential { state, .. } => (state.linear_velocity, state.angular_velocity),
            Self::Bicycle { state, .. } => (state.velocity, state.steering_angle),
        }
    }

    /// Lower and upper bound of [`current_speed`](Self::current_speed).
    pub fn speed_bounds(&self) -> ([f32; 2], [f32; 2]) {
        match self {
            Self::Differential { motion, .. } => {
                let s = motion.settings();
                (
                    [0.0, -s.max_angular_speed],
                    [s.max_linear_speed, s.max_angular_speed],
                )
            }
            Self::Bicycle { motion, .. } => {
                let s = motion.settings();
                (
                    [motion.min_velocity(), -s.max_steer],
                    [s.max_velocity, s.max_steer],
                )
            }
        }
    }

    /// Apply one action for `dt` seconds.
    ///
    /// Non-finite actions are rejected and leave the state untouched.
    pub fn apply_action(&mut self, action: RobotAction, dt: f32) -> Result<()> {
        if !action.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "non-finite action ({}, {})",
                action.linear, action.angular
            )));
        }
        match self {
            Self::Differential { motion, state } => *state = motion.advance(state, action, dt),
            Self::Bicycle { motion, state } => *state = motion.advance(state, action, dt),
        }
        Ok(())
    }

    /// Stop the robot and place it at `pose`
    pub fn reset_state(&mut self, pose: Pose2D) {
        match self {
            Self::Differential { state, .. } => *state = DifferentialDriveState::at(pose),
            Self::Bicycle { state, .. } => *state = BicycleDriveState::at(pose),
        }
    }
}
