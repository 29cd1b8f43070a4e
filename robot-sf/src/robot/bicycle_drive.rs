//! Bicycle (front-steered) kinematics.

use super::RobotAction;
use crate::config::BicycleDriveSettings;
use crate::core::Pose2D;
use crate::error::Result;

/// Bicycle drive state
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BicycleDriveState {
    /// Robot pose (rear axle center)
    pub pose: Pose2D,
    /// Signed velocity (m/s)
    pub velocity: f32,
    /// Steering angle of the last command (radians)
    pub steering_angle: f32,
}

impl BicycleDriveState {
    /// Standing still at `pose`
    pub fn at(pose: Pose2D) -> Self {
        Self {
            pose,
            ..Default::default()
        }
    }
}

/// Validated bicycle model.
///
/// Actions are interpreted as `(acceleration, steering_angle)`.
#[derive(Clone, Debug)]
pub struct BicycleDriveMotion {
    settings: BicycleDriveSettings,
}

impl BicycleDriveMotion {
    /// Validate settings and build the model
    pub fn new(settings: BicycleDriveSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Drive settings
    pub fn settings(&self) -> &BicycleDriveSettings {
        &self.settings
    }

    /// Lowest reachable velocity
    pub fn min_velocity(&self) -> f32 {
        if self.settings.allow_backwards {
            -self.settings.max_velocity
        } else {
            0.0
        }
    }

    /// Advance `state` by one step of `dt` seconds.
    pub fn advance(&self, state: &BicycleDriveState, action: RobotAction, dt: f32) -> BicycleDriveState {
        let s = &self.settings;
        let accel = action.linear.clamp(-s.max_accel, s.max_accel);
        let steer = action.angular.clamp(-s.max_steer, s.max_steer);

        let v = state.velocity;
        let old_theta = state.pose.theta;
        let new_theta = old_theta + v / s.wheelbase * steer.tan() * dt;
        let mid_theta = (old_theta + new_theta) / 2.0;

        BicycleDriveState {
            pose: Pose2D::new(
                state.pose.x + v * mid_theta.cos() * dt,
                state.pose.y + v * mid_theta.sin() * dt,
                new_theta,
            ),
            velocity: (v + accel * dt).clamp(self.min_velocity(), s.max_velocity),
            steering_angle: steer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_accelerates_from_rest() {
        let motion = BicycleDriveMotion::new(BicycleDriveSettings::default()).unwrap();
        let state = BicycleDriveState::at(Pose2D::identity());

        let next = motion.advance(&state, RobotAction::new(1.0, 0.0), 0.5);
        // velocity applies from the next step on
        assert_eq!(next.pose.position().x, 0.0);
        assert_relative_eq!(next.velocity, 0.5);

        let next = motion.advance(&next, RobotAction::new(1.0, 0.0), 0.5);
        assert_relative_eq!(next.pose.x, 0.25);
        assert_relative_eq!(next.velocity, 1.0);
    }

    #[test]
    fn test_steering_and_velocity_clamped() {
        let settings = BicycleDriveSettings::default();
        let motion = BicycleDriveMotion::new(settings.clone()).unwrap();
        let state = BicycleDriveState {
            pose: Pose2D::identity(),
            velocity: 2.9,
            steering_angle: 0.0,
        };

        let next = motion.advance(&state, RobotAction::new(10.0, 3.0), 1.0);
        assert_eq!(next.steering_angle, settings.max_steer);
        assert_eq!(next.velocity, settings.max_velocity);
        assert!(next.pose.theta > 0.0);
    }

    #[test]
    fn test_no_backwards_by_default() {
        let motion = BicycleDriveMotion::new(BicycleDriveSettings::default()).unwrap();
        let state = BicycleDriveState::at(Pose2D::identity());
        let next = motion.advance(&state, RobotAction::new(-1.0, 0.0), 1.0);
        assert_eq!(next.velocity, 0.0);

        let motion = BicycleDriveMotion::new(BicycleDriveSettings {
            allow_backwards: true,
            ..Default::default()
        })
        .unwrap();
        let next = motion.advance(&state, RobotAction::new(-1.0, 0.0), 1.0);
        assert_relative_eq!(next.velocity, -1.0);
    }

    #[test]
    fn test_rejects_invalid_wheelbase() {
        let settings = BicycleDriveSettings {
            wheelbase: -1.0,
            ..Default::default()
        };
        assert!(BicycleDriveMotion::new(settings).is_err());
    }
}
