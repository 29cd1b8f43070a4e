//! Robot drive model settings.

use crate::error::{Error, Result};
use serde::Deserialize;

/// Differential drive parameters.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DifferentialDriveSettings {
    /// Robot body radius (meters)
    #[serde(default = "default_radius")]
    pub radius: f32,

    /// Maximum linear velocity (m/s)
    #[serde(default = "default_max_linear_speed")]
    pub max_linear_speed: f32,

    /// Maximum angular velocity (rad/s)
    #[serde(default = "default_max_angular_speed")]
    pub max_angular_speed: f32,

    /// Wheel radius (meters)
    #[serde(default = "default_wheel_radius")]
    pub wheel_radius: f32,

    /// Distance between the two wheels (meters)
    #[serde(default = "default_interaxis_length")]
    pub interaxis_length: f32,
}

fn default_radius() -> f32 {
    1.0
}
fn default_max_linear_speed() -> f32 {
    2.0
}
fn default_max_angular_speed() -> f32 {
    0.5
}
fn default_wheel_radius() -> f32 {
    0.05
}
fn default_interaxis_length() -> f32 {
    0.3
}

impl Default for DifferentialDriveSettings {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            max_linear_speed: default_max_linear_speed(),
            max_angular_speed: default_max_angular_speed(),
            wheel_radius: default_wheel_radius(),
            interaxis_length: default_interaxis_length(),
        }
    }
}

impl DifferentialDriveSettings {
    /// Reject non-positive geometry or speed limits.
    pub fn validate(&self) -> Result<()> {
        require_positive("radius", self.radius)?;
        require_positive("wheel_radius", self.wheel_radius)?;
        require_positive("max_linear_speed", self.max_linear_speed)?;
        require_positive("max_angular_speed", self.max_angular_speed)?;
        require_positive("interaxis_length", self.interaxis_length)
    }
}

/// Bicycle (ackermann) drive parameters.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BicycleDriveSettings {
    /// Robot body radius used for collisions (meters)
    #[serde(default = "default_radius")]
    pub radius: f32,

    /// Distance between front and rear axle (meters)
    #[serde(default = "default_wheelbase")]
    pub wheelbase: f32,

    /// Maximum steering angle (radians)
    #[serde(default = "default_max_steer")]
    pub max_steer: f32,

    /// Maximum velocity (m/s)
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f32,

    /// Maximum acceleration (m/s²)
    #[serde(default = "default_max_accel")]
    pub max_accel: f32,

    /// Allow driving backwards
    #[serde(default)]
    pub allow_backwards: bool,
}

fn default_wheelbase() -> f32 {
    1.0
}
fn default_max_steer() -> f32 {
    0.78
}
fn default_max_velocity() -> f32 {
    3.0
}
fn default_max_accel() -> f32 {
    1.0
}

impl Default for BicycleDriveSettings {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            wheelbase: default_wheelbase(),
            max_steer: default_max_steer(),
            max_velocity: default_max_velocity(),
            max_accel: default_max_accel(),
            allow_backwards: false,
        }
    }
}

impl BicycleDriveSettings {
    /// Reject non-positive geometry or limits.
    pub fn validate(&self) -> Result<()> {
        require_positive("radius", self.radius)?;
        require_positive("wheelbase", self.wheelbase)?;
        require_positive("max_steer", self.max_steer)?;
        require_positive("max_velocity", self.max_velocity)?;
        require_positive("max_accel", self.max_accel)?;
        if self.max_steer >= std::f32::consts::FRAC_PI_2 {
            return Err(Error::Config(format!(
                "max_steer must be below pi/2, got {}",
                self.max_steer
            )));
        }
        Ok(())
    }
}

/// Drive model selection.
///
/// ```toml
/// [robot]
/// type = "differential"
/// radius = 1.0
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RobotSettings {
    /// Two independently driven wheels
    Differential(DifferentialDriveSettings),
    /// Front-steered bicycle model
    Bicycle(BicycleDriveSettings),
}

impl Default for RobotSettings {
    fn default() -> Self {
        Self::Differential(DifferentialDriveSettings::default())
    }
}

impl RobotSettings {
    /// Robot body radius
    pub fn radius(&self) -> f32 {
        match self {
            Self::Differential(s) => s.radius,
            Self::Bicycle(s) => s.radius,
        }
    }

    /// Validate the selected drive model
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Differential(s) => s.validate(),
            Self::Bicycle(s) => s.validate(),
        }
    }
}

pub(crate) fn require_positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(DifferentialDriveSettings::default().validate().is_ok());
        assert!(BicycleDriveSettings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let mut s = DifferentialDriveSettings::default();
        s.interaxis_length = 0.0;
        assert!(matches!(s.validate(), Err(Error::Config(_))));

        let mut s = DifferentialDriveSettings::default();
        s.wheel_radius = -0.1;
        assert!(s.validate().is_err());

        let mut b = BicycleDriveSettings::default();
        b.max_velocity = f32::NAN;
        assert!(b.validate().is_err());
    }

    #[test]
    fn test_tagged_deserialization() {
        let settings: RobotSettings = toml::from_str(
            r#"
type = "bicycle"
wheelbase = 2.0
"#,
        )
        .unwrap();
        match settings {
            RobotSettings::Bicycle(b) => {
                assert_eq!(b.wheelbase, 2.0);
                assert_eq!(b.max_steer, 0.78);
            }
            other => panic!("unexpected drive {:?}", other),
        }
    }
}
