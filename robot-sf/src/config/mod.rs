//! Environment configuration
//!
//! Loaded from a TOML file; every section and field falls back to its
//! default when omitted.
//!
//! ```toml
//! random_seed = 42
//!
//! [sim]
//! time_per_step_in_secs = 0.1
//!
//! [robot]
//! type = "differential"
//! max_linear_speed = 2.0
//!
//! [lidar]
//! num_rays = 272
//! ```

mod pedestrian;
mod robot;
mod sensor;
mod simulation;

pub use pedestrian::{
    DesiredForceSettings, GroupForceSettings, PedRobotForceSettings, PedestrianSettings,
};
pub use robot::{BicycleDriveSettings, DifferentialDriveSettings, RobotSettings};
pub use sensor::{LidarNoiseSettings, LidarScannerSettings};
pub use simulation::{RewardSettings, SimulationSettings};

use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level environment configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EnvSettings {
    /// Episode timing and spawn sampling
    #[serde(default)]
    pub sim: SimulationSettings,

    /// Drive model
    #[serde(default)]
    pub robot: RobotSettings,

    /// Range scanner
    #[serde(default)]
    pub lidar: LidarScannerSettings,

    /// Crowd and pedestrian forces
    #[serde(default)]
    pub peds: PedestrianSettings,

    /// Default reward shaping
    #[serde(default)]
    pub reward: RewardSettings,

    /// Seed for every random generator (0 = entropy)
    #[serde(default)]
    pub random_seed: u64,
}

impl EnvSettings {
    /// Load and validate settings from a TOML file
    ///
    /// ```no_run
    /// use robot_sf::config::EnvSettings;
    ///
    /// let settings = EnvSettings::load("robot_sf.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate settings from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let settings: EnvSettings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.sim.validate()?;
        self.robot.validate()?;
        self.lidar.validate()?;
        self.peds.validate()
    }
}
