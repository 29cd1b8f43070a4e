//! Robot sensors and observation assembly.
//!
//! - [`lidar`]: range scanner against obstacles and pedestrians
//! - [`target`]: robot-relative goal offset
//! - [`fusion`]: stacking and normalization into an [`Observation`]
//! - [`noise`]: seeded random sources

pub mod fusion;
pub mod lidar;
pub mod noise;
pub mod target;

pub use fusion::{DRIVE_STATE_LEN, Observation, ObservationBounds, SensorFusion};
pub use lidar::LidarScanner;
pub use noise::{NoiseGenerator, seeded_rng};
pub use target::{rel_pos, target_sensor_obs, turn_angle};
