//! Range scanner settings.

use super::robot::require_positive;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::f32::consts::TAU;

/// Noise configuration for lidar measurements
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LidarNoiseSettings {
    /// Range measurement noise standard deviation (meters)
    #[serde(default = "default_range_stddev")]
    pub range_stddev: f32,

    /// Systematic range bias (meters)
    #[serde(default)]
    pub range_bias: f32,

    /// Probability that a ray is lost and reports max range (0.0-1.0)
    #[serde(default = "default_lost_scan_prob")]
    pub lost_scan_prob: f32,

    /// Probability that a ray reports a uniformly random range (0.0-1.0)
    #[serde(default = "default_corrupt_scan_prob")]
    pub corrupt_scan_prob: f32,
}

fn default_range_stddev() -> f32 {
    0.01
}
fn default_lost_scan_prob() -> f32 {
    0.005
}
fn default_corrupt_scan_prob() -> f32 {
    0.002
}

impl Default for LidarNoiseSettings {
    fn default() -> Self {
        Self {
            range_stddev: default_range_stddev(),
            range_bias: 0.0,
            lost_scan_prob: default_lost_scan_prob(),
            corrupt_scan_prob: default_corrupt_scan_prob(),
        }
    }
}

impl LidarNoiseSettings {
    /// Noise-free scanner, mostly useful for tests.
    pub fn none() -> Self {
        Self {
            range_stddev: 0.0,
            range_bias: 0.0,
            lost_scan_prob: 0.0,
            corrupt_scan_prob: 0.0,
        }
    }
}

/// Lidar scanner configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LidarScannerSettings {
    /// Number of rays per scan
    #[serde(default = "default_num_rays")]
    pub num_rays: usize,

    /// Angular aperture centered on the robot heading (radians)
    #[serde(default = "default_scan_aperture")]
    pub scan_aperture: f32,

    /// Maximum detection range (meters)
    #[serde(default = "default_max_scan_dist")]
    pub max_scan_dist: f32,

    /// Noise configuration
    #[serde(default)]
    pub noise: LidarNoiseSettings,
}

fn default_num_rays() -> usize {
    272
}
fn default_scan_aperture() -> f32 {
    TAU
}
fn default_max_scan_dist() -> f32 {
    10.0
}

impl Default for LidarScannerSettings {
    fn default() -> Self {
        Self {
            num_rays: default_num_rays(),
            scan_aperture: default_scan_aperture(),
            max_scan_dist: default_max_scan_dist(),
            noise: LidarNoiseSettings::default(),
        }
    }
}

impl LidarScannerSettings {
    /// Validate ray count, aperture, range and noise probabilities.
    pub fn validate(&self) -> Result<()> {
        if self.num_rays == 0 {
            return Err(Error::Config("num_rays must be at least 1".to_string()));
        }
        require_positive("scan_aperture", self.scan_aperture)?;
        if self.scan_aperture > TAU + 1e-6 {
            return Err(Error::Config(format!(
                "scan_aperture must not exceed 2*pi, got {}",
                self.scan_aperture
            )));
        }
        require_positive("max_scan_dist", self.max_scan_dist)?;
        if self.noise.range_stddev < 0.0 || !self.noise.range_stddev.is_finite() {
            return Err(Error::Config(format!(
                "range_stddev must be non-negative, got {}",
                self.noise.range_stddev
            )));
        }
        for (name, p) in [
            ("lost_scan_prob", self.noise.lost_scan_prob),
            ("corrupt_scan_prob", self.noise.corrupt_scan_prob),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }
}
