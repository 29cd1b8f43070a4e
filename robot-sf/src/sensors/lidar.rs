//! Simulated range scanner.
//!
//! Casts `num_rays` rays evenly spread over the scan aperture, centered on
//! the robot heading, against obstacle segments and pedestrian circles.
//! Ray `i` points at `θ - aperture/2 + (i + 0.5) * aperture / num_rays`.

use super::noise::NoiseGenerator;
use crate::config::LidarScannerSettings;
use crate::core::{Point2D, Pose2D, ray_circle_intersection};
use crate::error::Result;
use crate::occupancy::ContinuousOccupancy;

/// Lidar simulator
#[derive(Clone, Debug)]
pub struct LidarScanner {
    settings: LidarScannerSettings,
    noise: NoiseGenerator,
}

impl LidarScanner {
    /// Validate settings and create the scanner
    pub fn new(settings: LidarScannerSettings, noise: NoiseGenerator) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings, noise })
    }

    /// Scanner settings
    pub fn settings(&self) -> &LidarScannerSettings {
        &self.settings
    }

    /// Number of rays per scan
    pub fn num_rays(&self) -> usize {
        self.settings.num_rays
    }

    /// World angle of every ray for a robot at `pose`
    pub fn ray_angles(&self, pose: Pose2D) -> impl Iterator<Item = f32> + '_ {
        let aperture = self.settings.scan_aperture;
        let n = self.settings.num_rays as f32;
        let start = pose.theta - aperture / 2.0;
        (0..self.settings.num_rays).map(move |i| start + (i as f32 + 0.5) * aperture / n)
    }

    /// Noise-free distance along one ray, `max_scan_dist` on a miss.
    pub fn cast_ray(&self, origin: Point2D, angle: f32, occupancy: &ContinuousOccupancy) -> f32 {
        let max_range = self.settings.max_scan_dist;
        let direction = Point2D::from_angle(angle);

        let obstacle_hit = occupancy
            .obstacle_lines()
            .iter()
            .filter_map(|line| line.ray_intersection(origin, direction));
        let ped_radius = occupancy.ped_radius();
        let ped_hit = occupancy
            .ped_positions()
            .iter()
            .filter_map(|p| ray_circle_intersection(origin, direction, *p, ped_radius));

        obstacle_hit
            .chain(ped_hit)
            .filter(|d| d.is_finite())
            .fold(max_range, f32::min)
    }

    /// One scan from `pose`, one range per ray in `[0, max_scan_dist]`.
    pub fn scan(&mut self, pose: Pose2D, occupancy: &ContinuousOccupancy) -> Vec<f32> {
        let origin = pose.position();
        let max_range = self.settings.max_scan_dist;
        let angles: Vec<f32> = self.ray_angles(pose).collect();

        let mut ranges = Vec::with_capacity(angles.len());
        for angle in angles {
            let distance = self.cast_ray(origin, angle, occupancy);
            ranges.push(self.apply_noise(distance, max_range));
        }
        ranges
    }

    fn apply_noise(&mut self, distance: f32, max_range: f32) -> f32 {
        let noise = &self.settings.noise;
        if self.noise.chance(noise.lost_scan_prob) {
            return max_range;
        }
        if self.noise.chance(noise.corrupt_scan_prob) {
            return self.noise.uniform_up_to(max_range);
        }
        if distance >= max_range {
            return max_range;
        }
        let measured = distance + self.noise.biased_gaussian(noise.range_bias, noise.range_stddev);
        measured.clamp(0.0, max_range)
    }

    /// Ray end points in world coordinates, for rendering
    pub fn ray_end_points(&self, pose: Pose2D, ranges: &[f32]) -> Vec<Point2D> {
        let origin = pose.position();
        self.ray_angles(pose)
            .zip(ranges)
            .map(|(angle, range)| origin + Point2D::from_angle(angle) * *range)
            .collect()
    }
}
