//! Temporal stacking and normalization of sensor frames.
//!
//! The last `stack_steps` frames are kept in a ring buffer. Each frame is
//! a drive state `[speed_0, speed_1, target_dist, target_angle,
//! next_target_angle]` plus one lidar scan. The stacked window is divided
//! elementwise by the upper bounds of [`ObservationBounds`].

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::VecDeque;
use std::f32::consts::PI;

/// Drive state values per frame
pub const DRIVE_STATE_LEN: usize = 5;

/// Value ranges of the unnormalized observation.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservationBounds {
    /// Lower bound of each drive state entry
    pub drive_low: [f32; DRIVE_STATE_LEN],
    /// Upper bound of each drive state entry
    pub drive_high: [f32; DRIVE_STATE_LEN],
    /// Largest lidar range
    pub max_scan_dist: f32,
    /// Rays per scan
    pub num_rays: usize,
    /// Frames per observation
    pub stack_steps: usize,
}

impl ObservationBounds {
    /// Bounds from the robot speed range, map size and scanner range.
    ///
    /// Every upper bound must be strictly positive.
    pub fn new(
        speed_bounds: ([f32; 2], [f32; 2]),
        max_target_dist: f32,
        max_scan_dist: f32,
        num_rays: usize,
        stack_steps: usize,
    ) -> Result<Self> {
        let (low, high) = speed_bounds;
        let bounds = Self {
            drive_low: [low[0], low[1], 0.0, -PI, -PI],
            drive_high: [high[0], high[1], max_target_dist, PI, PI],
            max_scan_dist,
            num_rays,
            stack_steps,
        };
        if bounds
            .drive_high
            .iter()
            .chain(std::iter::once(&max_scan_dist))
            .any(|h| !(h.is_finite() && *h > 0.0))
        {
            return Err(Error::Config(format!(
                "observation upper bounds must be positive: {:?}, scan {}",
                bounds.drive_high, max_scan_dist
            )));
        }
        if num_rays == 0 || stack_steps == 0 {
            return Err(Error::Config(
                "observation needs at least one ray and one frame".to_string(),
            ));
        }
        Ok(bounds)
    }

    /// Lower bound of the normalized drive state
    pub fn normalized_drive_low(&self) -> [f32; DRIVE_STATE_LEN] {
        let mut out = [0.0; DRIVE_STATE_LEN];
        for (o, (l, h)) in out.iter_mut().zip(self.drive_low.iter().zip(&self.drive_high)) {
            *o = l / h;
        }
        out
    }

    /// Upper bound of the normalized drive state (all ones)
    pub fn normalized_drive_high(&self) -> [f32; DRIVE_STATE_LEN] {
        [1.0; DRIVE_STATE_LEN]
    }

    /// Normalized ray range (always `[0, 1]`)
    pub fn normalized_ray_range(&self) -> (f32, f32) {
        (0.0, 1.0)
    }
}

/// Stacked, normalized observation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Observation {
    /// `stack_steps` drive states, oldest first
    pub drive_state: Vec<[f32; DRIVE_STATE_LEN]>,
    /// `stack_steps` scans of `num_rays` ranges, oldest first
    pub rays: Vec<Vec<f32>>,
}

/// Ring buffer of the last frames.
#[derive(Clone, Debug)]
pub struct SensorFusion {
    bounds: ObservationBounds,
    drive_cache: VecDeque<[f32; DRIVE_STATE_LEN]>,
    ray_cache: VecDeque<Vec<f32>>,
}

impl SensorFusion {
    /// Empty fusion buffer
    pub fn new(bounds: ObservationBounds) -> Self {
        let n = bounds.stack_steps;
        Self {
            bounds,
            drive_cache: VecDeque::with_capacity(n),
            ray_cache: VecDeque::with_capacity(n),
        }
    }

    /// Observation bounds
    pub fn bounds(&self) -> &ObservationBounds {
        &self.bounds
    }

    /// Forget all frames; the next observation refills the window.
    pub fn reset(&mut self) {
        self.drive_cache.clear();
        self.ray_cache.clear();
    }

    /// Push a frame and return the normalized window.
    ///
    /// The first frame after [`reset`](Self::reset) fills the whole window.
    pub fn next_obs(
        &mut self,
        speed: (f32, f32),
        target: [f32; 3],
        rays: Vec<f32>,
    ) -> Result<Observation> {
        if rays.len() != self.bounds.num_rays {
            return Err(Error::InvalidParameter(format!(
                "expected {} rays, got {}",
                self.bounds.num_rays,
                rays.len()
            )));
        }
        let drive = [speed.0, speed.1, target[0], target[1], target[2]];
        let n = self.bounds.stack_steps;

        if self.drive_cache.is_empty() {
            for _ in 0..n {
                self.drive_cache.push_back(drive);
                self.ray_cache.push_back(rays.clone());
            }
        } else {
            self.drive_cache.push_back(drive);
            self.ray_cache.push_back(rays);
            while self.drive_cache.len() > n {
                self.drive_cache.pop_front();
                self.ray_cache.pop_front();
            }
        }

        let high = &self.bounds.drive_high;
        let drive_state = self
            .drive_cache
            .iter()
            .map(|frame| {
                let mut out = [0.0; DRIVE_STATE_LEN];
                for (o, (v, h)) in out.iter_mut().zip(frame.iter().zip(high)) {
                    *o = v / h;
                }
                out
            })
            .collect();

        let max_scan = self.bounds.max_scan_dist;
        let rays = self
            .ray_cache
            .iter()
            .map(|scan| scan.iter().map(|r| r / max_scan).collect())
            .collect();

        Ok(Observation { drive_state, rays })
    }
}
