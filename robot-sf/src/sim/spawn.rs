//! Robot spawn and goal sampling.
//!
//! Candidates are drawn uniformly from zones and rejected until they are
//! inside the map with a margin of one robot radius, at least one robot
//! radius away from every obstacle, and (for goals) far enough from the
//! spawn point. Every draw has a bounded number of attempts.

use crate::config::SimulationSettings;
use crate::core::{Point2D, Pose2D};
use crate::error::{Error, Result};
use crate::map::Zone;
use crate::occupancy::ContinuousOccupancy;
use rand::Rng;

/// Sampled start pose and the waypoints the robot drives through.
#[derive(Clone, Debug, PartialEq)]
pub struct RobotSpawn {
    /// Start pose, heading towards the first waypoint
    pub pose: Pose2D,
    /// Route waypoints followed by the final goal
    pub waypoints: Vec<Point2D>,
}

impl RobotSpawn {
    /// Final goal of the route
    pub fn goal(&self) -> Option<Point2D> {
        self.waypoints.last().copied()
    }
}

/// Rejection sampler for robot spawns on one map.
#[derive(Clone, Copy, Debug)]
pub struct SpawnSampler {
    clearance: f32,
    min_goal_distance: f32,
    max_attempts: usize,
}

impl SpawnSampler {
    /// Sampler for a robot of radius `robot_radius` on the map of `occupancy`.
    ///
    /// The minimum spawn-to-goal distance is
    /// `max(width, height) / spawn_clearance_divisor`.
    pub fn new(occupancy: &ContinuousOccupancy, settings: &SimulationSettings) -> Self {
        let map = occupancy.map();
        Self {
            clearance: occupancy.robot_radius(),
            min_goal_distance: map.width().max(map.height()) / settings.spawn_clearance_divisor,
            max_attempts: settings.max_spawn_attempts,
        }
    }

    /// Minimum distance between spawn and final goal
    pub fn min_goal_distance(&self) -> f32 {
        self.min_goal_distance
    }

    /// Draw a spawn pose and route.
    ///
    /// With robot routes on the map a random route is taken: the robot
    /// spawns in its spawn zone and drives its waypoints, then to a goal
    /// sampled in its goal zone. Without routes, spawn and goal zones are
    /// picked independently.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        occupancy: &ContinuousOccupancy,
        rng: &mut R,
    ) -> Result<RobotSpawn> {
        let map = occupancy.map();
        let routes = map.robot_routes();

        let (spawn_zone, goal_zone, mut waypoints) = if routes.is_empty() {
            let spawn = pick(map.robot_spawn_zones(), rng, "robot spawn zone")?;
            let goal = pick(map.robot_goal_zones(), rng, "robot goal zone")?;
            (spawn, goal, Vec::new())
        } else {
            let route = &routes[rng.gen_range(0..routes.len())];
            let spawn = map
                .robot_spawn_zones()
                .get(route.spawn_zone)
                .ok_or(Error::SpawnFailed {
                    what: "robot spawn zone",
                    attempts: 0,
                })?;
            let goal = map
                .robot_goal_zones()
                .get(route.goal_zone)
                .ok_or(Error::SpawnFailed {
                    what: "robot goal zone",
                    attempts: 0,
                })?;
            (spawn, goal, route.waypoints.clone())
        };

        let start = self.sample_point(spawn_zone, "robot spawn", rng, |p| {
            self.is_valid(occupancy, p)
        })?;
        let goal = self.sample_point(goal_zone, "robot goal", rng, |p| {
            self.is_valid(occupancy, p) && p.distance(start) >= self.min_goal_distance
        })?;
        waypoints.push(goal);

        let heading = start.angle_to(waypoints[0]);
        Ok(RobotSpawn {
            pose: Pose2D::new(start.x, start.y, heading),
            waypoints,
        })
    }

    fn is_valid(&self, occupancy: &ContinuousOccupancy, point: Point2D) -> bool {
        occupancy.in_bounds(point, self.clearance)
            && occupancy.is_obstacle_free(point, self.clearance)
    }

    fn sample_point<R, F>(
        &self,
        zone: &Zone,
        what: &'static str,
        rng: &mut R,
        accept: F,
    ) -> Result<Point2D>
    where
        R: Rng + ?Sized,
        F: Fn(Point2D) -> bool,
    {
        for attempt in 0..self.max_attempts {
            let candidate = zone.sample(rng);
            if accept(candidate) {
                return Ok(candidate);
            }
            if attempt + 1 == self.max_attempts / 2 {
                log::warn!(
                    "Sampling {} rejected {} candidates so far",
                    what,
                    attempt + 1
                );
            }
        }
        Err(Error::SpawnFailed {
            what,
            attempts: self.max_attempts,
        })
    }
}

fn pick<'a, R: Rng + ?Sized>(
    zones: &'a [Zone],
    rng: &mut R,
    what: &'static str,
) -> Result<&'a Zone> {
    if zones.is_empty() {
        return Err(Error::SpawnFailed { what, attempts: 0 });
    }
    Ok(&zones[rng.gen_range(0..zones.len())])
}
