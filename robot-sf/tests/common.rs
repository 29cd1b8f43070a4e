//! Shared maps and settings for the integration tests.

#![allow(dead_code)]

use robot_sf::config::{EnvSettings, LidarNoiseSettings, LidarScannerSettings};
use robot_sf::core::Point2D;
use robot_sf::map::{MapDefinition, MapDefinitionPool, MapLayout, Obstacle, Zone};

/// Rays per scan in the test settings.
pub const NUM_RAYS: usize = 36;

/// Axis-aligned zone from corner coordinates.
pub fn zone(x0: f32, y0: f32, x1: f32, y1: f32) -> Zone {
    Zone::axis_aligned(Point2D::new(x0, y0), Point2D::new(x1, y1))
}

/// Settings with a short episode and a coarse lidar.
pub fn fast_settings(seed: u64) -> EnvSettings {
    let mut settings = EnvSettings {
        random_seed: seed,
        lidar: LidarScannerSettings {
            num_rays: NUM_RAYS,
            ..Default::default()
        },
        ..Default::default()
    };
    settings.sim.sim_time_in_secs = 5.0;
    settings
}

/// Same as [`fast_settings`] with a noise-free lidar.
pub fn clean_settings(seed: u64) -> EnvSettings {
    let mut settings = fast_settings(seed);
    settings.lidar.noise = LidarNoiseSettings::none();
    settings
}

/// 40 x 40 m map: robot spawns on the left, goals on the right, a crowd
/// in the middle and a box obstacle near the top.
pub fn open_map() -> MapDefinition {
    MapDefinition::new(MapLayout {
        width: 40.0,
        height: 40.0,
        obstacles: vec![Obstacle::new(vec![
            Point2D::new(15.0, 32.0),
            Point2D::new(25.0, 32.0),
            Point2D::new(25.0, 36.0),
            Point2D::new(15.0, 36.0),
        ])],
        robot_spawn_zones: vec![zone(2.0, 2.0, 8.0, 8.0)],
        robot_goal_zones: vec![zone(30.0, 30.0, 38.0, 38.0)],
        ped_crowded_zones: vec![zone(15.0, 15.0, 25.0, 25.0)],
        ..Default::default()
    })
    .expect("valid test map")
}

/// Straight corridor: spawn on the left, goal a few meters ahead.
pub fn short_hop_map() -> MapDefinition {
    MapDefinition::new(MapLayout {
        width: 40.0,
        height: 40.0,
        robot_spawn_zones: vec![zone(5.0, 19.0, 6.0, 21.0)],
        robot_goal_zones: vec![zone(9.0, 19.0, 10.0, 21.0)],
        ..Default::default()
    })
    .expect("valid test map")
}

/// A wall across the whole map between spawn and goal.
pub fn walled_map() -> MapDefinition {
    MapDefinition::new(MapLayout {
        width: 40.0,
        height: 40.0,
        obstacles: vec![Obstacle::new(vec![
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 40.0),
        ])],
        robot_spawn_zones: vec![zone(2.0, 18.0, 4.0, 22.0)],
        robot_goal_zones: vec![zone(34.0, 18.0, 38.0, 22.0)],
        ..Default::default()
    })
    .expect("valid test map")
}

/// Goal zone sealed inside an obstacle: no goal can ever be sampled.
pub fn unsatisfiable_map() -> MapDefinition {
    MapDefinition::new(MapLayout {
        width: 40.0,
        height: 40.0,
        obstacles: vec![Obstacle::new(vec![
            Point2D::new(28.0, 28.0),
            Point2D::new(39.0, 28.0),
            Point2D::new(39.0, 39.0),
            Point2D::new(28.0, 39.0),
        ])],
        robot_spawn_zones: vec![zone(2.0, 2.0, 8.0, 8.0)],
        robot_goal_zones: vec![zone(30.0, 30.0, 37.0, 37.0)],
        ..Default::default()
    })
    .expect("valid test map")
}

/// Pool holding a single map.
pub fn pool(map: MapDefinition) -> MapDefinitionPool {
    MapDefinitionPool::single(map)
}
