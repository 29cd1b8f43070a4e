//! Map definition: bounds, obstacles, zones and routes.

use super::obstacle::Obstacle;
use super::zone::{GlobalRoute, Zone};
use crate::core::{Line2D, MIN_SEGMENT_LENGTH, Point2D};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Raw map layout as written in a map file.
///
/// ```yaml
/// width: 20.0
/// height: 10.0
/// obstacles:
///   - [[8.0, 3.0], [12.0, 3.0], [12.0, 7.0], [8.0, 7.0]]
/// robot_spawn_zones:
///   - [[3.0, 1.0], [1.0, 1.0], [1.0, 3.0]]
/// robot_goal_zones:
///   - [[19.0, 7.0], [17.0, 7.0], [17.0, 9.0]]
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MapLayout {
    /// Map width in meters
    pub width: f32,
    /// Map height in meters
    pub height: f32,
    /// Polygonal obstacles
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    /// Robot spawn zones (used when there are no robot routes)
    #[serde(default)]
    pub robot_spawn_zones: Vec<Zone>,
    /// Robot goal zones
    #[serde(default)]
    pub robot_goal_zones: Vec<Zone>,
    /// Robot routes between robot spawn and goal zones
    #[serde(default)]
    pub robot_routes: Vec<GlobalRoute>,
    /// Pedestrian route start zones
    #[serde(default)]
    pub ped_spawn_zones: Vec<Zone>,
    /// Pedestrian route end zones
    #[serde(default)]
    pub ped_goal_zones: Vec<Zone>,
    /// Zones filled with wandering pedestrians
    #[serde(default)]
    pub ped_crowded_zones: Vec<Zone>,
    /// Routes walked by route-following pedestrians
    #[serde(default)]
    pub ped_routes: Vec<GlobalRoute>,
}

/// Validated map with precomputed obstacle segments.
#[derive(Clone, Debug)]
pub struct MapDefinition {
    layout: MapLayout,
    obstacle_lines: Vec<Line2D>,
    max_target_dist: f32,
}

impl MapDefinition {
    /// Validate a layout and build its obstacle segments.
    ///
    /// Degenerate obstacle edges are dropped; the four map boundaries are
    /// always added as segments.
    pub fn new(layout: MapLayout) -> Result<Self> {
        Self::validate(&layout)?;

        let mut dropped = 0usize;
        let mut obstacle_lines: Vec<Line2D> = Vec::new();
        for edge in layout.obstacles.iter().flat_map(Obstacle::edges) {
            if edge.is_degenerate() {
                dropped += 1;
            } else {
                obstacle_lines.push(edge);
            }
        }
        if dropped > 0 {
            log::warn!(
                "Dropped {} obstacle edges shorter than {} m",
                dropped,
                MIN_SEGMENT_LENGTH
            );
        }

        let (w, h) = (layout.width, layout.height);
        let corners = [
            Point2D::new(0.0, 0.0),
            Point2D::new(w, 0.0),
            Point2D::new(w, h),
            Point2D::new(0.0, h),
        ];
        for i in 0..4 {
            obstacle_lines.push(Line2D::new(corners[i], corners[(i + 1) % 4]));
        }

        Ok(Self {
            max_target_dist: w.hypot(h),
            obstacle_lines,
            layout,
        })
    }

    /// Parse a map from YAML
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let layout: MapLayout = serde_yaml::from_str(contents)?;
        Self::new(layout)
    }

    /// Load a map from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let map = Self::from_yaml(&contents)?;
        log::info!(
            "Loaded map {}: {:.1} x {:.1} m, {} obstacle segments",
            path.display(),
            map.width(),
            map.height(),
            map.obstacle_lines.len()
        );
        Ok(map)
    }

    fn validate(layout: &MapLayout) -> Result<()> {
        for (name, v) in [("width", layout.width), ("height", layout.height)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::Config(format!(
                    "map {} must be positive, got {}",
                    name, v
                )));
            }
        }

        let all_zones = layout
            .robot_spawn_zones
            .iter()
            .chain(&layout.robot_goal_zones)
            .chain(&layout.ped_spawn_zones)
            .chain(&layout.ped_goal_zones)
            .chain(&layout.ped_crowded_zones);
        for zone in all_zones {
            if !zone.is_finite() {
                return Err(Error::Config("map zone has non-finite corner".to_string()));
            }
        }
        for obstacle in &layout.obstacles {
            if obstacle.vertices().iter().any(|v| !v.is_finite()) {
                return Err(Error::Config(
                    "obstacle has non-finite vertex".to_string(),
                ));
            }
        }

        if layout.robot_routes.is_empty()
            && (layout.robot_spawn_zones.is_empty() || layout.robot_goal_zones.is_empty())
        {
            return Err(Error::Config(
                "map needs robot routes or both robot spawn and goal zones".to_string(),
            ));
        }
        for route in &layout.robot_routes {
            check_route(
                route,
                layout.robot_spawn_zones.len(),
                layout.robot_goal_zones.len(),
                "robot",
            )?;
        }
        for route in &layout.ped_routes {
            check_route(
                route,
                layout.ped_spawn_zones.len(),
                layout.ped_goal_zones.len(),
                "pedestrian",
            )?;
            if route.waypoints.len() < 2 {
                return Err(Error::Config(
                    "pedestrian route needs at least two waypoints".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Map width in meters
    pub fn width(&self) -> f32 {
        self.layout.width
    }

    /// Map height in meters
    pub fn height(&self) -> f32 {
        self.layout.height
    }

    /// Obstacle polygons
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.layout.obstacles
    }

    /// Obstacle edges plus the four map boundaries
    pub fn obstacle_lines(&self) -> &[Line2D] {
        &self.obstacle_lines
    }

    /// Robot spawn zones
    pub fn robot_spawn_zones(&self) -> &[Zone] {
        &self.layout.robot_spawn_zones
    }

    /// Robot goal zones
    pub fn robot_goal_zones(&self) -> &[Zone] {
        &self.layout.robot_goal_zones
    }

    /// Robot routes
    pub fn robot_routes(&self) -> &[GlobalRoute] {
        &self.layout.robot_routes
    }

    /// Crowded zones
    pub fn ped_crowded_zones(&self) -> &[Zone] {
        &self.layout.ped_crowded_zones
    }

    /// Pedestrian routes
    pub fn ped_routes(&self) -> &[GlobalRoute] {
        &self.layout.ped_routes
    }

    /// Largest possible robot-to-target distance (map diagonal)
    pub fn max_target_dist(&self) -> f32 {
        self.max_target_dist
    }

    /// Point lies outside every obstacle polygon and at least `clearance`
    /// away from every obstacle segment and map boundary.
    pub fn is_point_free(&self, point: Point2D, clearance: f32) -> bool {
        if !point.is_finite() {
            return false;
        }
        if self.layout.obstacles.iter().any(|o| o.contains(point)) {
            return false;
        }
        self.obstacle_lines
            .iter()
            .all(|line| line.distance_to_point(point) >= clearance)
    }
}

fn check_route(route: &GlobalRoute, spawns: usize, goals: usize, kind: &str) -> Result<()> {
    if route.spawn_zone >= spawns || route.goal_zone >= goals {
        return Err(Error::Config(format!(
            "{} route references zone {} -> {}, but map has {} spawn and {} goal zones",
            kind, route.spawn_zone, route.goal_zone, spawns, goals
        )));
    }
    if route.waypoints.iter().any(|w| !w.is_finite()) {
        return Err(Error::Config(format!(
            "{} route has non-finite waypoint",
            kind
        )));
    }
    Ok(())
}
