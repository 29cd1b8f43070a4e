//! Crowd spawning, grouping and goal updates.

use super::{Pedestrian, PedestrianBehavior};
use crate::config::PedestrianSettings;
use crate::core::Point2D;
use crate::map::{GlobalRoute, MapDefinition, Zone};
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Position samples tried per pedestrian before it is skipped
const MAX_PED_SPAWN_ATTEMPTS: usize = 100;

/// The pedestrians of one episode together with the map they walk on.
#[derive(Clone, Debug)]
pub struct Crowd {
    map: Arc<MapDefinition>,
    pedestrians: Vec<Pedestrian>,
    arrival_radius: f32,
}

impl Crowd {
    /// Crowd without pedestrians
    pub fn empty(map: Arc<MapDefinition>) -> Self {
        Self {
            map,
            pedestrians: Vec::new(),
            arrival_radius: 0.0,
        }
    }

    /// Spawn the crowd of a map.
    ///
    /// Crowded zones are filled by density with wanderers; every pedestrian
    /// route is populated with route followers spaced along its waypoints.
    /// Consecutive pedestrians of one zone or route are grouped into groups
    /// of up to `max_peds_per_group`.
    pub fn populate<R: Rng + ?Sized>(
        map: Arc<MapDefinition>,
        settings: &PedestrianSettings,
        rng: &mut R,
    ) -> Self {
        let max_speed = settings.max_speed();
        let mut pedestrians = Vec::new();
        let mut next_group = 0;

        for (zone_idx, zone) in map.ped_crowded_zones().iter().enumerate() {
            let count = (zone.area() * settings.peds_per_area_m2).round() as usize;
            let start = pedestrians.len();
            for _ in 0..count {
                let Some(position) = sample_free(&map, zone, settings.radius, rng) else {
                    log::warn!(
                        "Crowded zone {} has no free space, spawned {} of {} pedestrians",
                        zone_idx,
                        pedestrians.len() - start,
                        count
                    );
                    break;
                };
                pedestrians.push(Pedestrian::new(
                    position,
                    zone.sample(rng),
                    max_speed,
                    PedestrianBehavior::Wanderer { zone: zone_idx },
                ));
            }
            assign_groups(
                &mut pedestrians[start..],
                settings.max_peds_per_group,
                &mut next_group,
                rng,
            );
            share_group_goals(&mut pedestrians[start..]);
        }

        for (route_idx, route) in map.ped_routes().iter().enumerate() {
            let count = ((route.length() / settings.route_spawn_spacing).floor() as usize).max(1);
            let start = pedestrians.len();
            for k in 0..count {
                let (position, waypoint) = point_along(route, k as f32 * settings.route_spawn_spacing);
                pedestrians.push(Pedestrian::new(
                    position,
                    route.waypoints[waypoint],
                    max_speed,
                    PedestrianBehavior::RouteFollower {
                        route: route_idx,
                        waypoint,
                    },
                ));
            }
            assign_groups(
                &mut pedestrians[start..],
                settings.max_peds_per_group,
                &mut next_group,
                rng,
            );
        }

        log::debug!(
            "Spawned {} pedestrians in {} groups",
            pedestrians.len(),
            next_group
        );
        Self {
            map,
            pedestrians,
            arrival_radius: settings.radius,
        }
    }

    /// Current pedestrians
    pub fn pedestrians(&self) -> &[Pedestrian] {
        &self.pedestrians
    }

    /// Mutable pedestrians, for integration
    pub fn pedestrians_mut(&mut self) -> &mut [Pedestrian] {
        &mut self.pedestrians
    }

    /// Pedestrian centers
    pub fn positions(&self) -> Vec<Point2D> {
        self.pedestrians.iter().map(|p| p.position).collect()
    }

    /// Number of pedestrians
    pub fn len(&self) -> usize {
        self.pedestrians.len()
    }

    /// True when nobody walks on this map
    pub fn is_empty(&self) -> bool {
        self.pedestrians.is_empty()
    }

    /// Map the crowd walks on
    pub fn map(&self) -> &Arc<MapDefinition> {
        &self.map
    }

    /// Give new goals to pedestrians that arrived at theirs.
    ///
    /// Wanderers draw a new goal in their zone, shared by their group.
    /// Route followers advance to the next waypoint and restart at the
    /// first waypoint after the last one.
    pub fn update_goals<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut group_goals: BTreeMap<usize, Point2D> = BTreeMap::new();

        for i in 0..self.pedestrians.len() {
            let ped = self.pedestrians[i];
            if ped.position.distance(ped.goal) >= self.arrival_radius {
                continue;
            }

            match ped.behavior {
                PedestrianBehavior::Wanderer { zone } => {
                    let Some(zone) = self.map.ped_crowded_zones().get(zone) else {
                        continue;
                    };
                    let goal = match ped.group {
                        Some(g) => *group_goals.entry(g).or_insert_with(|| zone.sample(rng)),
                        None => zone.sample(rng),
                    };
                    self.pedestrians[i].goal = goal;
                }
                PedestrianBehavior::RouteFollower { route, waypoint } => {
                    let Some(route) = self.map.ped_routes().get(route) else {
                        continue;
                    };
                    let target = &mut self.pedestrians[i];
                    if waypoint + 1 < route.waypoints.len() {
                        target.goal = route.waypoints[waypoint + 1];
                        set_waypoint(target, waypoint + 1);
                    } else {
                        target.position = route.waypoints[0];
                        target.velocity = Point2D::ZERO;
                        target.goal = route.waypoints[1];
                        set_waypoint(target, 1);
                    }
                }
            }
        }

        if group_goals.is_empty() {
            return;
        }
        for ped in &mut self.pedestrians {
            if let (Some(g), PedestrianBehavior::Wanderer { .. }) = (ped.group, ped.behavior) {
                if let Some(goal) = group_goals.get(&g) {
                    ped.goal = *goal;
                }
            }
        }
    }
}

fn set_waypoint(ped: &mut Pedestrian, index: usize) {
    if let PedestrianBehavior::RouteFollower { waypoint, .. } = &mut ped.behavior {
        *waypoint = index;
    }
}

fn sample_free<R: Rng + ?Sized>(
    map: &MapDefinition,
    zone: &Zone,
    clearance: f32,
    rng: &mut R,
) -> Option<Point2D> {
    (0..MAX_PED_SPAWN_ATTEMPTS)
        .map(|_| zone.sample(rng))
        .find(|p| map.is_point_free(*p, clearance))
}

/// Point at arc length `s` along the route, plus the index of the waypoint
/// that ends the section containing it.
fn point_along(route: &GlobalRoute, s: f32) -> (Point2D, usize) {
    let mut remaining = s;
    for (i, (a, b)) in route.sections().enumerate() {
        let len = a.distance(b);
        if remaining < len {
            return (a + (b - a) * (remaining / len), i + 1);
        }
        remaining -= len;
    }
    let last = route.waypoints.len() - 1;
    (route.waypoints[last], last)
}

fn assign_groups<R: Rng + ?Sized>(
    peds: &mut [Pedestrian],
    max_group_size: usize,
    next_group: &mut usize,
    rng: &mut R,
) {
    let mut i = 0;
    while i < peds.len() {
        let size = rng.gen_range(1..=max_group_size.max(1)).min(peds.len() - i);
        if size > 1 {
            for ped in &mut peds[i..i + size] {
                ped.group = Some(*next_group);
            }
            *next_group += 1;
        }
        i += size;
    }
}

fn share_group_goals(peds: &mut [Pedestrian]) {
    let mut goals: BTreeMap<usize, Point2D> = BTreeMap::new();
    for ped in peds.iter_mut() {
        if let Some(g) = ped.group {
            ped.goal = *goals.entry(g).or_insert(ped.goal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MapLayout;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn crowd_map() -> Arc<MapDefinition> {
        let zone = Zone::axis_aligned(Point2D::new(1.0, 1.0), Point2D::new(2.0, 2.0));
        Arc::new(
            MapDefinition::new(MapLayout {
                width: 40.0,
                height: 40.0,
                robot_spawn_zones: vec![zone],
                robot_goal_zones: vec![zone],
                ped_crowded_zones: vec![Zone::axis_aligned(
                    Point2D::new(10.0, 10.0),
                    Point2D::new(30.0, 30.0),
                )],
                ped_spawn_zones: vec![zone],
                ped_goal_zones: vec![zone],
                ped_routes: vec![GlobalRoute {
                    spawn_zone: 0,
                    goal_zone: 0,
                    waypoints: vec![
                        Point2D::new(5.0, 35.0),
                        Point2D::new(25.0, 35.0),
                        Point2D::new(35.0, 35.0),
                    ],
                }],
                ..Default::default()
            })
            .unwrap(),
        )
    }

    fn settings() -> PedestrianSettings {
        PedestrianSettings {
            peds_per_area_m2: 0.05,
            route_spawn_spacing: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_populate_by_density_and_route() {
        let mut rng = SmallRng::seed_from_u64(5);
        let crowd = Crowd::populate(crowd_map(), &settings(), &mut rng);

        let wanderers = crowd
            .pedestrians()
            .iter()
            .filter(|p| matches!(p.behavior, PedestrianBehavior::Wanderer { .. }))
            .count();
        // 400 m² * 0.05
        assert_eq!(wanderers, 20);
        // 30 m route, one pedestrian every 10 m
        assert_eq!(crowd.len() - wanderers, 3);

        for ped in crowd.pedestrians() {
            assert!(ped.position.is_finite());
            assert!((ped.max_speed - 1.3).abs() < 1e-6);
            if let PedestrianBehavior::Wanderer { .. } = ped.behavior {
                assert!((10.0..=30.0).contains(&ped.position.x));
                assert!((10.0..=30.0).contains(&ped.goal.y));
            }
        }
    }

    #[test]
    fn test_group_size_limit_and_shared_goals() {
        let mut rng = SmallRng::seed_from_u64(11);
        let crowd = Crowd::populate(crowd_map(), &settings(), &mut rng);

        let mut groups: BTreeMap<usize, Vec<&Pedestrian>> = BTreeMap::new();
        for ped in crowd.pedestrians() {
            if let Some(g) = ped.group {
                groups.entry(g).or_default().push(ped);
            }
        }
        for members in groups.values() {
            assert!(members.len() >= 2 && members.len() <= 6);
            if let PedestrianBehavior::Wanderer { .. } = members[0].behavior {
                assert!(members.iter().all(|m| m.goal == members[0].goal));
            }
        }
    }

    #[test]
    fn test_no_groups_when_max_is_one() {
        let mut rng = SmallRng::seed_from_u64(2);
        let s = PedestrianSettings {
            max_peds_per_group: 1,
            ..settings()
        };
        let crowd = Crowd::populate(crowd_map(), &s, &mut rng);
        assert!(crowd.pedestrians().iter().all(|p| p.group.is_none()));
    }

    #[test]
    fn test_route_follower_advances_and_restarts() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut crowd = Crowd::populate(crowd_map(), &settings(), &mut rng);
        let idx = crowd
            .pedestrians()
            .iter()
            .position(|p| matches!(p.behavior, PedestrianBehavior::RouteFollower { .. }))
            .unwrap();

        // first follower starts at the route start heading to waypoint 1
        assert_eq!(crowd.pedestrians()[idx].position, Point2D::new(5.0, 35.0));
        assert_eq!(crowd.pedestrians()[idx].goal, Point2D::new(25.0, 35.0));

        crowd.pedestrians_mut()[idx].position = Point2D::new(25.0, 35.0);
        crowd.update_goals(&mut rng);
        assert_eq!(crowd.pedestrians()[idx].goal, Point2D::new(35.0, 35.0));

        crowd.pedestrians_mut()[idx].position = Point2D::new(35.0, 35.0);
        crowd.update_goals(&mut rng);
        let ped = crowd.pedestrians()[idx];
        assert_eq!(ped.position, Point2D::new(5.0, 35.0));
        assert_eq!(ped.goal, Point2D::new(25.0, 35.0));
        assert_eq!(
            ped.behavior,
            PedestrianBehavior::RouteFollower {
                route: 0,
                waypoint: 1
            }
        );
    }

    #[test]
    fn test_wanderer_gets_new_goal_in_zone() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut crowd = Crowd::populate(crowd_map(), &settings(), &mut rng);
        let goal = crowd.pedestrians()[0].goal;
        crowd.pedestrians_mut()[0].position = goal;

        crowd.update_goals(&mut rng);
        let new_goal = crowd.pedestrians()[0].goal;
        assert_ne!(new_goal, goal);
        assert!((10.0..=30.0).contains(&new_goal.x));
    }

    #[test]
    fn test_populate_is_deterministic() {
        let a = Crowd::populate(crowd_map(), &settings(), &mut SmallRng::seed_from_u64(4));
        let b = Crowd::populate(crowd_map(), &settings(), &mut SmallRng::seed_from_u64(4));
        assert_eq!(a.pedestrians(), b.pedestrians());
    }
}
