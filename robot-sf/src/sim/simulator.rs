//! World state of one episode and the physics tick.

use super::spawn::SpawnSampler;
use crate::config::{PedestrianSettings, RobotSettings, SimulationSettings};
use crate::core::Point2D;
use crate::error::Result;
use crate::map::MapDefinition;
use crate::navigation::RouteNavigator;
use crate::occupancy::{ContinuousOccupancy, OccupancySnapshot};
use crate::pedestrians::{
    Crowd, EulerIntegrator, ForceContext, ForceModel, PedestrianIntegrator, reject_non_finite,
};
use crate::robot::{RobotAction, RobotKinematics};
use rand::rngs::SmallRng;
use std::sync::Arc;

/// Robot, crowd and occupancy of the active map.
pub struct Simulator {
    sim: SimulationSettings,
    peds: PedestrianSettings,
    map: Arc<MapDefinition>,
    occupancy: ContinuousOccupancy,
    robot: RobotKinematics,
    crowd: Crowd,
    forces: ForceModel,
    integrator: Box<dyn PedestrianIntegrator>,
    navigator: RouteNavigator,
    rng: SmallRng,
}

impl Simulator {
    /// Simulator on `map` with the default Euler integrator.
    ///
    /// Nothing is spawned until [`reset_state`](Self::reset_state).
    pub fn new(
        sim: SimulationSettings,
        robot: &RobotSettings,
        peds: PedestrianSettings,
        map: Arc<MapDefinition>,
        rng: SmallRng,
    ) -> Result<Self> {
        sim.validate()?;
        peds.validate()?;
        let robot = RobotKinematics::from_settings(robot)?;
        let robot_radius = robot.radius();
        let occupancy =
            ContinuousOccupancy::new(map.clone(), robot_radius, peds.radius, sim.goal_radius);
        let forces = ForceModel::from_settings(&peds, robot_radius);
        let navigator = RouteNavigator::new(robot_radius + sim.goal_radius);

        Ok(Self {
            crowd: Crowd::empty(map.clone()),
            sim,
            peds,
            map,
            occupancy,
            robot,
            forces,
            integrator: Box::new(EulerIntegrator),
            navigator,
            rng,
        })
    }

    /// Replace the pedestrian integrator
    pub fn set_integrator(&mut self, integrator: Box<dyn PedestrianIntegrator>) {
        self.integrator = integrator;
    }

    /// Switch to another map; takes effect at the next reset.
    pub fn set_map(&mut self, map: Arc<MapDefinition>) {
        self.occupancy = ContinuousOccupancy::new(
            map.clone(),
            self.robot.radius(),
            self.peds.radius,
            self.sim.goal_radius,
        );
        self.crowd = Crowd::empty(map.clone());
        self.map = map;
    }

    /// Spawn the robot and the crowd for a new episode.
    ///
    /// Fails with [`Error::SpawnFailed`](crate::Error::SpawnFailed) when no
    /// valid spawn or goal is found within the attempt budget.
    pub fn reset_state(&mut self) -> Result<()> {
        let sampler = SpawnSampler::new(&self.occupancy, &self.sim);
        let spawn = sampler.sample(&self.occupancy, &mut self.rng)?;

        self.robot.reset_state(spawn.pose);
        let start = spawn.pose.position();
        self.navigator.new_route(spawn.waypoints, start);

        self.crowd = Crowd::populate(self.map.clone(), &self.peds, &mut self.rng);
        self.forces.reset();
        self.forces.update_robot_position(start);
        self.refresh_occupancy();

        log::info!(
            "Episode spawn at ({:.2}, {:.2}), {} waypoints, {} pedestrians",
            start.x,
            start.y,
            self.navigator.waypoints().len(),
            self.crowd.len()
        );
        Ok(())
    }

    /// Advance the world by one tick.
    ///
    /// Robot first, then the crowd reacting to the new robot position,
    /// then navigation and the occupancy snapshot.
    pub fn step_once(&mut self, action: RobotAction) -> Result<()> {
        let dt = self.sim.time_per_step_in_secs;
        self.robot.apply_action(action, dt)?;
        let robot_position = self.robot.position();
        self.forces.update_robot_position(robot_position);

        let previous = self.crowd.positions();
        let forces = self.forces.compute(&ForceContext {
            pedestrians: self.crowd.pedestrians(),
            obstacles: self.map.obstacle_lines(),
        });
        self.integrator
            .integrate(self.crowd.pedestrians_mut(), &forces, dt);
        reject_non_finite(self.crowd.pedestrians_mut(), &previous);
        self.crowd.update_goals(&mut self.rng);

        self.navigator.update_position(robot_position);
        self.refresh_occupancy();
        Ok(())
    }

    fn refresh_occupancy(&mut self) {
        let robot_position = self.robot.position();
        self.occupancy.update(OccupancySnapshot {
            robot_position,
            goal_position: self.navigator.current_waypoint().unwrap_or(robot_position),
            ped_positions: self.crowd.positions(),
        });
    }

    /// Active map
    pub fn map(&self) -> &Arc<MapDefinition> {
        &self.map
    }

    /// Occupancy of the last completed tick
    pub fn occupancy(&self) -> &ContinuousOccupancy {
        &self.occupancy
    }

    /// The robot
    pub fn robot(&self) -> &RobotKinematics {
        &self.robot
    }

    /// The crowd
    pub fn crowd(&self) -> &Crowd {
        &self.crowd
    }

    /// Robot route progress
    pub fn navigator(&self) -> &RouteNavigator {
        &self.navigator
    }

    /// Waypoint the robot is driving to
    pub fn goal_pos(&self) -> Option<Point2D> {
        self.navigator.current_waypoint()
    }

    /// Waypoint after the current goal
    pub fn next_goal_pos(&self) -> Option<Point2D> {
        self.navigator.next_waypoint()
    }

    /// Simulation settings
    pub fn settings(&self) -> &SimulationSettings {
        &self.sim
    }
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("robot", &self.robot)
            .field("pedestrians", &self.crowd.len())
            .field("navigator", &self.navigator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MapLayout, Zone};
    use crate::pedestrians::Pedestrian;
    use crate::sensors::seeded_rng;

    fn map() -> Arc<MapDefinition> {
        Arc::new(
            MapDefinition::new(MapLayout {
                width: 30.0,
                height: 30.0,
                robot_spawn_zones: vec![Zone::axis_aligned(
                    Point2D::new(2.0, 2.0),
                    Point2D::new(6.0, 6.0),
                )],
                robot_goal_zones: vec![Zone::axis_aligned(
                    Point2D::new(22.0, 22.0),
                    Point2D::new(28.0, 28.0),
                )],
                ped_crowded_zones: vec![Zone::axis_aligned(
                    Point2D::new(10.0, 10.0),
                    Point2D::new(20.0, 20.0),
                )],
                ..Default::default()
            })
            .unwrap(),
        )
    }

    fn simulator(seed: u64) -> Simulator {
        Simulator::new(
            SimulationSettings::default(),
            &RobotSettings::default(),
            PedestrianSettings {
                peds_per_area_m2: 0.1,
                ..Default::default()
            },
            map(),
            seeded_rng(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_reset_spawns_robot_and_crowd() {
        let mut sim = simulator(4);
        sim.reset_state().unwrap();

        assert_eq!(sim.crowd().len(), 10);
        let start = sim.robot().position();
        assert!((2.0..=6.0).contains(&start.x));
        assert_eq!(sim.occupancy().snapshot().robot_position, start);
        assert_eq!(sim.occupancy().ped_positions().len(), 10);
        assert!(sim.goal_pos().is_some());
        assert_eq!(sim.next_goal_pos(), None);
    }

    #[test]
    fn test_step_moves_robot_and_pedestrians() {
        let mut sim = simulator(6);
        sim.reset_state().unwrap();
        let robot_before = sim.robot().position();
        let peds_before = sim.crowd().positions();

        for _ in 0..5 {
            sim.step_once(RobotAction::new(0.5, 0.0)).unwrap();
        }

        assert!(sim.robot().position().distance(robot_before) > 0.1);
        assert_ne!(sim.crowd().positions(), peds_before);
        assert!(sim.crowd().positions().iter().all(|p| p.is_finite()));
        assert_eq!(sim.occupancy().snapshot().robot_position, sim.robot().position());
    }

    #[test]
    fn test_non_finite_action_rejected() {
        let mut sim = simulator(2);
        sim.reset_state().unwrap();
        let pose = sim.robot().pose();
        assert!(sim.step_once(RobotAction::new(f32::NAN, 0.0)).is_err());
        assert_eq!(sim.robot().pose(), pose);
    }

    struct Exploding;

    impl PedestrianIntegrator for Exploding {
        fn integrate(&mut self, pedestrians: &mut [Pedestrian], _: &[Point2D], _: f32) {
            for ped in pedestrians {
                ped.position = Point2D::new(f32::NAN, 0.0);
            }
        }
    }

    #[test]
    fn test_non_finite_integrator_output_reverted() {
        let mut sim = simulator(9);
        sim.set_integrator(Box::new(Exploding));
        sim.reset_state().unwrap();
        let before = sim.crowd().positions();
        sim.step_once(RobotAction::default()).unwrap();
        assert_eq!(sim.crowd().positions(), before);
        assert!(sim.crowd().pedestrians().iter().all(|p| p.velocity == Point2D::ZERO));
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let mut a = simulator(21);
        let mut b = simulator(21);
        a.reset_state().unwrap();
        b.reset_state().unwrap();
        for _ in 0..10 {
            a.step_once(RobotAction::new(0.3, 0.1)).unwrap();
            b.step_once(RobotAction::new(0.3, 0.1)).unwrap();
        }
        assert_eq!(a.robot().pose(), b.robot().pose());
        assert_eq!(a.crowd().positions(), b.crowd().positions());
    }
}
