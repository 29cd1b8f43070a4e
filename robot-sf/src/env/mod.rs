//! Episode loop around the simulator.
//!
//! [`RobotEnv`] owns a [`Simulator`], the lidar and the observation
//! window, and walks every episode through
//! `Uninitialized -> Ready -> Running -> Terminated`:
//!
//! ```text
//! reset():  pick map -> spawn robot + crowd -> clear window -> observe
//! step(a):  robot -> crowd -> navigation -> occupancy -> lidar -> fusion
//!           -> metadata -> reward -> termination -> publish snapshot
//! ```
//!
//! Renderers call [`RobotEnv::subscribe`] and receive an owned
//! [`SimSnapshot`] after every reset and tick. A slow or dropped receiver
//! never blocks the loop.

pub mod metadata;
pub mod metrics;
pub mod reward;

pub use metadata::SimulationMetadata;
pub use metrics::{DEFAULT_METRICS_WINDOW, EnvMetrics, EpisodeOutcome, VecEnvMetrics};
pub use reward::{RewardFn, TerminalFn, default_reward, is_terminal, simple_reward};

use crate::config::EnvSettings;
use crate::error::{Error, Result};
use crate::map::MapDefinitionPool;
use crate::pedestrians::PedestrianIntegrator;
use crate::robot::RobotAction;
use crate::sensors::{
    LidarScanner, NoiseGenerator, Observation, ObservationBounds, SensorFusion, seeded_rng,
    target_sensor_obs,
};
use crate::sim::{SimSnapshot, Simulator};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use rand::rngs::SmallRng;

/// Random streams derived from one configured seed
const SIM_STREAM: u64 = 0;
const LIDAR_STREAM: u64 = 1;
const MAP_STREAM: u64 = 2;

/// Lifecycle of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EpisodeState {
    /// No successful reset yet
    #[default]
    Uninitialized,
    /// Reset done, no tick yet
    Ready,
    /// At least one tick done, not terminal
    Running,
    /// Terminal tick reached; reset before stepping again
    Terminated,
}

/// Outcome of one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    /// Normalized observation after the tick
    pub observation: Observation,
    /// Reward of the tick
    pub reward: f32,
    /// Episode ended with this tick
    pub terminated: bool,
    /// Status flags of the tick
    pub metadata: SimulationMetadata,
}

/// Robot navigation environment.
pub struct RobotEnv {
    settings: EnvSettings,
    pool: MapDefinitionPool,
    map_name: String,
    sim: Simulator,
    lidar: LidarScanner,
    fusion: SensorFusion,
    reward_fn: RewardFn,
    terminal_fn: TerminalFn,
    state: EpisodeState,
    episode: u64,
    step_of_episode: u64,
    total_steps: u64,
    max_sim_steps: u64,
    last_action: Option<RobotAction>,
    last_rays: Vec<f32>,
    subscribers: Vec<Sender<SimSnapshot>>,
    map_rng: SmallRng,
}

impl RobotEnv {
    /// Environment over a map pool with the default reward and termination.
    ///
    /// Observation bounds use the largest target distance of the whole
    /// pool, so observations keep their scale when the map changes.
    pub fn new(settings: EnvSettings, pool: MapDefinitionPool) -> Result<Self> {
        settings.validate()?;
        let seed = settings.random_seed;
        let mut map_rng = seeded_rng(stream_seed(seed, MAP_STREAM));
        let (name, map) = pool.choose_random(&mut map_rng);
        let map_name = name.to_string();

        let sim = Simulator::new(
            settings.sim.clone(),
            &settings.robot,
            settings.peds.clone(),
            map,
            seeded_rng(stream_seed(seed, SIM_STREAM)),
        )?;
        let lidar = LidarScanner::new(
            settings.lidar.clone(),
            NoiseGenerator::new(stream_seed(seed, LIDAR_STREAM)),
        )?;
        let bounds = ObservationBounds::new(
            sim.robot().speed_bounds(),
            pool.max_target_dist(),
            settings.lidar.max_scan_dist,
            settings.lidar.num_rays,
            settings.sim.stack_steps,
        )?;

        Ok(Self {
            reward_fn: default_reward(settings.reward.clone()),
            terminal_fn: Box::new(is_terminal),
            max_sim_steps: settings.sim.max_sim_steps(),
            settings,
            pool,
            map_name,
            sim,
            lidar,
            fusion: SensorFusion::new(bounds),
            state: EpisodeState::Uninitialized,
            episode: 0,
            step_of_episode: 0,
            total_steps: 0,
            last_action: None,
            last_rays: Vec::new(),
            subscribers: Vec::new(),
            map_rng,
        })
    }

    /// Replace the reward function
    pub fn with_reward<F>(mut self, reward: F) -> Self
    where
        F: Fn(&SimulationMetadata) -> f32 + Send + 'static,
    {
        self.reward_fn = Box::new(reward);
        self
    }

    /// Replace the termination rule
    pub fn with_terminal<F>(mut self, terminal: F) -> Self
    where
        F: Fn(&SimulationMetadata) -> bool + Send + 'static,
    {
        self.terminal_fn = Box::new(terminal);
        self
    }

    /// Replace the pedestrian integrator
    pub fn with_integrator(mut self, integrator: Box<dyn PedestrianIntegrator>) -> Self {
        self.sim.set_integrator(integrator);
        self
    }

    /// Start a new episode and return its first observation.
    ///
    /// On [`Error::SpawnFailed`] the environment is left uninitialized.
    pub fn reset(&mut self) -> Result<Observation> {
        if self.pool.len() > 1 {
            let (name, map) = self.pool.choose_random(&mut self.map_rng);
            if name != self.map_name {
                self.map_name = name.to_string();
                self.sim.set_map(map);
            }
        }

        if let Err(e) = self.sim.reset_state() {
            self.state = EpisodeState::Uninitialized;
            return Err(e);
        }

        self.episode += 1;
        self.step_of_episode = 0;
        self.last_action = None;
        self.fusion.reset();
        let observation = self.observe()?;
        self.state = EpisodeState::Ready;

        log::info!(
            "Episode {} started on map '{}' ({} ticks max)",
            self.episode,
            self.map_name,
            self.max_sim_steps
        );
        self.publish();
        Ok(observation)
    }

    /// Advance the episode by one tick.
    ///
    /// Fails with [`Error::NotInitialized`] before the first reset and with
    /// [`Error::EpisodeTerminated`] after a terminal tick. A non-finite
    /// action is rejected before anything moves.
    pub fn step(&mut self, action: RobotAction) -> Result<StepResult> {
        match self.state {
            EpisodeState::Uninitialized => return Err(Error::NotInitialized),
            EpisodeState::Terminated => return Err(Error::EpisodeTerminated),
            EpisodeState::Ready | EpisodeState::Running => {}
        }

        self.sim.step_once(action)?;
        self.last_action = Some(action);
        self.step_of_episode += 1;
        self.total_steps += 1;

        let observation = self.observe()?;
        let metadata = self.metadata();
        let reward = (self.reward_fn)(&metadata);
        let terminated = (self.terminal_fn)(&metadata);

        if metadata.is_collision() {
            log::debug!(
                "Episode {} tick {}: collision (pedestrian: {}, obstacle: {})",
                self.episode,
                self.step_of_episode,
                metadata.is_pedestrian_collision,
                metadata.is_obstacle_collision
            );
        }
        self.state = if terminated {
            log::debug!(
                "Episode {} terminated after {} ticks",
                self.episode,
                self.step_of_episode
            );
            EpisodeState::Terminated
        } else {
            EpisodeState::Running
        };
        self.publish();

        Ok(StepResult {
            observation,
            reward,
            terminated,
            metadata,
        })
    }

    /// Receive a [`SimSnapshot`] after every reset and tick.
    ///
    /// Snapshots are dropped while the receiver's buffer is full.
    pub fn subscribe(&mut self) -> Receiver<SimSnapshot> {
        let (tx, rx) = crossbeam_channel::bounded(self.settings.sim.snapshot_capacity);
        self.subscribers.push(tx);
        rx
    }

    /// Status of the last completed tick
    pub fn metadata(&self) -> SimulationMetadata {
        let occupancy = self.sim.occupancy();
        let threshold = self.settings.sim.collision_threshold;
        let navigator = self.sim.navigator();
        SimulationMetadata {
            step: self.total_steps,
            episode: self.episode,
            step_of_episode: self.step_of_episode,
            is_pedestrian_collision: occupancy.is_pedestrian_collision(threshold),
            is_obstacle_collision: occupancy.is_obstacle_collision(threshold),
            is_robot_at_goal: navigator.reached_waypoint(),
            is_route_complete: navigator.reached_destination(),
            is_timesteps_exceeded: self.step_of_episode >= self.max_sim_steps,
            max_sim_steps: self.max_sim_steps,
        }
    }

    /// Current state copy, as published to subscribers
    pub fn snapshot(&self) -> SimSnapshot {
        let pose = self.sim.robot().pose();
        let peds = self.sim.crowd().pedestrians();
        SimSnapshot {
            episode: self.episode,
            timestep: self.step_of_episode,
            robot_pose: pose,
            last_action: self.last_action,
            goal: self.sim.goal_pos(),
            ped_positions: peds.iter().map(|p| p.position).collect(),
            ped_velocities: peds.iter().map(|p| p.velocity).collect(),
            ray_end_points: self.lidar.ray_end_points(pose, &self.last_rays),
        }
    }

    /// Episode lifecycle state
    pub fn state(&self) -> EpisodeState {
        self.state
    }

    /// Index of the current episode, 0 before the first reset
    pub fn episode(&self) -> u64 {
        self.episode
    }

    /// Episode length in ticks
    pub fn max_sim_steps(&self) -> u64 {
        self.max_sim_steps
    }

    /// Value ranges of the observation
    pub fn observation_bounds(&self) -> &ObservationBounds {
        self.fusion.bounds()
    }

    /// Name of the active map
    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    /// Underlying simulator
    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    /// Environment settings
    pub fn settings(&self) -> &EnvSettings {
        &self.settings
    }

    fn observe(&mut self) -> Result<Observation> {
        let robot = self.sim.robot();
        let pose = robot.pose();
        let speed = robot.current_speed();
        let goal = self.sim.goal_pos().unwrap_or_else(|| pose.position());
        let target = target_sensor_obs(pose, goal, self.sim.next_goal_pos());

        let rays = self.lidar.scan(pose, self.sim.occupancy());
        self.last_rays.clone_from(&rays);
        self.fusion.next_obs(speed, target, rays)
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.subscribers.retain(|tx| match tx.try_send(snapshot.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::debug!("Snapshot dropped, subscriber is behind");
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("Snapshot subscriber disconnected");
                false
            }
        });
    }
}

/// Independent seed per random stream; 0 keeps every stream on entropy.
fn stream_seed(seed: u64, stream: u64) -> u64 {
    if seed == 0 {
        return 0;
    }
    (seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_seeds_differ() {
        assert_eq!(stream_seed(0, LIDAR_STREAM), 0);
        assert_eq!(stream_seed(42, SIM_STREAM), 42);
        assert_ne!(stream_seed(42, LIDAR_STREAM), stream_seed(42, MAP_STREAM));
        assert_ne!(stream_seed(42, LIDAR_STREAM), 0);
    }
}
