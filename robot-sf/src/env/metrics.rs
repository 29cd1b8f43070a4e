//! Driving performance over recently finished episodes.

use super::metadata::SimulationMetadata;
use std::collections::VecDeque;

/// Episodes kept per environment
pub const DEFAULT_METRICS_WINDOW: usize = 10;

/// How a route or intermediate goal ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeOutcome {
    /// Goal reached
    ReachedGoal,
    /// Ran out of ticks
    Timeout,
    /// Hit a pedestrian
    PedestrianCollision,
    /// Hit an obstacle
    ObstacleCollision,
}

/// Sliding-window outcome rates of one environment.
#[derive(Clone, Debug)]
pub struct EnvMetrics {
    route_outcomes: VecDeque<EpisodeOutcome>,
    goal_outcomes: VecDeque<EpisodeOutcome>,
    window: usize,
}

impl Default for EnvMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_METRICS_WINDOW)
    }
}

impl EnvMetrics {
    /// Metrics over the last `window` routes and intermediate goals
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            route_outcomes: VecDeque::with_capacity(window),
            goal_outcomes: VecDeque::with_capacity(window),
            window,
        }
    }

    /// Record the metadata of one tick.
    ///
    /// Ticks that neither end a route nor reach a waypoint are ignored.
    pub fn update(&mut self, meta: &SimulationMetadata) {
        let outcome = if meta.is_pedestrian_collision {
            EpisodeOutcome::PedestrianCollision
        } else if meta.is_obstacle_collision {
            EpisodeOutcome::ObstacleCollision
        } else if meta.is_route_complete {
            EpisodeOutcome::ReachedGoal
        } else if meta.is_timesteps_exceeded {
            EpisodeOutcome::Timeout
        } else if meta.is_robot_at_goal {
            push(&mut self.goal_outcomes, EpisodeOutcome::ReachedGoal, self.window);
            return;
        } else {
            return;
        };
        push(&mut self.route_outcomes, outcome, self.window);
        push(&mut self.goal_outcomes, outcome, self.window);
    }

    /// Routes in the window
    pub fn total_routes(&self) -> usize {
        self.route_outcomes.len()
    }

    /// Intermediate goals in the window
    pub fn total_intermediate_goals(&self) -> usize {
        self.goal_outcomes.len()
    }

    /// Share of routes driven to the end
    pub fn route_completion_rate(&self) -> f32 {
        rate(&self.route_outcomes, EpisodeOutcome::ReachedGoal)
    }

    /// Share of intermediate goals reached
    pub fn interm_goal_completion_rate(&self) -> f32 {
        rate(&self.goal_outcomes, EpisodeOutcome::ReachedGoal)
    }

    /// Share of routes that timed out
    pub fn timeout_rate(&self) -> f32 {
        rate(&self.route_outcomes, EpisodeOutcome::Timeout)
    }

    /// Share of routes ended by an obstacle collision
    pub fn obstacle_collision_rate(&self) -> f32 {
        rate(&self.route_outcomes, EpisodeOutcome::ObstacleCollision)
    }

    /// Share of routes ended by a pedestrian collision
    pub fn pedestrian_collision_rate(&self) -> f32 {
        rate(&self.route_outcomes, EpisodeOutcome::PedestrianCollision)
    }
}

fn push(outcomes: &mut VecDeque<EpisodeOutcome>, outcome: EpisodeOutcome, window: usize) {
    outcomes.push_back(outcome);
    while outcomes.len() > window {
        outcomes.pop_front();
    }
}

fn rate(outcomes: &VecDeque<EpisodeOutcome>, kind: EpisodeOutcome) -> f32 {
    if outcomes.is_empty() {
        0.0
    } else {
        outcomes.iter().filter(|o| **o == kind).count() as f32 / outcomes.len() as f32
    }
}

/// Mean metrics over several environments stepped side by side.
#[derive(Clone, Debug, Default)]
pub struct VecEnvMetrics {
    metrics: Vec<EnvMetrics>,
}

impl VecEnvMetrics {
    /// One [`EnvMetrics`] per environment
    pub fn new(metrics: Vec<EnvMetrics>) -> Self {
        Self { metrics }
    }

    /// Per-environment metrics
    pub fn metrics(&self) -> &[EnvMetrics] {
        &self.metrics
    }

    /// Record one tick of every environment, in environment order
    pub fn update(&mut self, metas: &[SimulationMetadata]) {
        for (metrics, meta) in self.metrics.iter_mut().zip(metas) {
            metrics.update(meta);
        }
    }

    /// Mean route completion rate
    pub fn route_completion_rate(&self) -> f32 {
        self.mean(EnvMetrics::route_completion_rate)
    }

    /// Mean intermediate goal completion rate
    pub fn interm_goal_completion_rate(&self) -> f32 {
        self.mean(EnvMetrics::interm_goal_completion_rate)
    }

    /// Mean timeout rate
    pub fn timeout_rate(&self) -> f32 {
        self.mean(EnvMetrics::timeout_rate)
    }

    /// Mean obstacle collision rate
    pub fn obstacle_collision_rate(&self) -> f32 {
        self.mean(EnvMetrics::obstacle_collision_rate)
    }

    /// Mean pedestrian collision rate
    pub fn pedestrian_collision_rate(&self) -> f32 {
        self.mean(EnvMetrics::pedestrian_collision_rate)
    }

    fn mean(&self, f: fn(&EnvMetrics) -> f32) -> f32 {
        if self.metrics.is_empty() {
            return 0.0;
        }
        self.metrics.iter().map(f).sum::<f32>() / self.metrics.len() as f32
    }
}
