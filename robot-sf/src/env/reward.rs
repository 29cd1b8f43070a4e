//! Default reward and termination rules.

use super::metadata::SimulationMetadata;
use crate::config::RewardSettings;

/// Reward from the metadata of one tick
pub type RewardFn = Box<dyn Fn(&SimulationMetadata) -> f32 + Send>;

/// Whether the episode ends after a tick
pub type TerminalFn = Box<dyn Fn(&SimulationMetadata) -> bool + Send>;

/// Step penalty spread over the episode, a penalty on collision and a
/// bonus for every reached waypoint.
///
/// With default settings: `-0.1 / max_sim_steps`, `-2` on collision, `+1`
/// at a waypoint.
pub fn simple_reward(meta: &SimulationMetadata, settings: &RewardSettings) -> f32 {
    let mut reward = -settings.step_penalty / meta.max_sim_steps.max(1) as f32;
    if meta.is_collision() {
        reward -= settings.collision_penalty;
    }
    if meta.is_robot_at_goal {
        reward += settings.goal_bonus;
    }
    reward
}

/// Ends on timeout, any collision, or a completed route.
pub fn is_terminal(meta: &SimulationMetadata) -> bool {
    meta.is_timesteps_exceeded || meta.is_collision() || meta.is_route_complete
}

/// [`simple_reward`] bound to `settings`
pub fn default_reward(settings: RewardSettings) -> RewardFn {
    Box::new(move |meta| simple_reward(meta, &settings))
}
