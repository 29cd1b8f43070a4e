//! Pedestrian force contributions.
//!
//! Every force maps the current crowd to one acceleration per pedestrian.
//! A [`ForceModel`] evaluates its forces in order and sums the results.

use super::Pedestrian;
use super::avoidance::choose_direction;
use crate::config::{
    DesiredForceSettings, GroupForceSettings, PedRobotForceSettings, PedestrianSettings,
};
use crate::core::{Line2D, Point2D};
use std::collections::BTreeMap;

/// Robot position used before the first update; far enough to exert no force.
pub const ROBOT_SENTINEL: Point2D = Point2D::new(1e5, 1e5);

/// Inputs shared by all forces at one tick.
#[derive(Clone, Copy, Debug)]
pub struct ForceContext<'a> {
    /// Current crowd
    pub pedestrians: &'a [Pedestrian],
    /// Obstacle segments for avoidance
    pub obstacles: &'a [Line2D],
}

/// Repulsion of pedestrians away from the robot.
#[derive(Clone, Debug)]
pub struct PedRobotForce {
    settings: PedRobotForceSettings,
    robot_radius: f32,
    ped_radius: f32,
    robot_position: Point2D,
}

impl PedRobotForce {
    /// Create the force for the given body radii
    pub fn new(settings: PedRobotForceSettings, robot_radius: f32, ped_radius: f32) -> Self {
        Self {
            settings,
            robot_radius,
            ped_radius,
            robot_position: ROBOT_SENTINEL,
        }
    }

    /// Robot position the next evaluation uses
    pub fn update_robot_position(&mut self, position: Point2D) {
        self.robot_position = position;
    }

    /// Robot position currently in use
    pub fn robot_position(&self) -> Point2D {
        self.robot_position
    }

    /// Force on a single pedestrian at `position`
    pub fn force_at(&self, position: Point2D) -> Point2D {
        let (direction, dist) = (position - self.robot_position).normalized_with_length();
        let gap = dist - self.ped_radius - self.robot_radius;
        if gap >= self.settings.activation_threshold {
            return Point2D::ZERO;
        }
        direction * ((-gap / self.settings.sigma).exp() * self.settings.force_multiplier)
    }

    fn compute(&self, ctx: &ForceContext<'_>) -> Vec<Point2D> {
        ctx.pedestrians.iter().map(|p| self.force_at(p.position)).collect()
    }
}

/// Goal-seeking force with optional obstacle avoidance.
#[derive(Clone, Debug)]
pub struct DesiredForce {
    settings: DesiredForceSettings,
    previous_directions: Vec<Point2D>,
}

impl DesiredForce {
    /// Create the force
    pub fn new(settings: DesiredForceSettings) -> Self {
        Self {
            settings,
            previous_directions: Vec::new(),
        }
    }

    /// Forget the walking directions of the last tick
    pub fn reset(&mut self) {
        self.previous_directions.clear();
    }

    fn compute(&mut self, ctx: &ForceContext<'_>) -> Vec<Point2D> {
        let s = &self.settings;
        let peds = ctx.pedestrians;
        if self.previous_directions.len() != peds.len() {
            self.previous_directions = vec![Point2D::ZERO; peds.len()];
        }

        let mut forces = Vec::with_capacity(peds.len());
        for (ped, previous) in peds.iter().zip(self.previous_directions.iter_mut()) {
            let (naive, dist) = (ped.goal - ped.position).normalized_with_length();

            let (direction, triggered) = if s.obstacle_avoidance {
                let choice = choose_direction(
                    ped.position,
                    ped.goal,
                    naive,
                    *previous,
                    &s.avoidance_angles,
                    s.view_distance,
                    ctx.obstacles,
                );
                (choice.direction, choice.triggered)
            } else {
                (naive, false)
            };
            *previous = direction;

            let mut force = if dist > s.goal_threshold {
                (direction * ped.max_speed - ped.velocity) * (1.0 / s.relaxation_time)
            } else {
                -ped.velocity * (1.0 / s.relaxation_time)
            };

            if triggered {
                // zero velocity yields a zero previous force
                let previous_force = ped.velocity.normalized() * force.length();
                force = force * s.forgetting_factor + previous_force * (1.0 - s.forgetting_factor);
            }
            forces.push(force * s.factor);
        }
        forces
    }
}

/// Pairwise offsets between members of the same group.
#[derive(Clone, Debug)]
pub struct GroupCohesionForce {
    settings: GroupForceSettings,
}

impl GroupCohesionForce {
    /// Create the force
    pub fn new(settings: GroupForceSettings) -> Self {
        Self { settings }
    }

    fn compute(&self, ctx: &ForceContext<'_>) -> Vec<Point2D> {
        let peds = ctx.pedestrians;
        let mut forces = vec![Point2D::ZERO; peds.len()];

        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, ped) in peds.iter().enumerate() {
            if let Some(g) = ped.group {
                groups.entry(g).or_default().push(i);
            }
        }

        let threshold = self.settings.threshold;
        for members in groups.values() {
            for &i in members {
                let mut sum = Point2D::ZERO;
                for &j in members {
                    let offset = peds[i].position - peds[j].position;
                    if i != j && offset.length() <= threshold {
                        sum += offset;
                    }
                }
                forces[i] = sum * self.settings.factor;
            }
        }
        forces
    }
}

/// Closed set of force contributions.
#[derive(Clone, Debug)]
pub enum PedestrianForce {
    /// Repulsion from the robot
    Robot(PedRobotForce),
    /// Goal seeking
    Desired(DesiredForce),
    /// Group cohesion
    Group(GroupCohesionForce),
}

impl PedestrianForce {
    /// Per-pedestrian force, one entry per pedestrian in `ctx`
    pub fn compute(&mut self, ctx: &ForceContext<'_>) -> Vec<Point2D> {
        match self {
            Self::Robot(f) => f.compute(ctx),
            Self::Desired(f) => f.compute(ctx),
            Self::Group(f) => f.compute(ctx),
        }
    }
}

/// Ordered list of forces whose outputs are summed.
#[derive(Clone, Debug, Default)]
pub struct ForceModel {
    forces: Vec<PedestrianForce>,
}

impl ForceModel {
    /// Model from an explicit force list
    pub fn new(forces: Vec<PedestrianForce>) -> Self {
        Self { forces }
    }

    /// Goal seeking, then robot repulsion and group cohesion when enabled
    pub fn from_settings(settings: &PedestrianSettings, robot_radius: f32) -> Self {
        let mut forces = vec![PedestrianForce::Desired(DesiredForce::new(
            settings.desired_force.clone(),
        ))];
        if settings.robot_force.enabled {
            forces.push(PedestrianForce::Robot(PedRobotForce::new(
                settings.robot_force.clone(),
                robot_radius,
                settings.radius,
            )));
        }
        if settings.group_force.enabled {
            forces.push(PedestrianForce::Group(GroupCohesionForce::new(
                settings.group_force.clone(),
            )));
        }
        Self::new(forces)
    }

    /// Forces in evaluation order
    pub fn forces(&self) -> &[PedestrianForce] {
        &self.forces
    }

    /// Push the robot position into every robot-repulsion force
    pub fn update_robot_position(&mut self, position: Point2D) {
        for force in &mut self.forces {
            if let PedestrianForce::Robot(f) = force {
                f.update_robot_position(position);
            }
        }
    }

    /// Clear per-pedestrian memory after the crowd is repopulated
    pub fn reset(&mut self) {
        for force in &mut self.forces {
            if let PedestrianForce::Desired(f) = force {
                f.reset();
            }
        }
    }

    /// Summed force per pedestrian
    pub fn compute(&mut self, ctx: &ForceContext<'_>) -> Vec<Point2D> {
        let mut total = vec![Point2D::ZERO; ctx.pedestrians.len()];
        for force in &mut self.forces {
            for (sum, f) in total.iter_mut().zip(force.compute(ctx)) {
                *sum += f;
            }
        }
        total
    }
}
