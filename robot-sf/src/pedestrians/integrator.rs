//! Pedestrian state integration.

use super::Pedestrian;
use crate::core::Point2D;

/// Advances pedestrian velocities and positions from summed forces.
///
/// `forces` holds one entry per pedestrian, in crowd order.
pub trait PedestrianIntegrator: Send {
    /// Integrate one step of `dt` seconds
    fn integrate(&mut self, pedestrians: &mut [Pedestrian], forces: &[Point2D], dt: f32);
}

/// Semi-implicit Euler with per-pedestrian speed clamping.
#[derive(Clone, Copy, Debug, Default)]
pub struct EulerIntegrator;

impl PedestrianIntegrator for EulerIntegrator {
    fn integrate(&mut self, pedestrians: &mut [Pedestrian], forces: &[Point2D], dt: f32) {
        for (ped, force) in pedestrians.iter_mut().zip(forces) {
            ped.velocity = (ped.velocity + *force * dt).clamp_length(ped.max_speed);
            ped.position += ped.velocity * dt;
        }
    }
}

/// Restore `previous` positions for pedestrians whose state became
/// non-finite and stop them. Returns the number of reverted pedestrians.
pub fn reject_non_finite(pedestrians: &mut [Pedestrian], previous: &[Point2D]) -> usize {
    let mut rejected = 0;
    for (ped, prev) in pedestrians.iter_mut().zip(previous) {
        if !ped.position.is_finite() || !ped.velocity.is_finite() {
            ped.position = *prev;
            ped.velocity = Point2D::ZERO;
            rejected += 1;
        }
    }
    if rejected > 0 {
        log::debug!("Reverted {} pedestrians with non-finite state", rejected);
    }
    rejected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedestrians::PedestrianBehavior;
    use approx::assert_relative_eq;

    fn ped() -> Pedestrian {
        Pedestrian::new(
            Point2D::ZERO,
            Point2D::new(10.0, 0.0),
            1.3,
            PedestrianBehavior::Wanderer { zone: 0 },
        )
    }

    #[test]
    fn test_euler_step() {
        let mut peds = [ped()];
        EulerIntegrator.integrate(&mut peds, &[Point2D::new(5.0, 0.0)], 0.1);
        assert_relative_eq!(peds[0].velocity.x, 0.5, epsilon = 1e-6);
        assert_relative_eq!(peds[0].position.x, 0.05, epsilon = 1e-6);
    }

    #[test]
    fn test_speed_clamped_to_max() {
        let mut peds = [ped()];
        EulerIntegrator.integrate(&mut peds, &[Point2D::new(100.0, 100.0)], 0.1);
        assert_relative_eq!(peds[0].velocity.length(), 1.3, epsilon = 1e-5);
    }

    #[test]
    fn test_non_finite_positions_reverted() {
        let mut peds = [ped(), ped()];
        peds[1].position = Point2D::new(1.0, 1.0);
        let previous: Vec<Point2D> = peds.iter().map(|p| p.position).collect();

        EulerIntegrator.integrate(
            &mut peds,
            &[Point2D::new(f32::NAN, 0.0), Point2D::new(1.0, 0.0)],
            0.1,
        );
        let rejected = reject_non_finite(&mut peds, &previous);

        assert_eq!(rejected, 1);
        assert_eq!(peds[0].position, Point2D::ZERO);
        assert_eq!(peds[0].velocity, Point2D::ZERO);
        assert!(peds[1].position.x > 1.0);
    }
}
