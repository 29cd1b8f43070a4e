//! Drive model integration tests through [`RobotKinematics`].

use approx::assert_relative_eq;
use robot_sf::config::{BicycleDriveSettings, DifferentialDriveSettings, RobotSettings};
use robot_sf::core::Pose2D;
use robot_sf::robot::{RobotAction, RobotKinematics};
use std::f32::consts::PI;

const DT: f32 = 0.1;

fn differential() -> RobotKinematics {
    RobotKinematics::from_settings(&RobotSettings::Differential(
        DifferentialDriveSettings::default(),
    ))
    .unwrap()
}

#[test]
fn test_wheel_speeds_follow_velocity() {
    let mut robot = differential();
    robot.reset_state(Pose2D::new(5.0, 5.0, 0.0));
    let settings = DifferentialDriveSettings::default();

    let actions = [(0.4, 0.1), (0.4, -0.3), (-0.2, 0.5), (1.5, -1.0), (0.0, 0.0)];
    for (linear, angular) in actions {
        let previous = match &robot {
            RobotKinematics::Differential { state, .. } => state.wheel_speeds,
            _ => unreachable!(),
        };
        robot.apply_action(RobotAction::new(linear, angular), DT).unwrap();

        let RobotKinematics::Differential { state, .. } = &robot else {
            unreachable!()
        };
        let half = settings.interaxis_length * state.angular_velocity / 2.0;
        assert_relative_eq!(
            state.wheel_speeds.0,
            (state.linear_velocity - half) / settings.wheel_radius,
            epsilon = 1e-4
        );
        assert_relative_eq!(
            state.wheel_speeds.1,
            (state.linear_velocity + half) / settings.wheel_radius,
            epsilon = 1e-4
        );
        assert_eq!(state.last_wheel_speeds, previous);
        assert!((0.0..=settings.max_linear_speed).contains(&state.linear_velocity));
        assert!(state.angular_velocity.abs() <= settings.max_angular_speed);
    }
}

#[test]
fn test_heading_stays_normalized_while_spinning() {
    let mut robot = differential();
    robot.reset_state(Pose2D::identity());
    for _ in 0..500 {
        robot.apply_action(RobotAction::new(0.0, 0.5), DT).unwrap();
        let theta = robot.pose().theta;
        assert!((-PI..PI).contains(&theta), "heading {}", theta);
    }
    // turning on the spot
    assert_relative_eq!(robot.position().x, 0.0, epsilon = 1e-4);
    assert_relative_eq!(robot.position().y, 0.0, epsilon = 1e-4);
}

#[test]
fn test_straight_drive_distance() {
    let mut robot = differential();
    robot.reset_state(Pose2D::new(0.0, 0.0, PI / 2.0));
    robot.apply_action(RobotAction::new(1.0, 0.0), DT).unwrap();
    // average of standing and 1 m/s over the step
    assert_relative_eq!(robot.position().y, 0.05, epsilon = 1e-5);
    robot.apply_action(RobotAction::new(0.0, 0.0), DT).unwrap();
    assert_relative_eq!(robot.position().y, 0.15, epsilon = 1e-5);
    assert_relative_eq!(robot.position().x, 0.0, epsilon = 1e-5);
}

#[test]
fn test_bicycle_backwards_only_when_allowed() {
    let forward_only = RobotKinematics::from_settings(&RobotSettings::Bicycle(
        BicycleDriveSettings::default(),
    ))
    .unwrap();
    let reversible = RobotKinematics::from_settings(&RobotSettings::Bicycle(
        BicycleDriveSettings {
            allow_backwards: true,
            ..Default::default()
        },
    ))
    .unwrap();

    for mut robot in [forward_only.clone(), reversible.clone()] {
        robot.reset_state(Pose2D::new(10.0, 10.0, 0.0));
        for _ in 0..50 {
            robot.apply_action(RobotAction::new(-1.0, 0.0), DT).unwrap();
        }
        let (low, _) = robot.speed_bounds();
        let (velocity, _) = robot.current_speed();
        assert_relative_eq!(velocity, low[0], epsilon = 1e-4);
    }

    assert_eq!(forward_only.speed_bounds().0[0], 0.0);
    assert_eq!(reversible.speed_bounds().0[0], -3.0);
}

#[test]
fn test_bicycle_turns_towards_steering() {
    let mut robot = RobotKinematics::from_settings(&RobotSettings::Bicycle(
        BicycleDriveSettings::default(),
    ))
    .unwrap();
    robot.reset_state(Pose2D::identity());
    for _ in 0..10 {
        robot.apply_action(RobotAction::new(1.0, 0.3), DT).unwrap();
    }
    assert!(robot.pose().theta > 0.0);
    assert!(robot.position().y > 0.0);
    let (_, steer) = robot.current_speed();
    assert_relative_eq!(steer, 0.3);
}
