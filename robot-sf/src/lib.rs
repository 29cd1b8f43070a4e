//! # robot-sf: Robot Navigation in a Social-Force Crowd
//!
//! Simulates a wheeled robot driving through a continuous 2D map shared
//! with pedestrians driven by a social force model, and turns the scene
//! into fixed-shape, normalized observations for an external controller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use robot_sf::config::EnvSettings;
//! use robot_sf::env::RobotEnv;
//! use robot_sf::map::{MapDefinition, MapDefinitionPool};
//! use robot_sf::robot::RobotAction;
//!
//! let settings = EnvSettings::load("robot_sf.toml")?;
//! let map = MapDefinition::load("maps/corridor.yaml")?;
//! let mut env = RobotEnv::new(settings, MapDefinitionPool::single(map))?;
//!
//! let mut obs = env.reset()?;
//! loop {
//!     let result = env.step(RobotAction::new(0.5, 0.0))?;
//!     obs = result.observation;
//!     if result.terminated {
//!         break;
//!     }
//! }
//! # let _ = obs;
//! # Ok::<(), robot_sf::Error>(())
//! ```
//!
//! ## Coordinate Frame
//!
//! - Map origin at the lower left corner, x right, y up (meters)
//! - Headings counter-clockwise from +x, normalized to [-π, π)
//!
//! ## Architecture
//!
//! - [`core`]: points, poses, segments and angle math
//! - [`config`]: TOML settings for every component
//! - [`map`]: obstacles, zones, routes and map pools
//! - [`occupancy`]: collision and bounds queries
//! - [`robot`]: differential drive and bicycle kinematics
//! - [`pedestrians`]: force model, integrator and crowd population
//! - [`sensors`]: lidar, target sensor and observation stacking
//! - [`navigation`]: robot waypoint following
//! - [`sim`]: physics tick, spawn sampling and snapshots
//! - [`env`]: episode state machine, metadata, reward and metrics
//!
//! ## Tick Order
//!
//! ```text
//! action -> robot kinematics -> pedestrian forces (new robot pose)
//!        -> pedestrian integrator -> occupancy snapshot -> lidar scan
//!        -> sensor fusion -> observation + metadata
//! ```

pub mod config;
pub mod core;
pub mod env;
pub mod error;
pub mod map;
pub mod navigation;
pub mod occupancy;
pub mod pedestrians;
pub mod robot;
pub mod sensors;
pub mod sim;

// Re-export commonly used types
pub use config::EnvSettings;
pub use env::{RobotEnv, StepResult};
pub use error::{Error, Result};
