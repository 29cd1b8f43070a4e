//! Physics tick and episode spawning.
//!
//! - [`simulator`]: robot, crowd and occupancy of the active map
//! - [`spawn`]: bounded rejection sampling of robot spawns and goals
//! - [`snapshot`]: owned state copies published to renderers

pub mod simulator;
pub mod snapshot;
pub mod spawn;

pub use simulator::Simulator;
pub use snapshot::SimSnapshot;
pub use spawn::{RobotSpawn, SpawnSampler};
