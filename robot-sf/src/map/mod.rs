//! Map description: bounds, obstacles, zones and routes.
//!
//! Maps are authored as YAML ([`MapLayout`]) and validated into a
//! [`MapDefinition`], which precomputes the obstacle segments used by the
//! occupancy model, the range sensor and pedestrian obstacle avoidance.

mod definition;
mod obstacle;
mod pool;
mod zone;

pub use definition::{MapDefinition, MapLayout};
pub use obstacle::Obstacle;
pub use pool::MapDefinitionPool;
pub use zone::{GlobalRoute, Zone};
