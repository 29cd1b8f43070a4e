//! Core geometry types.
//!
//! - [`Point2D`]: world point / free vector in meters
//! - [`Pose2D`]: robot position and heading
//! - [`Line2D`]: obstacle edge segment
//! - [`math`]: angle normalization and ray/circle intersection
//!
//! Coordinates are X-right, Y-up with counter-clockwise positive rotation.

mod line;
pub mod math;
mod point;
mod pose;

pub use line::{Line2D, MIN_SEGMENT_LENGTH};
pub use math::{TWO_PI, angle_diff, normalize_angle, ray_circle_intersection};
pub use point::{NORM_EPSILON, Point2D};
pub use pose::Pose2D;
