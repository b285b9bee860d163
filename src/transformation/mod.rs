//! Point-set and plane-set transformation algorithms.

pub use self::convex_hull::{try_convex_hull_mesh, ConvexHullError};
pub use self::kdop::{kdop_directions, KdopMethod};

mod convex_hull;
mod kdop;
