//! Shapes supported by hull3d.

pub use self::convex_hull::{ConvexHull, Edge, NO_FACE};
pub use self::plane::{intersect_planes, point_inside_planes, Plane};
pub use self::support_map::SupportMap;

mod convex_hull;
mod plane;
mod support_map;
