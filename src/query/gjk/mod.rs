//! The Gilbert-Johnson-Keerthi distance algorithm.
//!
//! The implementation works on the Minkowski difference of two shapes, each
//! exposed only through a support mapping. A simplex of up to four support
//! points is refined toward the origin; ill-conditioned simplex features are
//! recursively tessellated instead of trusting an unstable closest-point
//! result.

pub use self::gjk::{
    closest_point_to_point, closest_points, GjkOutput, GjkStatus, EPS_ABS_SQ, EPS_REL,
};
pub use self::simplex::{SEGMENT_LENGTH_LIMIT_SQ, TRI_AREA_LIMIT, TRI_EDGE_RATIO_LIMIT};
pub use self::special_support_maps::{ConstantPoint, ScaledPoints};

mod gjk;
mod simplex;
mod special_support_maps;
