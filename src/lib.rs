/*!
hull3d
========

**hull3d** is a 3-dimensional convex-hull geometry engine written with
the rust programming language. It covers convex polytope construction
(point clouds, plane sets, boxes, k-DOP direction sets), in-place hull
surgery (half-space truncation, hull intersection, affine transforms),
GJK-based narrow-phase proximity queries, and a sweep-and-prune
broad-phase pair finder.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)]

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod math;
pub mod partitioning;
pub mod query;
pub mod shape;
pub mod transformation;
pub mod utils;
