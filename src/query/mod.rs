//! Narrow-phase geometric queries.

pub mod gjk;

pub use self::proximity::{
    hulls_in_proximity, point_in_proximity, sphere_in_proximity, Separation,
};

mod proximity;
