//! Broad-phase partitioning primitives.

pub use self::sweep_prune::{
    calculate_bounds_overlaps, BoundsRep, InteractionGroups, SweepAxes,
};

mod sweep_prune;
