//! Batch sweep-and-prune overlap detection over bounding boxes.

use crate::bounding_volume::Aabb;
use crate::math::Real;
use ordered_float::OrderedFloat;

bitflags::bitflags! {
    /// The coordinate axes a sweep pass may project onto.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct SweepAxes: u8 {
        /// Sweep along the x axis.
        const X = 1;
        /// Sweep along the y axis.
        const Y = 2;
        /// Sweep along the z axis.
        const Z = 4;
        /// Sweep along x and y.
        const XY = Self::X.bits() | Self::Y.bits();
        /// Sweep along y and z.
        const YZ = Self::Y.bits() | Self::Z.bits();
        /// Sweep along z and x.
        const ZX = Self::Z.bits() | Self::X.bits();
        /// Sweep along all three axes.
        const XYZ = Self::X.bits() | Self::Y.bits() | Self::Z.bits();
    }
}

/// A bounding box participating in an overlap sweep.
#[derive(Clone, Debug)]
pub struct BoundsRep {
    /// The box bounds.
    pub aabb: Aabb,
    /// The interaction group of this box. Valid range `{0..7}`.
    pub group: u32,
}

impl Default for BoundsRep {
    fn default() -> Self {
        BoundsRep {
            aabb: Aabb::new_invalid(),
            group: 0,
        }
    }
}

/// A symmetric 8×8 interaction-group matrix packed into 64 bits.
///
/// By default only boxes of the same group report overlaps.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InteractionGroups {
    bits: u64,
}

impl Default for InteractionGroups {
    fn default() -> Self {
        InteractionGroups {
            bits: 0x8040_2010_0804_0201,
        }
    }
}

impl InteractionGroups {
    /// A matrix with every pairing enabled or disabled.
    pub fn all(interacts: bool) -> Self {
        InteractionGroups {
            bits: if interacts { u64::MAX } else { 0 },
        }
    }

    /// Enables or disables the (symmetric) pairing of two groups.
    ///
    /// Returns `false` when a group index is out of range.
    pub fn set(&mut self, group1: u32, group2: u32, interacts: bool) -> bool {
        if group1 >= 8 || group2 >= 8 {
            return false;
        }
        let mask = (1u64 << ((group1 << 3) + group2)) | (1u64 << ((group2 << 3) + group1));
        if interacts {
            self.bits |= mask;
        } else {
            self.bits &= !mask;
        }
        true
    }

    /// The interaction row of a group, one bit per partner group.
    fn row(&self, group: u32) -> u8 {
        (self.bits >> ((group & 7) << 3)) as u8
    }
}

struct Marker {
    pos: Real,
    id: u32, // lsb = type (0 = max, 1 = min), the remaining bits hold the object index
}

/// Finds all overlapping box pairs of `bounds` using a sweep along the
/// least-loaded of the selected axes.
///
/// Each unordered pair is reported once, as `(i, j)` object indices, subject
/// to the interaction-group matrix. This is a single batch computation: every
/// intermediate buffer is allocated up front and no state is retained between
/// calls. Unless `append` is set, `overlaps` is cleared first.
pub fn calculate_bounds_overlaps(
    axes_to_use: SweepAxes,
    bounds: &[BoundsRep],
    interactions: &InteractionGroups,
    append: bool,
    overlaps: &mut Vec<(usize, usize)>,
) {
    if !append {
        overlaps.clear();
    }

    let mut axis_nums = [0usize; 3];
    let mut dim = 0;
    for i in 0..3 {
        if (axes_to_use.bits() >> i) & 1 == 1 {
            axis_nums[dim] = i;
            dim += 1;
        }
    }

    if dim == 0 || bounds.is_empty() {
        return;
    }

    // Build the sorted marker list of every selected axis, and count how many
    // overlaps a sweep along each axis would have to track.
    let mut axes: Vec<Vec<Marker>> = Vec::with_capacity(dim);
    let mut overlap_count = [0usize; 3];

    for (n, axis_num) in axis_nums[..dim].iter().enumerate() {
        let mut axis = Vec::with_capacity(2 * bounds.len());
        for (i, rep) in bounds.iter().enumerate() {
            let mut min = rep.aabb.mins[*axis_num];
            let mut max = rep.aabb.maxs[*axis_num];
            if min >= max {
                let mid = 0.5 * (min + max);
                let pad = 1.0e-6 * mid.abs();
                min = mid - pad;
                max = mid + pad;
            }
            axis.push(Marker {
                pos: min,
                id: (i as u32) << 1 | 1,
            });
            axis.push(Marker {
                pos: max,
                id: (i as u32) << 1,
            });
        }
        // Sort by position; on ties the max markers come first, to reduce the
        // number of tracked overlaps.
        axis.sort_by_key(|m| (OrderedFloat(m.pos), m.id & 1));

        let mut local: isize = 0;
        for marker in &axis {
            if marker.id & 1 == 1 {
                overlap_count[n] += local.max(0) as usize;
                local += 1;
            } else {
                local -= 1;
            }
        }
        axes.push(axis);
    }

    // Sweep the least-loaded axis and test the remaining axes directly.
    let max_bin;
    let axis1;
    let axis2;
    if dim == 1 {
        max_bin = 0;
        axis1 = axis_nums[0];
        axis2 = axis_nums[0];
    } else if dim == 2 {
        if overlap_count[0] < overlap_count[1] {
            max_bin = 0;
            axis1 = axis_nums[1];
        } else {
            max_bin = 1;
            axis1 = axis_nums[0];
        }
        axis2 = axis_nums[max_bin];
    } else {
        max_bin = if overlap_count[0] < overlap_count[1] {
            if overlap_count[0] < overlap_count[2] {
                0
            } else {
                2
            }
        } else if overlap_count[1] < overlap_count[2] {
            1
        } else {
            2
        };
        let axis0 = axis_nums[max_bin];
        axis1 = (axis0 + 1) % 3;
        axis2 = (axis0 + 2) % 3;
    }

    let mut active_items: Vec<u32> = Vec::with_capacity(bounds.len());
    let mut active_pos: Vec<u32> = vec![u32::MAX; bounds.len()];

    for marker in &axes[max_bin] {
        let index = (marker.id >> 1) as usize;
        if marker.id & 1 == 1 {
            let rep = &bounds[index];
            let interaction = interactions.row(rep.group);
            for other in &active_items {
                let other = *other as usize;
                let other_rep = &bounds[other];
                if (interaction >> (other_rep.group & 7)) & 1 == 0 {
                    continue;
                }
                if dim > 1 {
                    if rep.aabb.mins[axis1] >= other_rep.aabb.maxs[axis1]
                        || rep.aabb.maxs[axis1] <= other_rep.aabb.mins[axis1]
                    {
                        continue;
                    }
                    if dim == 3
                        && (rep.aabb.mins[axis2] >= other_rep.aabb.maxs[axis2]
                            || rep.aabb.maxs[axis2] <= other_rep.aabb.mins[axis2])
                    {
                        continue;
                    }
                }
                overlaps.push((index, other));
            }
            active_pos[index] = active_items.len() as u32;
            active_items.push(index as u32);
        } else {
            let pos = active_pos[index] as usize;
            if pos >= active_items.len() {
                continue; // degenerate ordering, the box was never entered
            }
            let _ = active_items.swap_remove(pos);
            if pos < active_items.len() {
                active_pos[active_items[pos] as usize] = pos as u32;
            }
            active_pos[index] = u32::MAX;
        }
    }
}
