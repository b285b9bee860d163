use hull3d::bounding_volume::Aabb;
use hull3d::math::Real;
use hull3d::partitioning::{
    calculate_bounds_overlaps, BoundsRep, InteractionGroups, SweepAxes,
};
use na::Point3;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn random_bounds(count: usize, seed: u64) -> Vec<BoundsRep> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mins = Point3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let extents = na::Vector3::new(
                rng.gen_range(0.1..3.0),
                rng.gen_range(0.1..3.0),
                rng.gen_range(0.1..3.0),
            );
            BoundsRep {
                aabb: Aabb::new(mins, mins + extents),
                group: 0,
            }
        })
        .collect()
}

fn strictly_overlap(a: &Aabb, b: &Aabb, axes: SweepAxes) -> bool {
    for i in 0..3 {
        if axes.bits() >> i & 1 == 0 {
            continue;
        }
        if a.mins[i] >= b.maxs[i] || b.mins[i] >= a.maxs[i] {
            return false;
        }
    }
    true
}

fn canonical(pairs: &[(usize, usize)]) -> HashSet<(usize, usize)> {
    pairs
        .iter()
        .map(|(a, b)| (*a.min(b), *a.max(b)))
        .collect()
}

fn brute_force(bounds: &[BoundsRep], axes: SweepAxes) -> HashSet<(usize, usize)> {
    let mut set = HashSet::new();
    for i in 0..bounds.len() {
        for j in i + 1..bounds.len() {
            if strictly_overlap(&bounds[i].aabb, &bounds[j].aabb, axes) {
                let _ = set.insert((i, j));
            }
        }
    }
    set
}

#[test]
fn sweep_matches_brute_force_in_3d() {
    for seed in 0..5 {
        let bounds = random_bounds(120, seed);
        let mut overlaps = Vec::new();
        calculate_bounds_overlaps(
            SweepAxes::XYZ,
            &bounds,
            &InteractionGroups::default(),
            false,
            &mut overlaps,
        );

        // Every symmetric pair is reported exactly once.
        assert_eq!(canonical(&overlaps).len(), overlaps.len());
        assert_eq!(canonical(&overlaps), brute_force(&bounds, SweepAxes::XYZ));
    }
}

#[test]
fn one_and_two_axis_sweeps() {
    let bounds = random_bounds(80, 99);

    for axes in [SweepAxes::X, SweepAxes::Z, SweepAxes::XY, SweepAxes::YZ] {
        let mut overlaps = Vec::new();
        calculate_bounds_overlaps(
            axes,
            &bounds,
            &InteractionGroups::default(),
            false,
            &mut overlaps,
        );
        assert_eq!(canonical(&overlaps), brute_force(&bounds, axes));
    }
}

#[test]
fn interaction_groups_filter_pairs() {
    let mut bounds = random_bounds(60, 3);
    for (i, rep) in bounds.iter_mut().enumerate() {
        rep.group = (i % 2) as u32;
    }

    // Default: only same-group pairs.
    let mut overlaps = Vec::new();
    calculate_bounds_overlaps(
        SweepAxes::XYZ,
        &bounds,
        &InteractionGroups::default(),
        false,
        &mut overlaps,
    );
    for (i, j) in &overlaps {
        assert_eq!(bounds[*i].group, bounds[*j].group);
    }

    // Cross-group only.
    let mut interactions = InteractionGroups::all(false);
    assert!(interactions.set(0, 1, true));
    let mut cross = Vec::new();
    calculate_bounds_overlaps(SweepAxes::XYZ, &bounds, &interactions, false, &mut cross);
    for (i, j) in &cross {
        assert_ne!(bounds[*i].group, bounds[*j].group);
    }

    // All pairings: the union of both filters.
    let mut all = Vec::new();
    calculate_bounds_overlaps(
        SweepAxes::XYZ,
        &bounds,
        &InteractionGroups::all(true),
        false,
        &mut all,
    );
    assert_eq!(all.len(), overlaps.len() + cross.len());

    // Out-of-range groups are rejected.
    assert!(!interactions.set(8, 0, true));
}

#[test]
fn append_keeps_previous_pairs() {
    let bounds = random_bounds(40, 11);

    let mut overlaps = vec![(997, 998)];
    calculate_bounds_overlaps(
        SweepAxes::XYZ,
        &bounds,
        &InteractionGroups::default(),
        true,
        &mut overlaps,
    );
    assert_eq!(overlaps[0], (997, 998));

    calculate_bounds_overlaps(
        SweepAxes::XYZ,
        &bounds,
        &InteractionGroups::default(),
        false,
        &mut overlaps,
    );
    assert!(!overlaps.contains(&(997, 998)));
}

#[test]
fn touching_boxes_do_not_overlap() {
    let bounds = vec![
        BoundsRep {
            aabb: Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0)),
            group: 0,
        },
        BoundsRep {
            aabb: Aabb::new(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0)),
            group: 0,
        },
        BoundsRep {
            aabb: Aabb::new(Point3::new(0.5, 0.5, 0.5), Point3::new(1.5, 1.5, 1.5)),
            group: 0,
        },
    ];

    let mut overlaps = Vec::new();
    calculate_bounds_overlaps(
        SweepAxes::XYZ,
        &bounds,
        &InteractionGroups::default(),
        false,
        &mut overlaps,
    );

    let set = canonical(&overlaps);
    assert!(!set.contains(&(0, 1)));
    assert!(set.contains(&(0, 2)));
    assert!(set.contains(&(1, 2)));
}

#[test]
fn degenerate_boxes_are_padded() {
    // A zero-thickness box inside a regular one still pairs with it.
    let bounds = vec![
        BoundsRep {
            aabb: Aabb::new(Point3::origin(), Point3::new(2.0, 2.0, 2.0)),
            group: 0,
        },
        BoundsRep {
            aabb: Aabb::new(Point3::new(1.0, 1.0, 1.0), Point3::new(1.0, 1.0, 1.0)),
            group: 0,
        },
    ];

    let mut overlaps = Vec::new();
    calculate_bounds_overlaps(
        SweepAxes::XYZ,
        &bounds,
        &InteractionGroups::default(),
        false,
        &mut overlaps,
    );
    assert_eq!(canonical(&overlaps), HashSet::from([(0, 1)]));
}

#[test]
fn empty_input_is_a_noop() {
    let mut overlaps = Vec::new();
    calculate_bounds_overlaps(
        SweepAxes::XYZ,
        &[],
        &InteractionGroups::default(),
        false,
        &mut overlaps,
    );
    assert!(overlaps.is_empty());

    let bounds = random_bounds(10, 1);
    calculate_bounds_overlaps(
        SweepAxes::empty(),
        &bounds,
        &InteractionGroups::default(),
        false,
        &mut overlaps,
    );
    assert!(overlaps.is_empty());
}

#[test]
fn marker_pad_is_relative() {
    // The pad on degenerate extents is proportional to the coordinate, so a
    // degenerate box far from the origin still gets a usable slab.
    let center = 1000.0 as Real;
    let bounds = vec![
        BoundsRep {
            aabb: Aabb::new(
                Point3::new(center, 0.0, 0.0),
                Point3::new(center, 1.0, 1.0),
            ),
            group: 0,
        },
        BoundsRep {
            aabb: Aabb::new(
                Point3::new(center - 0.5, 0.0, 0.0),
                Point3::new(center + 0.5, 1.0, 1.0),
            ),
            group: 0,
        },
    ];

    let mut overlaps = Vec::new();
    calculate_bounds_overlaps(
        SweepAxes::X,
        &bounds,
        &InteractionGroups::default(),
        false,
        &mut overlaps,
    );
    assert_eq!(overlaps.len(), 1);
}
