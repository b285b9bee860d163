//! Proximity queries between hulls, points, and spheres.

use crate::math::{Isometry, Point, Real, Vector};
use crate::query::gjk::{self, GjkOutput, GjkStatus, ScaledPoints};
use crate::shape::{ConvexHull, Plane};

/// A separating (or contact) plane between two shapes, with both shapes'
/// projected extents along the plane normal.
#[derive(Copy, Clone, Debug)]
pub struct Separation {
    /// The world-space separating plane, oriented from shape 0 toward
    /// shape 1, positioned at the midpoint of the gap (or overlap).
    pub plane: Plane,
    /// The minimum projection of shape 0 along the plane normal.
    pub min0: Real,
    /// The maximum projection of shape 0 along the plane normal.
    pub max0: Real,
    /// The minimum projection of shape 1 along the plane normal.
    pub min1: Real,
    /// The maximum projection of shape 1 along the plane normal.
    pub max1: Real,
}

impl Default for Separation {
    fn default() -> Self {
        Separation {
            plane: Plane::new(Vector::zeros(), 0.0),
            min0: 0.0,
            max0: 0.0,
            min1: 0.0,
            max1: 0.0,
        }
    }
}

impl Separation {
    /// The signed distance between the two projected extents (negative when
    /// they overlap).
    pub fn distance(&self) -> Real {
        crate::utils::extent_distance(self.min0, self.max0, self.min1, self.max1)
    }
}

/// Tests whether two posed, non-uniformly scaled hulls are within
/// `max_distance` of each other.
///
/// Returns `false` when the distance between the hulls exceeds
/// `max_distance` (or either hull is empty). When `separation` is provided
/// it receives the separating plane and the projected extents of both hulls,
/// whether or not the hulls are in proximity.
///
/// A degenerate GJK result falls back to comparing the squared distance
/// against one percent of the summed minimum bounding-box extents of the
/// two hulls.
pub fn hulls_in_proximity(
    hull0: &ConvexHull,
    local_to_world0: &Isometry<Real>,
    scale0: &Vector<Real>,
    hull1: &ConvexHull,
    local_to_world1: &Isometry<Real>,
    scale1: &Vector<Real>,
    max_distance: Real,
    mut separation: Option<&mut Separation>,
) -> bool {
    if hull0.is_empty() || hull1.is_empty() {
        return false;
    }

    let convex0 = ScaledPoints {
        points: hull0.vertices(),
        scale: *scale0,
    };
    let convex1 = ScaledPoints {
        points: hull1.vertices(),
        scale: *scale1,
    };

    let pos10 = local_to_world0.inv_mul(local_to_world1);

    // The origin of hull1 in hull0's space is the difference of the
    // transform origins, which makes a good first guess of the separating
    // direction.
    let initial_dir = pos10.translation.vector;

    let mut output = GjkOutput::default();
    let mut status = gjk::closest_points(&initial_dir, &convex0, &pos10, &convex1, &mut output);

    if status == GjkStatus::Degenerate {
        // Derive the fallback tolerance from the scaled hull extents.
        let tolerance0 = hull0.bounds().half_extents().component_mul(scale0).min();
        let tolerance1 = hull1.bounds().half_extents().component_mul(scale1).min();
        let tolerance = (tolerance0 + tolerance1) * 0.01;
        status = if tolerance * tolerance > output.dist_sq {
            GjkStatus::Contact
        } else {
            GjkStatus::NonIntersecting
        };
    }

    if let Some(sep) = separation.as_deref_mut() {
        calc_hull_separation(&convex0, local_to_world0, &pos10, &convex1, &output, sep);
    }

    match status {
        GjkStatus::Contact => true,
        _ => output.dist_sq < max_distance * max_distance,
    }
}

/// Tests whether a posed, scaled hull is within `max_distance` of a sphere.
///
/// The sphere radius is folded into the distance threshold rather than run
/// through the support mapping. In the optional `separation` report, the `0`
/// extents correspond to the hull and the `1` extents to the sphere.
pub fn sphere_in_proximity(
    hull: &ConvexHull,
    hull_local_to_world: &Isometry<Real>,
    hull_scale: &Vector<Real>,
    sphere_world_center: &Point<Real>,
    sphere_radius: Real,
    max_distance: Real,
    mut separation: Option<&mut Separation>,
) -> bool {
    if hull.is_empty() {
        return false;
    }

    let convex = ScaledPoints {
        points: hull.vertices(),
        scale: *hull_scale,
    };

    // Put the sphere's center in the hull's space.
    let center_local = hull_local_to_world.inverse_transform_point(sphere_world_center);

    let mut output = GjkOutput::default();
    let mut status = gjk::closest_point_to_point(&convex, &center_local, &mut output);

    if status == GjkStatus::Degenerate {
        status = if output.dist_sq > sphere_radius * sphere_radius {
            GjkStatus::NonIntersecting
        } else {
            GjkStatus::Contact
        };
    }

    if let Some(sep) = separation.as_deref_mut() {
        calc_sphere_separation(
            &convex,
            hull_local_to_world,
            sphere_world_center,
            sphere_radius,
            &output,
            sep,
        );
    }

    match status {
        GjkStatus::Contact => true,
        _ => {
            let max_total = max_distance + sphere_radius;
            output.dist_sq < max_total * max_total
        }
    }
}

/// Tests whether a posed, scaled hull is within `max_distance` of a point.
pub fn point_in_proximity(
    hull: &ConvexHull,
    hull_local_to_world: &Isometry<Real>,
    hull_scale: &Vector<Real>,
    world_point: &Point<Real>,
    max_distance: Real,
    separation: Option<&mut Separation>,
) -> bool {
    sphere_in_proximity(
        hull,
        hull_local_to_world,
        hull_scale,
        world_point,
        0.0,
        max_distance,
        separation,
    )
}

fn calc_hull_separation(
    convex0: &ScaledPoints,
    a_to_world: &Isometry<Real>,
    b_to_a: &Isometry<Real>,
    convex1: &ScaledPoints,
    output: &GjkOutput,
    sep: &mut Separation,
) {
    let normal_a = output.normal();
    (sep.min0, sep.max0) = convex0.extent(&normal_a);

    let normal_b = b_to_a.inverse_transform_vector(&normal_a);
    (sep.min1, sep.max1) = convex1.extent(&normal_b);

    // Offset hull1's projections by the distance of B's origin from A's
    // space along the normal.
    let fix = b_to_a.translation.vector.dot(&normal_a);
    sep.min1 += fix;
    sep.max1 += fix;

    // The plane sits at the midpoint between the closest points.
    let center = na::center(&output.closest_a, &output.closest_b);
    let world_center = a_to_world.transform_point(&center);
    let world_normal = a_to_world.rotation * normal_a;
    sep.plane = Plane::new(world_normal, -world_normal.dot(&world_center.coords));
}

fn calc_sphere_separation(
    convex: &ScaledPoints,
    hull_to_world: &Isometry<Real>,
    sphere_center_world: &Point<Real>,
    sphere_radius: Real,
    output: &GjkOutput,
    sep: &mut Separation,
) {
    let normal = output.normal();
    let world_normal = hull_to_world.rotation * normal;

    // The hull extents are computed in local space; correct them by the
    // world-space origin offset.
    let origin_offset = world_normal.dot(&hull_to_world.translation.vector);
    (sep.min0, sep.max0) = convex.extent(&normal);
    sep.min0 += origin_offset;
    sep.max0 += origin_offset;

    let center_dist = world_normal.dot(&sphere_center_world.coords);
    sep.min1 = center_dist - sphere_radius;
    sep.max1 = center_dist + sphere_radius;

    sep.plane = Plane::new(world_normal, -0.5 * (sep.max0 + sep.min1));
}
