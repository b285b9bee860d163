use hull3d::bounding_volume::Aabb;
use hull3d::math::Real;
use hull3d::shape::ConvexHull;
use hull3d::transformation::{kdop_directions, KdopMethod};
use na::{Matrix3, Point3, Vector3};
use rand::{Rng, SeedableRng};

fn unit_cube_corners() -> Vec<Point3<Real>> {
    let mut pts = Vec::new();
    for i in 0..8 {
        pts.push(Point3::new(
            (i & 1) as Real,
            ((i >> 1) & 1) as Real,
            ((i >> 2) & 1) as Real,
        ));
    }
    pts
}

fn assert_contains_points(hull: &ConvexHull, points: &[Point3<Real>], eps: Real) {
    for p in points {
        for i in 0..hull.plane_count() {
            let dist = hull.plane(i).distance(p);
            assert!(
                dist <= eps,
                "point {p:?} lies {dist} outside hull plane {i}"
            );
        }
    }
}

#[test]
fn aabb_hull_has_expected_counts() {
    let aabb = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
    let hull = ConvexHull::from_aabb(&aabb);

    assert_eq!(hull.vertices().len(), 8);
    assert_eq!(hull.unique_plane_count(), 3);
    assert_eq!(hull.plane_count(), 6);
    assert_eq!(hull.edges().len(), 12);
    assert_eq!(hull.unique_edge_direction_count(), 3);
    assert!((hull.volume() - 1.0).abs() < 1.0e-6);

    for width in hull.widths() {
        assert!((width - 1.0).abs() < 1.0e-6);
    }

    assert_contains_points(&hull, &unit_cube_corners(), 1.0e-5);
}

#[test]
fn point_cloud_hull_of_a_cube() {
    let mut pts = unit_cube_corners();
    // Interior points must not end up on the hull.
    pts.push(Point3::new(0.5, 0.5, 0.5));
    pts.push(Point3::new(0.25, 0.75, 0.5));

    let hull = ConvexHull::from_point_cloud(&pts);
    assert!(!hull.is_empty());
    assert_eq!(hull.vertices().len(), 8);
    assert!((hull.volume() - 1.0).abs() < 1.0e-3);
    assert_eq!(hull.plane_count(), 6);
    assert_contains_points(&hull, &pts, 1.0e-3);
}

#[test]
fn point_cloud_hull_contains_every_input_point() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    for _ in 0..10 {
        let pts: Vec<Point3<Real>> = (0..60)
            .map(|_| {
                Point3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                )
            })
            .collect();

        let hull = ConvexHull::from_point_cloud(&pts);
        assert!(!hull.is_empty());
        assert!(hull.volume() > 0.0);
        assert_contains_points(&hull, &pts, 1.0e-3);

        // The hull is internally consistent: each unique direction is a slab
        // of positive width.
        for width in hull.widths() {
            assert!(*width > 0.0);
        }
    }
}

#[test]
fn degenerate_point_clouds_yield_empty_hulls() {
    // Too few points.
    let hull = ConvexHull::from_point_cloud(&unit_cube_corners()[..3]);
    assert!(hull.is_empty());
    assert_eq!(hull.volume(), 0.0);

    // Coplanar points.
    let coplanar: Vec<Point3<Real>> = (0..16)
        .map(|i| Point3::new((i % 4) as Real, (i / 4) as Real, 2.0))
        .collect();
    assert!(ConvexHull::from_point_cloud(&coplanar).is_empty());

    // Collinear points.
    let collinear: Vec<Point3<Real>> =
        (0..8).map(|i| Point3::new(i as Real, 0.0, 0.0)).collect();
    assert!(ConvexHull::from_point_cloud(&collinear).is_empty());

    // Coincident points.
    let coincident = vec![Point3::new(1.0, 2.0, 3.0); 8];
    assert!(ConvexHull::from_point_cloud(&coincident).is_empty());
}

#[test]
fn plane_set_rebuild_reproduces_the_hull() {
    let aabb = Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
    let hull = ConvexHull::from_aabb(&aabb);

    let planes: Vec<_> = (0..hull.plane_count()).map(|i| hull.plane(i)).collect();
    let rebuilt = ConvexHull::from_planes(&planes, 1.0e-5);

    assert_eq!(rebuilt.vertices().len(), hull.vertices().len());
    assert!((rebuilt.volume() - hull.volume()).abs() < 1.0e-3);
}

#[test]
fn unbounded_plane_set_yields_an_empty_hull() {
    // A single half-space has no bounded intersection.
    let hull = ConvexHull::from_planes(
        &[hull3d::shape::Plane::new(Vector3::x(), -1.0)],
        1.0e-5,
    );
    assert!(hull.is_empty());
}

#[test]
fn tetrahedron_has_only_unpaired_directions() {
    let pts = [
        Point3::origin(),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
    ];
    let hull = ConvexHull::from_point_cloud(&pts);

    assert_eq!(hull.vertices().len(), 4);
    // No face of a tetrahedron has a parallel opposite: every direction is
    // one-sided, so the back faces are not enumerated.
    assert_eq!(hull.unique_plane_count(), 4);
    assert_eq!(hull.plane_count(), 4);
    assert_eq!(hull.edges().len(), 6);
    assert_eq!(hull.unique_edge_direction_count(), 6);
    assert!((hull.volume() - 1.0 / 6.0).abs() < 1.0e-4);

    // The one-sided widths still measure the vertex extent along each
    // direction.
    for (i, width) in hull.widths().iter().enumerate() {
        assert!(*width > 0.0, "width {i} not positive");
        assert!(*width < Real::MAX);
    }
}

#[test]
fn kdop_hulls_wrap_the_input() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let pts: Vec<Point3<Real>> = (0..40)
        .map(|_| {
            Point3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
        })
        .collect();

    let exact = ConvexHull::from_point_cloud(&pts);

    for method in [KdopMethod::Dop6, KdopMethod::Dop14Xy, KdopMethod::Dop26] {
        let directions = kdop_directions(method);
        let kdop = ConvexHull::from_kdop(&pts, &directions);
        assert!(!kdop.is_empty());
        assert_contains_points(&kdop, &pts, 1.0e-3);
        // A k-DOP is an outer approximation.
        assert!(kdop.volume() >= exact.volume() - 1.0e-3);
    }
}

#[test]
fn identity_transform_is_idempotent() {
    let hull = ConvexHull::from_point_cloud(&unit_cube_corners());
    let mut moved = hull.clone();
    let mirrored = moved.apply_transform(&Matrix3::identity(), &Vector3::zeros());
    assert!(!mirrored);

    assert_eq!(hull.vertices().len(), moved.vertices().len());
    for (a, b) in hull.vertices().iter().zip(moved.vertices().iter()) {
        assert!((a - b).norm() < 1.0e-6);
    }
    for (a, b) in hull.unique_planes().iter().zip(moved.unique_planes().iter()) {
        assert!((a.normal - b.normal).norm() < 1.0e-6);
        assert!((a.d - b.d).abs() < 1.0e-6);
    }
    assert!((hull.volume() - moved.volume()).abs() < 1.0e-6);
}

#[test]
fn nonuniform_scale_keeps_planes_on_faces() {
    let mut hull = ConvexHull::from_point_cloud(&unit_cube_corners());
    let linear = Matrix3::from_diagonal(&Vector3::new(2.0, 3.0, 0.5));
    let mirrored = hull.apply_transform(&linear, &Vector3::new(1.0, -1.0, 0.0));
    assert!(!mirrored);

    assert!((hull.volume() - 3.0).abs() < 1.0e-2);
    let vertices = hull.vertices().to_vec();
    assert_contains_points(&hull, &vertices, 1.0e-3);
}

#[test]
fn mirroring_transform_reports_flipped_winding() {
    let mut hull = ConvexHull::from_point_cloud(&unit_cube_corners());
    let linear = Matrix3::from_diagonal(&Vector3::new(-1.0, 1.0, 1.0));
    let mirrored = hull.apply_transform(&linear, &Vector3::zeros());
    assert!(mirrored);

    // Sign normalization keeps the planes outward and the volume positive.
    assert!((hull.volume() - 1.0).abs() < 1.0e-3);
    let vertices = hull.vertices().to_vec();
    assert_contains_points(&hull, &vertices, 1.0e-3);
}

#[test]
fn isometry_fast_path_matches_general_transform() {
    let iso = na::Isometry3::new(
        Vector3::new(1.0, 2.0, -3.0),
        Vector3::new(0.3, -0.2, 0.5),
    );
    let scale = 2.0;

    let mut fast = ConvexHull::from_point_cloud(&unit_cube_corners());
    fast.apply_isometry(&iso, scale);

    let mut general = ConvexHull::from_point_cloud(&unit_cube_corners());
    let linear = iso.rotation.to_rotation_matrix().into_inner() * scale;
    let _ = general.apply_transform(&linear, &(iso.translation.vector * scale));

    assert!((fast.volume() - general.volume()).abs() < 1.0e-3);
    for (a, b) in fast.vertices().iter().zip(general.vertices().iter()) {
        assert!((a - b).norm() < 1.0e-4);
    }
    for (a, b) in fast.unique_planes().iter().zip(general.unique_planes().iter()) {
        assert!((a.normal - b.normal).norm() < 1.0e-4);
        assert!((a.d - b.d).abs() < 1.0e-3);
    }
}

#[test]
fn hull_intersection_of_overlapping_cubes() {
    let mut hull = ConvexHull::from_aabb(&Aabb::new(
        Point3::origin(),
        Point3::new(1.0, 1.0, 1.0),
    ));
    let other = ConvexHull::from_aabb(&Aabb::new(
        Point3::new(0.5, 0.5, 0.5),
        Point3::new(1.5, 1.5, 1.5),
    ));

    hull.intersect_with(&other);
    assert!(!hull.is_empty());
    assert!((hull.volume() - 0.125).abs() < 1.0e-3);

    // Intersecting with an empty hull empties this one.
    let mut emptied = other.clone();
    emptied.intersect_with(&ConvexHull::default());
    assert!(emptied.is_empty());
}
