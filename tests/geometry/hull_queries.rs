use hull3d::bounding_volume::Aabb;
use hull3d::math::Real;
use hull3d::shape::ConvexHull;
use na::{Isometry3, Point3, Vector3};

fn centered_unit_cube() -> ConvexHull {
    ConvexHull::from_aabb(&Aabb::new(
        Point3::new(-0.5, -0.5, -0.5),
        Point3::new(0.5, 0.5, 0.5),
    ))
}

#[test]
fn extent_projects_the_vertices() {
    let hull = centered_unit_cube();

    let (min, max) = hull.extent(&Vector3::x());
    assert_eq!(min, -0.5);
    assert_eq!(max, 0.5);

    let diag = Vector3::new(1.0, 1.0, 1.0);
    let (min, max) = hull.extent(&diag);
    assert!((min + 1.5).abs() < 1.0e-6);
    assert!((max - 1.5).abs() < 1.0e-6);

    // Empty hull: inverted interval.
    let (min, max) = ConvexHull::default().extent(&Vector3::x());
    assert!(min > max);
}

#[test]
fn ray_cast_hits_a_cube_head_on() {
    let hull = centered_unit_cube();

    let mut t_in = 0.0;
    let mut t_out = Real::MAX;
    let mut normal = Vector3::zeros();
    let hit = hull.ray_cast(
        &mut t_in,
        &mut t_out,
        &Point3::new(-5.0, 0.0, 0.0),
        &Vector3::x(),
        &Isometry3::identity(),
        &Vector3::new(1.0, 1.0, 1.0),
        Some(&mut normal),
    );

    assert!(hit);
    assert!((t_in - 4.5).abs() < 1.0e-4);
    assert!((t_out - 5.5).abs() < 1.0e-4);
    assert!((normal - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1.0e-4);
}

#[test]
fn ray_cast_misses_and_respects_the_input_interval() {
    let hull = centered_unit_cube();

    // Miss: offset above the cube.
    let mut t_in = 0.0;
    let mut t_out = Real::MAX;
    assert!(!hull.ray_cast(
        &mut t_in,
        &mut t_out,
        &Point3::new(-5.0, 2.0, 0.0),
        &Vector3::x(),
        &Isometry3::identity(),
        &Vector3::new(1.0, 1.0, 1.0),
        None,
    ));

    // The admissible interval ends before the cube is reached.
    let mut t_in = 0.0;
    let mut t_out = 2.0;
    assert!(!hull.ray_cast(
        &mut t_in,
        &mut t_out,
        &Point3::new(-5.0, 0.0, 0.0),
        &Vector3::x(),
        &Isometry3::identity(),
        &Vector3::new(1.0, 1.0, 1.0),
        None,
    ));
}

#[test]
fn ray_cast_against_a_posed_scaled_hull() {
    let hull = centered_unit_cube();

    // Scale (2, 1, 1) stretches the cube to [-1, 1] along x; translate to
    // x = 10.
    let iso = Isometry3::translation(10.0, 0.0, 0.0);
    let scale = Vector3::new(2.0, 1.0, 1.0);

    let mut t_in = 0.0;
    let mut t_out = Real::MAX;
    let mut normal = Vector3::zeros();
    let hit = hull.ray_cast(
        &mut t_in,
        &mut t_out,
        &Point3::origin(),
        &Vector3::x(),
        &iso,
        &scale,
        Some(&mut normal),
    );

    assert!(hit);
    assert!((t_in - 9.0).abs() < 1.0e-3);
    assert!((t_out - 11.0).abs() < 1.0e-3);
    assert!((normal - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1.0e-3);
}

#[test]
fn ray_cast_from_inside_reports_a_zero_normal() {
    let hull = centered_unit_cube();

    let mut t_in = 0.0;
    let mut t_out = Real::MAX;
    let mut normal = Vector3::new(9.0, 9.0, 9.0);
    let hit = hull.ray_cast(
        &mut t_in,
        &mut t_out,
        &Point3::origin(),
        &Vector3::x(),
        &Isometry3::identity(),
        &Vector3::new(1.0, 1.0, 1.0),
        Some(&mut normal),
    );

    assert!(hit);
    assert_eq!(t_in, 0.0);
    assert!((t_out - 0.5).abs() < 1.0e-4);
    assert_eq!(normal, Vector3::zeros());
}

#[test]
fn obb_sweep_reports_entry_time_and_normal() {
    let hull = centered_unit_cube();

    let mut t_in = 0.0;
    let mut t_out = 1.0;
    let mut normal = Vector3::zeros();
    let hit = hull.obb_sweep(
        &mut t_in,
        &mut t_out,
        &Point3::new(5.0, 0.0, 0.0),
        &Vector3::new(0.5, 0.5, 0.5),
        &[Vector3::x(), Vector3::y(), Vector3::z()],
        &Vector3::new(-10.0, 0.0, 0.0),
        &Isometry3::identity(),
        &Vector3::new(1.0, 1.0, 1.0),
        Some(&mut normal),
    );

    assert!(hit);
    assert!((t_in - 0.4).abs() < 1.0e-4);
    assert!((t_out - 0.6).abs() < 1.0e-4);
    assert!((normal - Vector3::new(1.0, 0.0, 0.0)).norm() < 1.0e-4);
}

#[test]
fn obb_sweep_misses_a_passing_box() {
    let hull = centered_unit_cube();

    let mut t_in = 0.0;
    let mut t_out = 1.0;
    let hit = hull.obb_sweep(
        &mut t_in,
        &mut t_out,
        &Point3::new(5.0, 3.0, 0.0),
        &Vector3::new(0.5, 0.5, 0.5),
        &[Vector3::x(), Vector3::y(), Vector3::z()],
        &Vector3::new(-10.0, 0.0, 0.0),
        &Isometry3::identity(),
        &Vector3::new(1.0, 1.0, 1.0),
        None,
    );

    assert!(!hit);
}

#[test]
fn obb_sweep_with_a_rotated_box() {
    let hull = centered_unit_cube();

    // The box is rotated 45 degrees around z; its corner leads the sweep.
    let s = (0.5 as Real).sqrt();
    let axes = [
        Vector3::new(s, s, 0.0),
        Vector3::new(-s, s, 0.0),
        Vector3::z(),
    ];

    let mut t_in = 0.0;
    let mut t_out = 1.0;
    let hit = hull.obb_sweep(
        &mut t_in,
        &mut t_out,
        &Point3::new(3.0, 0.0, 0.0),
        &Vector3::new(0.5, 0.5, 0.5),
        &axes,
        &Vector3::new(-10.0, 0.0, 0.0),
        &Isometry3::identity(),
        &Vector3::new(1.0, 1.0, 1.0),
        None,
    );

    assert!(hit);
    // Leading corner at distance 3 - sqrt(0.5)/... the corner extends
    // sqrt(2) * 0.5 along x, so contact occurs at (3 - 0.7071 - 0.5) / 10.
    let expected = (3.0 - 2.0 * s * 0.5 - 0.5) / 10.0;
    assert!((t_in - expected).abs() < 1.0e-3);
}

#[test]
fn fill_samples_stay_inside_the_hull() {
    let hull = centered_unit_cube();
    let iso = Isometry3::translation(2.0, 0.0, 0.0);
    let scale = Vector3::new(1.0, 1.0, 1.0);

    let points = hull.fill_with_sample_points(&iso, &scale, 0.2, 0.0, 10_000, false);
    assert!(points.len() > 50);

    for p in &points {
        let local = iso.inverse_transform_point(p);
        assert!(local.x.abs() <= 0.5 + 1.0e-3);
        assert!(local.y.abs() <= 0.5 + 1.0e-3);
        assert!(local.z.abs() <= 0.5 + 1.0e-3);
    }
}

#[test]
fn fill_honors_the_point_budget() {
    let hull = centered_unit_cube();
    let points = hull.fill_with_sample_points(
        &Isometry3::identity(),
        &Vector3::new(1.0, 1.0, 1.0),
        0.05,
        0.0,
        100,
        false,
    );
    assert_eq!(points.len(), 100);

    let none = hull.fill_with_sample_points(
        &Isometry3::identity(),
        &Vector3::new(1.0, 1.0, 1.0),
        0.05,
        0.0,
        0,
        false,
    );
    assert!(none.is_empty());
}
