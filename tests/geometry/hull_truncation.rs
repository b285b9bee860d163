use hull3d::bounding_volume::Aabb;
use hull3d::shape::{ConvexHull, Plane};
use na::{Point3, Vector3};

fn unit_cube() -> ConvexHull {
    ConvexHull::from_aabb(&Aabb::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0)))
}

#[test]
fn truncating_half_a_cube_halves_the_volume() {
    let mut hull = unit_cube();
    hull.truncate(&Plane::new(Vector3::x(), -0.5));

    assert!(!hull.is_empty());
    assert_eq!(hull.vertices().len(), 8);
    assert!((hull.volume() - 0.5).abs() < 1.0e-3);

    // Nothing survives past the cutting plane.
    for v in hull.vertices() {
        assert!(v.x <= 0.5 + 1.0e-4);
    }
}

#[test]
fn plane_outside_the_hull_is_a_noop() {
    let mut hull = unit_cube();
    let volume = hull.volume();
    let vertex_count = hull.vertices().len();

    // The whole hull is on the keep side.
    hull.truncate(&Plane::new(Vector3::x(), -2.0));

    assert_eq!(hull.vertices().len(), vertex_count);
    assert_eq!(hull.volume(), volume);
}

#[test]
fn plane_covering_the_hull_empties_it() {
    let mut hull = unit_cube();
    hull.truncate(&Plane::new(Vector3::x(), 1.0));

    assert!(hull.is_empty());
    assert_eq!(hull.volume(), 0.0);
    assert!(hull.vertices().is_empty());
    assert!(hull.edges().is_empty());
}

#[test]
fn truncating_an_empty_hull_stays_empty() {
    let mut hull = ConvexHull::default();
    hull.truncate(&Plane::new(Vector3::x(), 0.0));
    assert!(hull.is_empty());
}

#[test]
fn oblique_truncation_keeps_the_hull_consistent() {
    let mut hull = unit_cube();
    let normal = Vector3::new(1.0, 1.0, 1.0).normalize();
    // Cut off the corner at (1, 1, 1).
    hull.truncate(&Plane::from_point_normal(
        &Point3::new(0.75, 0.75, 0.75),
        normal,
    ));

    assert!(!hull.is_empty());
    assert!(hull.volume() < 1.0);
    assert!(hull.volume() > 0.9);

    let vertices = hull.vertices().to_vec();
    for v in &vertices {
        for i in 0..hull.plane_count() {
            assert!(hull.plane(i).distance(v) <= 1.0e-3);
        }
    }
}
