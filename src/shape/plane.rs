use crate::math::{Point, Real, Vector};

/// A plane with a unit outward normal and a signed offset.
///
/// A point `p` lies on the plane when `normal·p + d == 0`, on the outside
/// (positive side) when the expression is positive.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Plane {
    /// The plane's outward normal.
    pub normal: Vector<Real>,
    /// The plane's signed offset along its normal.
    pub d: Real,
}

impl Plane {
    /// Builds a new plane from its outward normal and signed offset.
    #[inline]
    pub fn new(normal: Vector<Real>, d: Real) -> Plane {
        Plane { normal, d }
    }

    /// Builds the plane containing `point` with the outward normal `normal`.
    #[inline]
    pub fn from_point_normal(point: &Point<Real>, normal: Vector<Real>) -> Plane {
        let d = -normal.dot(&point.coords);
        Plane { normal, d }
    }

    /// The signed distance between `point` and this plane (positive outside).
    #[inline]
    pub fn distance(&self, point: &Point<Real>) -> Real {
        self.normal.dot(&point.coords) + self.d
    }

    /// This plane with its orientation reversed.
    #[inline]
    pub fn flipped(&self) -> Plane {
        Plane {
            normal: -self.normal,
            d: -self.d,
        }
    }
}

/// The intersection point of three planes.
///
/// Returns `None` when the plane normals are linearly dependent, i.e. the
/// triple-product determinant vanishes (`|det| < 1e-18`).
pub fn intersect_planes(p0: &Plane, p1: &Plane, p2: &Plane) -> Option<Point<Real>> {
    let p1xp2 = p1.normal.cross(&p2.normal);
    let det = p0.normal.dot(&p1xp2);
    if det.abs() < 1.0e-18 {
        return None;
    }

    let point = (-p0.d * p1xp2
        - p1.d * p2.normal.cross(&p0.normal)
        - p2.d * p0.normal.cross(&p1.normal))
        / det;
    Some(Point::from(point))
}

/// Is `point` within `eps` of the non-positive side of every plane?
pub fn point_inside_planes(point: &Point<Real>, planes: &[Plane], eps: Real) -> bool {
    planes.iter().all(|plane| plane.distance(point) <= eps)
}
