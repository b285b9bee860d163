use crate::math::{Isometry, Point, Real, Vector, DEFAULT_EPSILON};
use crate::query::gjk::simplex;
use crate::query::gjk::ConstantPoint;
use crate::shape::SupportMap;
use num_traits::Bounded;

/// Squared-distance threshold under which the origin is considered enclosed
/// by the Minkowski difference.
pub const EPS_ABS_SQ: Real = 1.0e-6;

/// Relative tolerance of the standard GJK termination test: iteration stops
/// once a new support point no longer improves the separation estimate by
/// more than this fraction.
pub const EPS_REL: Real = 2.25e-4;

/// Outcome of a GJK run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GjkStatus {
    /// The shapes do not overlap; the squared distance in the output is
    /// resolved.
    NonIntersecting,
    /// The origin is enclosed by (or within tolerance of) the Minkowski
    /// difference.
    Contact,
    /// The iteration failed to converge cleanly; the caller should fall back
    /// to a shape-derived tolerance on the reported squared distance.
    Degenerate,
}

/// Closest-point information produced by a GJK run.
#[derive(Copy, Clone, Debug)]
pub struct GjkOutput {
    /// The closest point on the first shape, in the first shape's space.
    pub closest_a: Point<Real>,
    /// The closest point on the second shape, in the first shape's space.
    pub closest_b: Point<Real>,
    /// The squared distance between the closest points.
    pub dist_sq: Real,
}

impl Default for GjkOutput {
    fn default() -> Self {
        GjkOutput {
            closest_a: Point::origin(),
            closest_b: Point::origin(),
            dist_sq: 0.0,
        }
    }
}

impl GjkOutput {
    /// The unit direction to push the shapes apart, from A to B; zero when
    /// the closest points coincide.
    pub fn normal(&self) -> Vector<Real> {
        let dir = self.closest_b - self.closest_a;
        if dir.amax() >= DEFAULT_EPSILON {
            dir.normalize()
        } else {
            Vector::zeros()
        }
    }
}

/// Runs GJK between two support-mapped shapes.
///
/// `pos12` is the pose of the second shape relative to the first; all outputs
/// are expressed in the first shape's space. `initial_dir` seeds the search
/// direction (the vector between the shapes' origins is a good guess); a
/// near-zero seed falls back to the x axis.
///
/// The simplex is bounded to four points. Each iteration queries both
/// support mappings along the negated search direction, applies the relative
/// termination test ([`EPS_REL`]), reduces the simplex to the feature closest
/// to the origin (tessellating ill-conditioned features), and stops once the
/// squared distance reaches [`EPS_ABS_SQ`] or stops decreasing.
pub fn closest_points<G1, G2>(
    initial_dir: &Vector<Real>,
    g1: &G1,
    pos12: &Isometry<Real>,
    g2: &G2,
    out: &mut GjkOutput,
) -> GjkStatus
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let mut q = [Vector::zeros(); 4];
    let mut a = [Point::origin(); 4];
    let mut b = [Point::origin(); 4];
    let mut size = 0usize;

    let mut v = if initial_dir.norm_squared() > 0.0 {
        *initial_dir
    } else {
        Vector::x()
    };

    let mut closest_a = Point::origin();
    let mut closest_b = Point::origin();
    let mut s_dist: Real = Real::max_value();
    let mut min_dist;
    let mut prev_closest_a;
    let mut prev_closest_b;
    let converging;

    loop {
        min_dist = s_dist;
        prev_closest_a = closest_a;
        prev_closest_b = closest_b;

        let index = size;
        size += 1;

        let support_a = g1.local_support_point(&-v);
        let support_b =
            pos12.transform_point(&g2.local_support_point(&pos12.inverse_transform_vector(&v)));
        let support = support_a - support_b;

        a[index] = support_a;
        b[index] = support_b;
        q[index] = support;

        let sign_dist = v.dot(&support);
        if EPS_REL * s_dist > s_dist - sign_dist {
            out.closest_a = closest_a;
            out.closest_b = closest_b;
            out.dist_sq = s_dist;
            return GjkStatus::NonIntersecting;
        }

        v = simplex::reduce_simplex(
            &mut q,
            &mut a,
            &mut b,
            support,
            support_a,
            support_b,
            &mut size,
            &mut closest_a,
            &mut closest_b,
        );
        s_dist = v.norm_squared();

        if !(s_dist > EPS_ABS_SQ && min_dist > s_dist) {
            converging = min_dist > s_dist;
            break;
        }
    }

    if converging {
        out.closest_a = closest_a;
        out.closest_b = closest_b;
        out.dist_sq = s_dist;
        GjkStatus::Contact
    } else {
        out.closest_a = prev_closest_a;
        out.closest_b = prev_closest_b;
        out.dist_sq = min_dist;
        GjkStatus::Degenerate
    }
}

/// Runs GJK between a support-mapped shape and a single point expressed in
/// the shape's space.
pub fn closest_point_to_point<G: ?Sized + SupportMap>(
    g1: &G,
    point: &Point<Real>,
    out: &mut GjkOutput,
) -> GjkStatus {
    closest_points(
        &Vector::x(),
        g1,
        &Isometry::identity(),
        &ConstantPoint(*point),
        out,
    )
}
