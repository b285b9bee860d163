//! Simplex reduction with a tessellation fallback for ill-conditioned
//! features.
//!
//! The working simplex is held as parallel arrays: the Minkowski-difference
//! points `q`, and the contributing points `a` and `b` of each shape. Every
//! reduction routine returns the point of the current feature closest to the
//! origin and writes the corresponding per-shape closest points.

use crate::math::{Point, Real, Vector, DEFAULT_EPSILON};

/// Squared length past which a segment feature is recursively bisected
/// toward the origin before its closest point is trusted.
///
/// Empirical constant carried over from the reference implementation; no
/// derivation is known.
pub const SEGMENT_LENGTH_LIMIT_SQ: Real = 1.0e4;

/// Edge-length ratio past which a triangle feature is considered
/// ill-conditioned and split at its longest edge.
///
/// Empirical constant carried over from the reference implementation; no
/// derivation is known.
pub const TRI_EDGE_RATIO_LIMIT: Real = 4.0;

/// Triangle area past which a triangle feature is split at its longest edge.
///
/// Empirical constant carried over from the reference implementation; no
/// derivation is known.
pub const TRI_AREA_LIMIT: Real = 100.0;

/// Projects the origin onto the segment `[a, b]`, clamped to the endpoints.
fn closest_on_segment(a: &Vector<Real>, b: &Vector<Real>) -> Vector<Real> {
    let ab = b - a;
    let denom = ab.dot(&ab);
    if denom == 0.0 {
        return *a;
    }
    let t = ((-a).dot(&ab) / denom).clamp(0.0, 1.0);
    a + ab * t
}

fn closest_on_segment_pair(
    q0: Vector<Real>,
    q1: Vector<Real>,
    a0: Point<Real>,
    a1: Point<Real>,
    b0: Point<Real>,
    b1: Point<Real>,
    size: &mut usize,
    closest_a: &mut Point<Real>,
    closest_b: &mut Point<Real>,
) -> Vector<Real> {
    let ab = q1 - q0;
    let denom = ab.dot(&ab);
    let nom = (-q0).dot(&ab);

    if denom == 0.0 {
        *size = 1;
        *closest_a = a0;
        *closest_b = b0;
        return q0;
    }

    let v = a1 - a0;
    let w = b1 - b0;
    let t = (nom / denom).clamp(0.0, 1.0);

    let ca = a0 + v * t;
    let cb = b0 + w * t;
    *closest_a = ca;
    *closest_b = cb;
    ca - cb
}

fn closest_on_segment_tessellation(
    mut q0: Vector<Real>,
    mut q1: Vector<Real>,
    mut a0: Point<Real>,
    mut a1: Point<Real>,
    mut b0: Point<Real>,
    mut b1: Point<Real>,
    size: &mut usize,
    closest_a: &mut Point<Real>,
    closest_b: &mut Point<Real>,
) -> Vector<Real> {
    loop {
        let mid = (q0 + q1) * 0.5;
        let mid_a = na::center(&a0, &a1);
        let mid_b = na::center(&b0, &b1);

        let half = mid - q0;
        if SEGMENT_LENGTH_LIMIT_SQ > half.dot(&half) {
            break;
        }

        // Keep the segment half closer to the origin.
        let clos0 = closest_on_segment(&q0, &mid);
        let clos1 = closest_on_segment(&q1, &mid);
        if clos0.dot(&clos0) > clos1.dot(&clos1) {
            q0 = mid;
            a0 = mid_a;
            b0 = mid_b;
        } else {
            q1 = mid;
            a1 = mid_a;
            b1 = mid_b;
        }
    }

    closest_on_segment_pair(q0, q1, a0, a1, b0, b1, size, closest_a, closest_b)
}

fn closest_on_triangle_tessellation(
    q: &[Vector<Real>; 4],
    a: &[Point<Real>; 4],
    b: &[Point<Real>; 4],
    indices: &[usize; 3],
    size: &mut usize,
    closest_a: &mut Point<Real>,
    closest_b: &mut Point<Real>,
) -> Vector<Real> {
    *size = 3;
    let eps = DEFAULT_EPSILON;

    let ind0 = indices[0];
    let ind1 = indices[1];
    let ind2 = indices[2];

    let qa = q[ind0];
    let qb = q[ind1];
    let qc = q[ind2];

    let ab = qb - qa;
    let ac = qc - qa;
    let bc = qb - qc;

    if eps >= ac.dot(&ac).min(bc.dot(&bc)) {
        // Degenerate triangle, fall back to the segment case.
        *size = 2;
        return closest_on_segment_pair(
            q[ind0], q[ind1], a[ind0], a[ind1], b[ind0], b[ind1], size, closest_a, closest_b,
        );
    }

    let ap = -qa;
    let bp = -qb;
    let cp = -qc;

    let d1 = ab.dot(&ap); //  snom
    let d2 = ac.dot(&ap); //  tnom
    let d3 = ab.dot(&bp); // -sdenom
    let d4 = ac.dot(&bp); //  unom = d4 - d3
    let d5 = ab.dot(&cp); //  udenom = d5 - d6
    let d6 = ac.dot(&cp); // -tdenom

    let va = d3 * d6 - d5 * d4; // edge region of BC
    let vb = d5 * d2 - d1 * d6; // edge region of AC
    let vc = d1 * d4 - d3 * d2; // edge region of AB

    // Vertex region outside a.
    if d1 <= 0.0 && d2 <= 0.0 {
        *closest_a = a[ind0];
        *closest_b = b[ind0];
        return q[ind0];
    }

    // Vertex region outside b.
    if d3 >= 0.0 && d3 >= d4 {
        *closest_a = a[ind1];
        *closest_b = b[ind1];
        return q[ind1];
    }

    // Vertex region outside c.
    if d6 >= 0.0 && d6 >= d5 {
        *closest_a = a[ind2];
        *closest_b = b[ind2];
        return q[ind2];
    }

    // Edge region of AB: split AB.
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return closest_on_segment_tessellation(
            q[ind0], q[ind1], a[ind0], a[ind1], b[ind0], b[ind1], size, closest_a, closest_b,
        );
    }

    // Edge region of BC: split BC.
    if va <= 0.0 && d4 >= d3 && d5 >= d6 {
        return closest_on_segment_tessellation(
            q[ind1], q[ind2], a[ind1], a[ind2], b[ind1], b[ind2], size, closest_a, closest_b,
        );
    }

    // Edge region of AC: split AC.
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return closest_on_segment_tessellation(
            q[ind0], q[ind2], a[ind0], a[ind2], b[ind0], b[ind2], size, closest_a, closest_b,
        );
    }

    *size = 3;

    let mut q0 = q[ind0];
    let mut q1 = q[ind1];
    let mut q2 = q[ind2];
    let mut a0 = a[ind0];
    let mut a1 = a[ind1];
    let mut a2 = a[ind2];
    let mut b0 = b[ind0];
    let mut b1 = b[ind1];
    let mut b2 = b[ind2];

    loop {
        let ab = q1 - q0;
        let ac = q2 - q0;
        let bc = q2 - q1;

        let dab = ab.dot(&ab);
        let dac = ac.dot(&ac);
        let dbc = bc.dot(&bc);

        let f_max = dab.max(dac).max(dbc);
        let f_min = dab.min(dac).min(dbc);

        let w = ab.cross(&ac);
        let area = w.norm();
        let ratio = f_max.sqrt() / f_min.sqrt();
        if TRI_EDGE_RATIO_LIMIT > ratio && TRI_AREA_LIMIT > area {
            break;
        }

        let tri_normal = w.normalize();

        // Split the longest edge, keep the sub-triangle on the origin side.
        if dab >= dac && dab >= dbc {
            // Split edge q0q1.
            let mid = (q0 + q1) * 0.5;
            let mid_a = na::center(&a0, &a1);
            let mid_b = na::center(&b0, &b1);

            let v = mid - q2;
            let n = v.cross(&tri_normal).normalize();

            let d = -n.dot(&mid);
            let dp = n.dot(&q0) + d;

            if d * dp > 0.0 {
                // q0 and the origin on the same side, keep [q0, m, q2].
                q1 = mid;
                a1 = mid_a;
                b1 = mid_b;
            } else {
                // q1 and the origin on the same side, keep [m, q1, q2].
                q0 = mid;
                a0 = mid_a;
                b0 = mid_b;
            }
        } else if dac >= dbc {
            // Split edge q0q2.
            let mid = (q0 + q2) * 0.5;
            let mid_a = na::center(&a0, &a2);
            let mid_b = na::center(&b0, &b2);

            let v = mid - q1;
            let n = v.cross(&tri_normal).normalize();

            let d = -n.dot(&mid);
            let dp = n.dot(&q0) + d;

            if d * dp > 0.0 {
                q2 = mid;
                a2 = mid_a;
                b2 = mid_b;
            } else {
                q0 = mid;
                a0 = mid_a;
                b0 = mid_b;
            }
        } else {
            // Split edge q1q2.
            let mid = (q1 + q2) * 0.5;
            let mid_a = na::center(&a1, &a2);
            let mid_b = na::center(&b1, &b2);

            let v = mid - q0;
            let n = v.cross(&tri_normal).normalize();

            let d = -n.dot(&mid);
            let dp = n.dot(&q1) + d;

            if d * dp > 0.0 {
                q2 = mid;
                a2 = mid_a;
                b2 = mid_b;
            } else {
                q1 = mid;
                a1 = mid_a;
                b1 = mid_b;
            }
        }
    }

    // The origin projects inside the face region: compute the closest points
    // from the barycentric coordinates of the final sub-triangle.
    let ab = q1 - q0;
    let ac = q2 - q0;
    let ap = -q0;
    let bp = -q1;
    let cp = -q2;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);

    let va = d3 * d6 - d5 * d4;
    let vb = d5 * d2 - d1 * d6;
    let vc = d1 * d4 - d3 * d2;

    let denom = 1.0 / (va + vb + vc);
    let v0 = a1 - a0;
    let v1 = a2 - a0;
    let w0 = b1 - b0;
    let w1 = b2 - b0;

    let t = vb * denom;
    let w = vc * denom;
    let ca = a0 + v0 * t + v1 * w;
    let cb = b0 + w0 * t + w1 * w;
    *closest_a = ca;
    *closest_b = cb;
    ca - cb
}

/// Per-face outside tests of the origin against a tetrahedron.
///
/// The threshold is a small negative value rather than zero: when all four
/// points lie on a plane through the origin, roundoff may otherwise flip
/// individual signs and produce inconsistent results.
fn point_outside_of_plane4(
    a: &Vector<Real>,
    b: &Vector<Real>,
    c: &Vector<Real>,
    d: &Vector<Real>,
) -> [bool; 4] {
    let threshold = -1.0e-6;

    let ab = b - a;
    let ac = c - a;
    let ad = d - a;
    let bd = d - b;
    let bc = c - b;

    let v0 = ab.cross(&ac);
    let v1 = ac.cross(&ad);
    let v2 = ad.cross(&ab);
    let v3 = bd.cross(&bc);

    let sign_a = [v0.dot(a), v1.dot(a), v2.dot(a), v3.dot(b)];
    let sign_d = [v0.dot(d), v1.dot(b), v2.dot(c), v3.dot(a)];

    // Same side means the origin is outside of the face plane.
    [
        sign_a[0] * sign_d[0] >= threshold,
        sign_a[1] * sign_d[1] >= threshold,
        sign_a[2] * sign_d[2] >= threshold,
        sign_a[3] * sign_d[3] >= threshold,
    ]
}

fn closest_on_tetrahedron_tessellation(
    q: &mut [Vector<Real>; 4],
    a: &mut [Point<Real>; 4],
    b: &mut [Point<Real>; 4],
    size: &mut usize,
    closest_a: &mut Point<Real>,
    closest_b: &mut Point<Real>,
) -> Vector<Real> {
    let eps = DEFAULT_EPSILON;

    // Degenerate tetrahedron, fall back to the base triangle.
    let ad = q[3] - q[0];
    let bd = q[3] - q[1];
    let cd = q[3] - q[2];
    let min_apex_dist = ad
        .dot(&ad)
        .min(bd.dot(&bd))
        .min(cd.dot(&cd));
    if eps > min_apex_dist {
        *size = 3;
        return closest_on_triangle_tessellation(
            &*q,
            &*a,
            &*b,
            &[0, 1, 2],
            size,
            closest_a,
            closest_b,
        );
    }

    let is_outside = point_outside_of_plane4(&q[0], &q[1], &q[2], &q[3]);
    if !is_outside.iter().any(|outside| *outside) {
        // The origin is inside the tetrahedron.
        return Vector::zeros();
    }

    let q_copy = *q;
    let a_copy = *a;
    let b_copy = *b;

    let faces: [[usize; 3]; 4] = [[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];
    let mut best_sq = Real::MAX;
    let mut result = Vector::zeros();
    let mut indices = [0usize, 1, 2];
    let mut temp_size = *size;

    for (face_index, face) in faces.iter().enumerate() {
        if !is_outside[face_index] {
            continue;
        }

        let mut face_size = 3;
        let mut face_closest_a = Point::origin();
        let mut face_closest_b = Point::origin();
        let proj = closest_on_triangle_tessellation(
            &q_copy,
            &a_copy,
            &b_copy,
            face,
            &mut face_size,
            &mut face_closest_a,
            &mut face_closest_b,
        );

        let sq_dist = proj.dot(&proj);
        if sq_dist < best_sq {
            best_sq = sq_dist;
            result = proj;
            indices = *face;
            temp_size = face_size;
            *closest_a = face_closest_a;
            *closest_b = face_closest_b;
        }
    }

    for i in 0..3 {
        q[i] = q_copy[indices[i]];
        a[i] = a_copy[indices[i]];
        b[i] = b_copy[indices[i]];
    }

    *size = temp_size;
    result
}

/// Reduces the simplex after the insertion of a new support point and
/// returns the point of the reduced feature closest to the origin.
pub(crate) fn reduce_simplex(
    q: &mut [Vector<Real>; 4],
    a: &mut [Point<Real>; 4],
    b: &mut [Point<Real>; 4],
    support: Vector<Real>,
    support_a: Point<Real>,
    support_b: Point<Real>,
    size: &mut usize,
    closest_a: &mut Point<Real>,
    closest_b: &mut Point<Real>,
) -> Vector<Real> {
    match *size {
        1 => {
            *closest_a = support_a;
            *closest_b = support_b;
            support
        }
        2 => closest_on_segment_tessellation(
            q[0], support, a[0], support_a, b[0], support_b, size, closest_a, closest_b,
        ),
        3 => closest_on_triangle_tessellation(
            &*q,
            &*a,
            &*b,
            &[0, 1, 2],
            size,
            closest_a,
            closest_b,
        ),
        _ => closest_on_tetrahedron_tessellation(q, a, b, size, closest_a, closest_b),
    }
}
