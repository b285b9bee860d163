//! Quaternion-based Jacobi diagonalization of 3×3 symmetric matrices.

use crate::math::{Matrix, Real, Vector};
use na::Quaternion;

const MAX_ITERS: usize = 24;

/// Diagonalizes a symmetric 3×3 matrix.
///
/// Returns the eigenvalues as a vector and the eigenvectors as the columns of
/// a rotation matrix. The rotation is accumulated as a unit quaternion over a
/// bounded number of cyclic Jacobi sweeps; the iteration exits early once the
/// dominant off-diagonal term is negligible relative to the diagonal gap.
pub fn symmetric_eigen3(m: &Matrix<Real>) -> (Vector<Real>, Matrix<Real>) {
    let mut q = Quaternion::identity();
    let mut eigenvectors = Matrix::identity();
    let mut d = *m;

    for _ in 0..MAX_ITERS {
        eigenvectors = na::UnitQuaternion::from_quaternion(q)
            .to_rotation_matrix()
            .into_inner();
        d = eigenvectors.transpose() * m * eigenvectors;

        // Rotation axis index, from the largest off-diagonal element.
        let d0 = d[(1, 2)].abs();
        let d1 = d[(0, 2)].abs();
        let d2 = d[(0, 1)].abs();
        let a = if d0 > d1 && d0 > d2 {
            0
        } else if d1 > d2 {
            1
        } else {
            2
        };

        let a1 = (a + 1) % 3;
        let a2 = (a + 2) % 3;
        if d[(a1, a2)] == 0.0
            || (d[(a1, a1)] - d[(a2, a2)]).abs() > 2.0e6 * (2.0 * d[(a1, a2)]).abs()
        {
            break;
        }

        // cot(2φ), where φ is the rotation angle.
        let w = (d[(a1, a1)] - d[(a2, a2)]) / (2.0 * d[(a1, a2)]);
        let absw = w.abs();

        let (c, s) = if absw > 1000.0 {
            // cos(φ) will be very close to 1, use the small-angle approximation.
            (1.0, 1.0 / (4.0 * w))
        } else {
            let t = 1.0 / (absw + (w * w + 1.0).sqrt());
            let h = 1.0 / (t * t + 1.0).sqrt();
            (
                ((1.0 + h) / 2.0).sqrt(),
                ((1.0 - h) / 2.0).sqrt() * w.signum(),
            )
        };

        let mut axis = Vector::zeros();
        axis[a] = s;
        let r = Quaternion::from_parts(c, axis);

        q = (q * r).normalize();
    }

    (Vector::new(d[(0, 0)], d[(1, 1)], d[(2, 2)]), eigenvectors)
}
