//! Plane-equation transforms through the cofactor matrix.

use crate::math::{Isometry, Matrix, Real, Vector};
use crate::shape::Plane;

/// The linear map that transforms plane equations under an invertible affine
/// transform, built without computing a matrix inverse.
///
/// For an affine map `x ↦ L·x + t`, a plane `(n, d)` (with `n·x + d = 0`)
/// maps to `(C·n, t_c·n + det·d)` up to a positive scale factor, where `C`
/// is the cofactor matrix of `L`, `t_c = -adj(L)·t`, and `det` is the
/// determinant of the homogeneous 4×4 matrix. The result is exact for any
/// invertible affine transform, including anisotropic scale.
#[derive(Clone, Copy, Debug)]
pub struct CofactorTransform {
    block: Matrix<Real>,
    translation_cofactor: Vector<Real>,
    det: Real,
}

impl CofactorTransform {
    /// Builds the cofactor transform of the affine map `x ↦ linear·x + translation`.
    pub fn new(linear: &Matrix<Real>, translation: &Vector<Real>) -> Self {
        let c0: Vector<Real> = linear.column(0).into_owned();
        let c1: Vector<Real> = linear.column(1).into_owned();
        let c2: Vector<Real> = linear.column(2).into_owned();

        let block = Matrix::from_columns(&[c1.cross(&c2), c2.cross(&c0), c0.cross(&c1)]);
        let det = c0.dot(&c1.cross(&c2));
        // adj(L) = cof(L)ᵀ
        let translation_cofactor = -(block.transpose() * translation);

        CofactorTransform {
            block,
            translation_cofactor,
            det,
        }
    }

    /// Fast path for a linear part of the form `rotation · diag(scale)`.
    pub fn from_isometry_scale(iso: &Isometry<Real>, scale: &Vector<Real>) -> Self {
        let rot = iso.rotation.to_rotation_matrix().into_inner();
        let cof_scale = Vector::new(
            scale.y * scale.z,
            scale.z * scale.x,
            scale.x * scale.y,
        );

        let block = rot * Matrix::from_diagonal(&cof_scale);
        let det = scale.x * scale.y * scale.z;
        let translation_cofactor =
            -cof_scale.component_mul(&(rot.transpose() * iso.translation.vector));

        CofactorTransform {
            block,
            translation_cofactor,
            det,
        }
    }

    /// Flips the map to its positive-determinant equivalent.
    ///
    /// Transformed planes keep their outward-facing convention under a
    /// mirroring transform. This negates the cofactor block, the translation
    /// cofactor, and the determinant whenever the determinant is negative;
    /// the resulting plane equation describes the same plane with outward
    /// orientation.
    pub fn normalize_sign(&mut self) {
        if self.det < 0.0 {
            self.block = -self.block;
            self.translation_cofactor = -self.translation_cofactor;
            self.det = -self.det;
        }
    }

    /// Transforms a plane equation. The returned normal is not renormalized.
    pub fn transform_plane(&self, plane: &Plane) -> Plane {
        Plane::new(
            self.block * plane.normal,
            self.translation_cofactor.dot(&plane.normal) + self.det * plane.d,
        )
    }

    /// The 3×3 cofactor block, the correct map for free normals.
    pub fn block(&self) -> &Matrix<Real> {
        &self.block
    }

    /// The determinant of the homogeneous 4×4 matrix (sign-flipped by
    /// [`Self::normalize_sign`] if it was negative).
    pub fn determinant(&self) -> Real {
        self.det
    }
}
