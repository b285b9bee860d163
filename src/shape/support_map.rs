//! Traits for support mapping based shapes.

use crate::math::{Point, Real, Vector};
use na::Unit;

/// Trait of convex shapes representable by a support mapping function.
///
/// A support function associates a direction to the shape point which
/// maximizes their dot product.
pub trait SupportMap {
    /// Evaluates the support function of this shape.
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real>;

    /// Same as `self.local_support_point` except that `dir` is normalized.
    fn local_support_point_toward(&self, dir: &Unit<Vector<Real>>) -> Point<Real> {
        self.local_support_point(dir.as_ref())
    }
}
