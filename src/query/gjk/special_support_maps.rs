use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;

/// A support mapping consisting of a single point.
pub struct ConstantPoint(pub Point<Real>);

impl SupportMap for ConstantPoint {
    #[inline]
    fn local_support_point(&self, _: &Vector<Real>) -> Point<Real> {
        self.0
    }
}

/// A view over a point cloud with a per-axis scale applied.
pub struct ScaledPoints<'a> {
    /// The unscaled points.
    pub points: &'a [Point<Real>],
    /// The componentwise scale.
    pub scale: Vector<Real>,
}

impl ScaledPoints<'_> {
    /// The min and max projections of the scaled points onto `dir`.
    pub fn extent(&self, dir: &Vector<Real>) -> (Real, Real) {
        // dir · (scale ∘ p) = (scale ∘ dir) · p
        crate::utils::points_extent(self.points, &dir.component_mul(&self.scale))
    }
}

impl SupportMap for ScaledPoints<'_> {
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let scaled_dir = dir.component_mul(&self.scale);
        let mut best = Point::origin();
        let mut best_dot = -Real::MAX;
        for p in self.points {
            let dot = scaled_dir.dot(&p.coords);
            if dot > best_dot {
                best_dot = dot;
                best = *p;
            }
        }
        Point::from(best.coords.component_mul(&self.scale))
    }
}
