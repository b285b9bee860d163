//! Various unsorted geometrical and logical operators.

pub use self::eigen::symmetric_eigen3;
pub use self::extents::points_extent;
pub use self::interval::{extent_distance, extent_overlap_time_interval};
pub use self::sorted_pair::SortedPair;

mod eigen;
mod extents;
mod interval;
mod sorted_pair;

use crate::math::{Matrix, Point, Real};

/// Computes the center and the covariance matrix of a set of points.
pub fn center_cov(pts: &[Point<Real>]) -> (Point<Real>, Matrix<Real>) {
    let mut center = Point::origin();
    let mut cov: Matrix<Real> = na::zero();

    if pts.is_empty() {
        return (center, cov);
    }

    let normalizer = 1.0 / pts.len() as Real;

    for p in pts {
        center += p.coords * normalizer;
    }

    for p in pts {
        let cp = *p - center;
        cov += cp * (cp * normalizer).transpose();
    }

    (center, cov)
}
