//! Direction sets for discrete-orientation polytopes.

use crate::math::{Real, Vector};
use arrayvec::ArrayVec;

/// The supported k-DOP direction layouts.
///
/// Every layout contains the three coordinate axes; the 10- and 14-DOP
/// variants add edge-diagonal directions around the named axes, the 18-DOP
/// adds all edge diagonals, and the 26-DOP adds the corner diagonals as well.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KdopMethod {
    /// The 3 coordinate axes (an axis-aligned box).
    Dop6,
    /// Axes plus the two diagonals around X.
    Dop10X,
    /// Axes plus the two diagonals around Y.
    Dop10Y,
    /// Axes plus the two diagonals around Z.
    Dop10Z,
    /// Axes plus the diagonals around X and Y.
    Dop14Xy,
    /// Axes plus the diagonals around Y and Z.
    Dop14Yz,
    /// Axes plus the diagonals around Z and X.
    Dop14Zx,
    /// Axes plus all edge diagonals.
    Dop18,
    /// Axes, all edge diagonals, and all corner diagonals.
    Dop26,
}

/// The (unnormalized) direction set of a k-DOP layout.
pub fn kdop_directions(method: KdopMethod) -> ArrayVec<Vector<Real>, 13> {
    let dirs: u32 = match method {
        KdopMethod::Dop6 => 0,
        KdopMethod::Dop10X => 1,
        KdopMethod::Dop10Y => 2,
        KdopMethod::Dop10Z => 4,
        KdopMethod::Dop14Xy => 3,
        KdopMethod::Dop14Yz => 6,
        KdopMethod::Dop14Zx => 5,
        KdopMethod::Dop18 => 7,
        KdopMethod::Dop26 => 15,
    };

    let mut directions = ArrayVec::new();
    directions.push(Vector::new(1.0, 0.0, 0.0));
    directions.push(Vector::new(0.0, 1.0, 0.0));
    directions.push(Vector::new(0.0, 0.0, 1.0));
    if dirs & 1 != 0 {
        directions.push(Vector::new(0.0, 1.0, 1.0));
        directions.push(Vector::new(0.0, -1.0, 1.0));
    }
    if dirs & 2 != 0 {
        directions.push(Vector::new(1.0, 0.0, 1.0));
        directions.push(Vector::new(1.0, 0.0, -1.0));
    }
    if dirs & 4 != 0 {
        directions.push(Vector::new(1.0, 1.0, 0.0));
        directions.push(Vector::new(-1.0, 1.0, 0.0));
    }
    if dirs & 8 != 0 {
        directions.push(Vector::new(1.0, 1.0, 1.0));
        directions.push(Vector::new(-1.0, 1.0, 1.0));
        directions.push(Vector::new(1.0, -1.0, 1.0));
        directions.push(Vector::new(1.0, 1.0, -1.0));
    }

    directions
}
