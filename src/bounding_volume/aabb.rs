//! Axis Aligned Bounding Box.

use crate::math::{Point, Real, Vector};

/// An Axis-Aligned Bounding Box.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Aabb {
    /// The minimum coordinates of the AABB.
    pub mins: Point<Real>,
    /// The maximum coordinates of the AABB.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new AABB.
    ///
    /// `mins` must be componentwise smaller than `maxs`.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` components set to `Real::MAX` and
    /// `maxs` components set to `-Real::MAX`.
    ///
    /// This is often used as the initial value of some AABB merging
    /// algorithms, and doubles as this crate's "empty" sentinel.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::MAX).into(),
            Vector::repeat(-Real::MAX).into(),
        )
    }

    /// Computes the AABB of a set of points.
    pub fn from_points(points: &[Point<Real>]) -> Self {
        let mut result = Aabb::new_invalid();
        for p in points {
            result.take_point(*p);
        }
        result
    }

    /// Does this AABB hold no point at all?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mins.x > self.maxs.x
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        Point::from((self.mins.coords + self.maxs.coords) * 0.5)
    }

    /// The half extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        (self.maxs - self.mins) * 0.5
    }

    /// The extents of this AABB.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// The volume of this AABB.
    #[inline]
    pub fn volume(&self) -> Real {
        let extents = self.extents();
        extents.x * extents.y * extents.z
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Checks whether this AABB intersects another one.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.mins.x <= other.maxs.x
            && other.mins.x <= self.maxs.x
            && self.mins.y <= other.maxs.y
            && other.mins.y <= self.maxs.y
            && self.mins.z <= other.maxs.z
            && other.mins.z <= self.maxs.z
    }
}
