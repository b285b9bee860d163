use std::cmp::PartialOrd;

/// A pair of elements sorted in increasing order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortedPair<T: PartialOrd>([T; 2]);

impl<T: PartialOrd> SortedPair<T> {
    /// Sorts two elements in increasing order into a new pair.
    pub fn new(element1: T, element2: T) -> Self {
        if element1 > element2 {
            SortedPair([element2, element1])
        } else {
            SortedPair([element1, element2])
        }
    }

    /// The smaller element of the pair.
    pub fn min(&self) -> &T {
        &self.0[0]
    }

    /// The larger element of the pair.
    pub fn max(&self) -> &T {
        &self.0[1]
    }

    /// The pair as a sorted array.
    pub fn as_array(&self) -> &[T; 2] {
        &self.0
    }
}
