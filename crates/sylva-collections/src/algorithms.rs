//! Named queries over an [`IntervalTree`].
//!
//! Three tests decide whether a stored value `v` matches a query span `q`:
//!
//! | test       | matches when                                 | touching spans |
//! |------------|----------------------------------------------|----------------|
//! | overlaps   | `max(v.start, q.start) < min(v.end, q.end)`  | no             |
//! | intersects | `q.start <= v.end && q.end >= v.start`       | yes            |
//! | contains   | `v.start <= q.start && q.end <= v.end`       | yes            |

use crate::interval_tree::IntervalTree;
use crate::introspector::IntervalIntrospector;
use sylva_common::TextSpan;

/// Whether `value` shares at least one offset with `[start, start + length)`.
pub fn overlaps_with<T, I: IntervalIntrospector<T>>(
    value: &T,
    start: u32,
    length: u32,
    introspector: &I,
) -> bool {
    introspector
        .span(value)
        .overlaps_with(TextSpan::new(start, length))
}

/// Whether `value` overlaps or touches `[start, start + length)`.
pub fn intersects_with<T, I: IntervalIntrospector<T>>(
    value: &T,
    start: u32,
    length: u32,
    introspector: &I,
) -> bool {
    introspector
        .span(value)
        .intersects_with(TextSpan::new(start, length))
}

/// Whether `value` covers all of `[start, start + length)`.
pub fn contains<T, I: IntervalIntrospector<T>>(
    value: &T,
    start: u32,
    length: u32,
    introspector: &I,
) -> bool {
    introspector
        .span(value)
        .contains(TextSpan::new(start, length))
}

/// A tree paired with the introspector its values were inserted with.
pub struct IntervalTreeAlgorithms<'a, T, I> {
    tree: &'a IntervalTree<T>,
    introspector: &'a I,
}

impl<T, I> Clone for IntervalTreeAlgorithms<'_, T, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, I> Copy for IntervalTreeAlgorithms<'_, T, I> {}

impl<T> IntervalTree<T> {
    pub fn algorithms<'a, I: IntervalIntrospector<T>>(
        &'a self,
        introspector: &'a I,
    ) -> IntervalTreeAlgorithms<'a, T, I> {
        IntervalTreeAlgorithms::new(self, introspector)
    }
}

impl<'a, T, I: IntervalIntrospector<T>> IntervalTreeAlgorithms<'a, T, I> {
    pub fn new(tree: &'a IntervalTree<T>, introspector: &'a I) -> Self {
        IntervalTreeAlgorithms { tree, introspector }
    }

    pub fn tree(&self) -> &'a IntervalTree<T> {
        self.tree
    }

    pub fn has_interval_that_overlaps_with(&self, start: u32, length: u32) -> bool {
        self.tree
            .any(start, length, overlaps_with::<T, I>, self.introspector)
    }

    pub fn has_interval_that_intersects_with(&self, start: u32, length: u32) -> bool {
        self.tree
            .any(start, length, intersects_with::<T, I>, self.introspector)
    }

    /// Whether some value's span includes `position`, its end included.
    pub fn has_interval_that_intersects_with_position(&self, position: u32) -> bool {
        self.has_interval_that_intersects_with(position, 0)
    }

    pub fn has_interval_that_contains(&self, start: u32, length: u32) -> bool {
        self.tree.any(start, length, contains::<T, I>, self.introspector)
    }

    /// Iterate every value in tree order.
    pub fn iter(&self) -> crate::interval_tree::Iter<'a, T> {
        self.tree.iter()
    }
}

impl<T: Clone, I: IntervalIntrospector<T>> IntervalTreeAlgorithms<'_, T, I> {
    pub fn get_intervals_that_overlap_with(&self, start: u32, length: u32) -> Vec<T> {
        let mut out = Vec::new();
        self.fill_with_intervals_that_overlap_with(start, length, &mut out);
        out
    }

    pub fn get_intervals_that_intersect_with(&self, start: u32, length: u32) -> Vec<T> {
        let mut out = Vec::new();
        self.fill_with_intervals_that_intersect_with(start, length, &mut out);
        out
    }

    pub fn get_intervals_that_contain(&self, start: u32, length: u32) -> Vec<T> {
        let mut out = Vec::new();
        self.fill_with_intervals_that_contain(start, length, &mut out);
        out
    }

    pub fn fill_with_intervals_that_overlap_with(
        &self,
        start: u32,
        length: u32,
        out: &mut Vec<T>,
    ) -> usize {
        self.tree.fill_with_intervals_that_match(
            start,
            length,
            overlaps_with::<T, I>,
            out,
            self.introspector,
            false,
        )
    }

    pub fn fill_with_intervals_that_intersect_with(
        &self,
        start: u32,
        length: u32,
        out: &mut Vec<T>,
    ) -> usize {
        self.tree.fill_with_intervals_that_match(
            start,
            length,
            intersects_with::<T, I>,
            out,
            self.introspector,
            false,
        )
    }

    pub fn fill_with_intervals_that_contain(
        &self,
        start: u32,
        length: u32,
        out: &mut Vec<T>,
    ) -> usize {
        self.tree
            .fill_with_intervals_that_match(start, length, contains::<T, I>, out, self.introspector, false)
    }

    /// The first value in tree order that overlaps `[start, start + length)`.
    pub fn first_interval_that_overlaps_with(&self, start: u32, length: u32) -> Option<T> {
        let mut out = Vec::with_capacity(1);
        self.tree.fill_with_intervals_that_match(
            start,
            length,
            overlaps_with::<T, I>,
            &mut out,
            self.introspector,
            true,
        );
        out.pop()
    }
}

#[cfg(test)]
#[path = "../tests/algorithms_tests.rs"]
mod tests;
