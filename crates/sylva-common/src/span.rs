//! Half-open ranges over a document.
//!
//! A `TextSpan` is `[start, start + length)` in byte offsets. Offsets are
//! `u32`, so a span can never have a negative start or length; callers must
//! keep `start + length` within `u32`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open range `[start, end)` of document offsets.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TextSpan {
    start: u32,
    length: u32,
}

impl TextSpan {
    /// Create a span from a start offset and a length.
    #[inline]
    pub fn new(start: u32, length: u32) -> Self {
        debug_assert!(
            start.checked_add(length).is_some(),
            "span end overflows u32: start={start}, length={length}"
        );
        TextSpan { start, length }
    }

    /// Create a span from its start and (exclusive) end offsets.
    #[inline]
    pub fn from_bounds(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start {start} is after end {end}");
        TextSpan {
            start,
            length: end - start,
        }
    }

    /// An empty span at `position`.
    #[inline]
    pub fn empty_at(position: u32) -> Self {
        TextSpan {
            start: position,
            length: 0,
        }
    }

    #[inline]
    pub fn start(self) -> u32 {
        self.start
    }

    #[inline]
    pub fn length(self) -> u32 {
        self.length
    }

    /// Exclusive end offset.
    #[inline]
    pub fn end(self) -> u32 {
        self.start + self.length
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.length == 0
    }

    /// Whether `position` lies in `[start, end)`.
    #[inline]
    pub fn contains_position(self, position: u32) -> bool {
        position.wrapping_sub(self.start) < self.length
    }

    /// Whether `other` lies entirely inside this span.
    #[inline]
    pub fn contains(self, other: TextSpan) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }

    /// Whether the two spans share at least one offset.
    ///
    /// Empty spans overlap nothing.
    #[inline]
    pub fn overlaps_with(self, other: TextSpan) -> bool {
        self.start.max(other.start) < self.end().min(other.end())
    }

    /// The shared part of two overlapping spans.
    pub fn overlap(self, other: TextSpan) -> Option<TextSpan> {
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        (start < end).then(|| TextSpan::from_bounds(start, end))
    }

    /// Whether the spans overlap or touch.
    ///
    /// Unlike [`overlaps_with`](Self::overlaps_with), `[0, 5)` intersects
    /// `[5, 7)` and an empty span intersects any span it sits inside or at the
    /// edge of.
    #[inline]
    pub fn intersects_with(self, other: TextSpan) -> bool {
        other.start <= self.end() && other.end() >= self.start
    }

    /// Whether `position` lies in `[start, end]` (end inclusive).
    #[inline]
    pub fn intersects_with_position(self, position: u32) -> bool {
        position.wrapping_sub(self.start) <= self.length
    }

    /// The shared part of two intersecting spans (possibly empty).
    pub fn intersection(self, other: TextSpan) -> Option<TextSpan> {
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        (start <= end).then(|| TextSpan::from_bounds(start, end))
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end())
    }
}

impl From<std::ops::Range<u32>> for TextSpan {
    fn from(range: std::ops::Range<u32>) -> Self {
        TextSpan::from_bounds(range.start, range.end)
    }
}

#[cfg(test)]
#[path = "../tests/span_tests.rs"]
mod tests;
