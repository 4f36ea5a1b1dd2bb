//! Span-indexed collections.
//!
//! This crate provides:
//! - `IntervalTree` - persistent augmented AVL tree for overlap queries
//! - `IntervalIntrospector` - how the tree learns a value's span
//! - `IntervalTreeAlgorithms` - named overlap, intersect and contain queries

pub mod introspector;
pub use introspector::{IntervalIntrospector, SpanIntrospector};

pub mod interval_tree;
pub use interval_tree::{IntervalTree, Iter};

pub mod algorithms;
pub use algorithms::IntervalTreeAlgorithms;
