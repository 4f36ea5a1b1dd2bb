//! Editor features built on sylva green trees.
//!
//! This crate provides:
//! - `BracePairKinds` - which open token kinds close with which
//! - `BracePairs` - collecting matching brace tokens from a green tree
//! - `BracePairIndex` - an interval tree of brace pairs for span queries

pub mod brace_pairs;
pub use brace_pairs::{BracePair, BracePairIndex, BracePairKinds, BracePairs};
