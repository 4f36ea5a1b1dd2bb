//! Common types and utilities for the sylva syntax infrastructure.
//!
//! This crate provides foundational types used across all sylva crates:
//! - Source spans (`TextSpan`)
//! - Centralized limits and sizing constants
//! - Tracing subscriber setup for tools and benchmarks

// Span - half-open document ranges (byte offsets)
pub mod span;
pub use span::TextSpan;

// Centralized limits and thresholds
pub mod limits;

// Opt-in tracing output
pub mod tracing_config;
pub use tracing_config::{TracingConfig, init_tracing};
