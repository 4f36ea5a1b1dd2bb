//! Green syntax nodes and the structural node cache.
//!
//! This crate provides:
//! - `RawKind` / `NodeFlags` - node kind tags and per-node flags
//! - `GreenNodeData` / `GreenId` - immutable nodes and their arena handles
//! - `GreenArena` - sharded, append-only node storage
//! - `NodeCache` - fixed-size structural interning cache for small nodes
//! - `GreenStore` - the factory a parser builds trees through

pub mod flags;
pub use flags::{NodeFlags, RawKind};

pub mod green;
pub use green::{GreenDiagnostic, GreenId, GreenNode, GreenNodeData, GreenSlots, SyntaxAnnotation, cache_hash};

pub mod arena;
pub use arena::GreenArena;

pub mod config;
pub use config::{NodeCacheConfig, NodeCacheConfigError};

pub mod node_cache;
pub use node_cache::{NodeCache, NodeCacheStats, Probe};

pub mod store;
pub use store::GreenStore;
