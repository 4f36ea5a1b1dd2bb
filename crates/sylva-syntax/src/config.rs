//! Node cache configuration.

use serde::{Deserialize, Serialize};
use sylva_common::limits::{MAX_NODE_CACHE_SIZE_BITS, MIN_NODE_CACHE_SIZE_BITS, NODE_CACHE_SIZE_BITS};
use thiserror::Error;

/// Sizing of a [`NodeCache`](crate::NodeCache).
///
/// Deserializes from `{"size_bits": 12}`; a missing field takes the default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeCacheConfig {
    /// The cache holds `1 << size_bits` entries.
    pub size_bits: u32,
}

impl Default for NodeCacheConfig {
    fn default() -> Self {
        NodeCacheConfig {
            size_bits: NODE_CACHE_SIZE_BITS,
        }
    }
}

impl NodeCacheConfig {
    pub fn with_size_bits(size_bits: u32) -> Self {
        NodeCacheConfig { size_bits }
    }

    pub fn validate(&self) -> Result<(), NodeCacheConfigError> {
        if !(MIN_NODE_CACHE_SIZE_BITS..=MAX_NODE_CACHE_SIZE_BITS).contains(&self.size_bits) {
            return Err(NodeCacheConfigError::SizeBitsOutOfRange {
                actual: self.size_bits,
                min: MIN_NODE_CACHE_SIZE_BITS,
                max: MAX_NODE_CACHE_SIZE_BITS,
            });
        }
        Ok(())
    }

    /// Number of entries. Only meaningful for a validated config.
    pub fn capacity(&self) -> usize {
        1usize << self.size_bits
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeCacheConfigError {
    #[error("node cache size_bits must be in {min}..={max}, got {actual}")]
    SizeBitsOutOfRange { actual: u32, min: u32, max: u32 },
}
