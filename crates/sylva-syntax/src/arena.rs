//! Sharded, append-only storage for green nodes.
//!
//! Nodes are spread over `SHARD_COUNT` shards by a hash of their content so
//! that parser threads building different nodes rarely take the same lock.
//! A [`GreenId`] packs the shard index into its low bits:
//!
//! ```text
//! GreenId = local_index << SHARD_BITS | shard_index
//! ```
//!
//! Nothing is ever removed, so an id stays valid for the arena's lifetime.

use crate::green::{GreenId, GreenNode, GreenNodeData};
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};
use sylva_common::limits::{MAX_SHARD_LOCAL_INDEX, SHARD_BITS, SHARD_COUNT, SHARD_MASK};
use tracing::trace;

struct GreenShard {
    nodes: RwLock<Vec<GreenNode>>,
}

impl GreenShard {
    fn new() -> Self {
        GreenShard {
            nodes: RwLock::new(Vec::new()),
        }
    }
}

/// Owner of every green node built through a [`GreenStore`](crate::GreenStore).
pub struct GreenArena {
    shards: [GreenShard; SHARD_COUNT],
}

impl GreenArena {
    pub fn new() -> Self {
        GreenArena {
            shards: std::array::from_fn(|_| GreenShard::new()),
        }
    }

    /// Store `data` and return its handle.
    ///
    /// # Panics
    ///
    /// Panics if the chosen shard already holds `MAX_SHARD_LOCAL_INDEX + 1`
    /// nodes.
    pub fn alloc(&self, data: GreenNodeData) -> GreenId {
        let mut hasher = FxHasher::default();
        data.kind().hash(&mut hasher);
        data.cache_hash().hash(&mut hasher);
        data.width().hash(&mut hasher);
        data.text().hash(&mut hasher);
        let shard_idx = (hasher.finish() as usize) & SHARD_MASK;

        let mut nodes = self.shards[shard_idx]
            .nodes
            .write()
            .expect("green shard lock poisoned");
        let local_index = nodes.len() as u32;
        assert!(
            local_index <= MAX_SHARD_LOCAL_INDEX,
            "green arena shard {shard_idx} is full"
        );
        nodes.push(Arc::new(data));
        drop(nodes);

        let id = make_id(local_index, shard_idx as u32);
        trace!(id = id.0, shard = shard_idx, "GreenArena::alloc");
        id
    }

    /// Look up the node behind `id`; `None` if this arena never handed it out.
    pub fn get(&self, id: GreenId) -> Option<GreenNode> {
        if id.is_none() {
            return None;
        }
        let shard_idx = (id.0 as usize) & SHARD_MASK;
        let local_index = (id.0 >> SHARD_BITS) as usize;
        let nodes = self.shards[shard_idx]
            .nodes
            .read()
            .expect("green shard lock poisoned");
        nodes.get(local_index).cloned()
    }

    /// Whether `id` names a node in this arena.
    pub fn contains(&self, id: GreenId) -> bool {
        self.get(id).is_some()
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.nodes.read().expect("green shard lock poisoned").len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for GreenArena {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn make_id(local_index: u32, shard_idx: u32) -> GreenId {
    GreenId((local_index << SHARD_BITS) | (shard_idx & SHARD_MASK as u32))
}

#[cfg(test)]
#[path = "../tests/arena_tests.rs"]
mod tests;
