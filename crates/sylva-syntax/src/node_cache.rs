//! Structural node cache.
//!
//! A fixed-size, direct-mapped table that lets a parser reuse a previously
//! built node when it is about to build one with the same kind, flags and
//! children. Each slot is a single `AtomicU64` packing `(hash, GreenId)`:
//!
//! ```text
//! 63            32 31             0
//! +---------------+---------------+
//! |  cache hash   |    GreenId    |
//! +---------------+---------------+
//! ```
//!
//! Cache hashes fit in 31 bits, so the all-ones word is free to mark an empty
//! slot. The table never grows and never chains: an insert overwrites
//! whatever shares its slot. A hit is always re-checked against the arena, so
//! a stale or colliding entry can cost a miss but never return the wrong node.
//!
//! Only small nodes are cached (see [`GreenNodeData::is_cacheable`]), and a
//! node is only added while all of its non-leaf children are still resident.
//! That keeps the cache from holding parents whose children could never be
//! hit again.

use crate::arena::GreenArena;
use crate::config::{NodeCacheConfig, NodeCacheConfigError};
use crate::flags::{NodeFlags, RawKind};
use crate::green::{GreenId, GreenNodeData, cache_hash};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use sylva_common::limits::MAX_CACHED_CHILDREN;
use tracing::{debug, trace};

const EMPTY: u64 = u64::MAX;

#[inline]
fn pack(hash: u32, id: GreenId) -> u64 {
    (u64::from(hash) << 32) | u64::from(id.0)
}

#[inline]
fn unpack(entry: u64) -> Option<(u32, GreenId)> {
    if entry == EMPTY {
        return None;
    }
    Some(((entry >> 32) as u32, GreenId(entry as u32)))
}

/// Outcome of [`NodeCache::try_get`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// A structurally equal node is cached.
    Hit(GreenId),
    /// The key is eligible but not cached; pass `hash` to [`NodeCache::add`]
    /// once the node is built.
    Miss { hash: u32 },
    /// The key can never be cached (too many children, an uncacheable child
    /// or decorated/missing flags). Build the node and skip `add`.
    Ineligible,
}

/// Snapshot of the cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NodeCacheStats {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub ineligible: u64,
    pub adds: u64,
    pub rejected_adds: u64,
    pub evictions: u64,
}

impl NodeCacheStats {
    /// Hits over eligible lookups, `0.0` before the first eligible lookup.
    pub fn hit_rate(&self) -> f64 {
        let eligible = self.hits + self.misses;
        if eligible == 0 {
            return 0.0;
        }
        self.hits as f64 / eligible as f64
    }
}

#[derive(Default)]
struct Counters {
    lookups: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    ineligible: AtomicU64,
    adds: AtomicU64,
    rejected_adds: AtomicU64,
    evictions: AtomicU64,
}

impl Counters {
    #[inline]
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct NodeCache {
    entries: Box<[AtomicU64]>,
    mask: u32,
    counters: Counters,
}

impl NodeCache {
    /// A cache with the default size.
    pub fn new() -> Self {
        Self::build(NodeCacheConfig::default())
    }

    pub fn with_config(config: &NodeCacheConfig) -> Result<Self, NodeCacheConfigError> {
        config.validate()?;
        Ok(Self::build(*config))
    }

    fn build(config: NodeCacheConfig) -> Self {
        let capacity = config.capacity();
        debug!(size_bits = config.size_bits, capacity, "NodeCache::new");
        NodeCache {
            entries: (0..capacity).map(|_| AtomicU64::new(EMPTY)).collect(),
            mask: (capacity - 1) as u32,
            counters: Counters::default(),
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn slot(&self, hash: u32) -> &AtomicU64 {
        &self.entries[(hash & self.mask) as usize]
    }

    /// Look for a node equal to `(kind, flags, children)`.
    ///
    /// `flags` are the flags the caller would build the node with; flags the
    /// children pass up are added here, exactly as node construction does.
    pub fn try_get(
        &self,
        arena: &GreenArena,
        kind: RawKind,
        flags: NodeFlags,
        children: &[Option<GreenId>],
    ) -> Probe {
        Counters::bump(&self.counters.lookups);

        if children.len() > MAX_CACHED_CHILDREN || flags.is_missing() || flags.is_decorated() {
            Counters::bump(&self.counters.ineligible);
            return Probe::Ineligible;
        }

        let mut effective = flags;
        for &child in children.iter().flatten() {
            match arena.get(child) {
                Some(node) if node.is_cacheable() => effective |= node.flags().inherited(),
                _ => {
                    Counters::bump(&self.counters.ineligible);
                    return Probe::Ineligible;
                }
            }
        }

        let hash = cache_hash(kind, effective, children);
        if let Some((entry_hash, id)) = unpack(self.slot(hash).load(Ordering::Acquire))
            && entry_hash == hash
            && arena
                .get(id)
                .is_some_and(|node| node.is_cache_equivalent(kind, effective, children))
        {
            Counters::bump(&self.counters.hits);
            return Probe::Hit(id);
        }

        Counters::bump(&self.counters.misses);
        Probe::Miss { hash }
    }

    /// Offer the freshly built node `id` for caching under `hash`.
    ///
    /// Returns whether the node was stored. It is rejected if it is missing
    /// or otherwise uncacheable, if `hash` is not its cache hash, or if one
    /// of its non-leaf children is no longer resident. Storing overwrites
    /// whatever held the slot.
    pub fn add(&self, arena: &GreenArena, id: GreenId, hash: u32) -> bool {
        let accepted = match arena.get(id) {
            Some(node) => {
                node.cache_hash() == hash
                    && node.is_cacheable()
                    && self.all_children_in_cache(arena, &node)
            }
            None => false,
        };
        if !accepted {
            Counters::bump(&self.counters.rejected_adds);
            trace!(id = id.0, hash, "NodeCache::add rejected");
            return false;
        }

        let entry = pack(hash, id);
        let previous = self.slot(hash).swap(entry, Ordering::AcqRel);
        Counters::bump(&self.counters.adds);
        if previous != EMPTY && previous != entry {
            Counters::bump(&self.counters.evictions);
            trace!(id = id.0, hash, evicted = previous as u32, "NodeCache::add evicted");
        }
        true
    }

    /// Whether `id` currently occupies its slot.
    ///
    /// A `true` answer can be stale by the time the caller looks at it.
    pub fn is_resident(&self, arena: &GreenArena, id: GreenId) -> bool {
        arena
            .get(id)
            .is_some_and(|node| self.holds(id, node.cache_hash()))
    }

    #[inline]
    fn holds(&self, id: GreenId, hash: u32) -> bool {
        unpack(self.slot(hash).load(Ordering::Acquire)) == Some((hash, id))
    }

    /// Leaves (no slots) always count as resident: they are deduplicated
    /// elsewhere and never go through this table.
    fn all_children_in_cache(&self, arena: &GreenArena, node: &GreenNodeData) -> bool {
        node.slots().iter().flatten().all(|&child| match arena.get(child) {
            Some(child_node) if child_node.slot_count() == 0 => true,
            Some(child_node) => self.holds(child, child_node.cache_hash()),
            None => false,
        })
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        for entry in self.entries.iter() {
            entry.store(EMPTY, Ordering::Release);
        }
    }

    pub fn stats(&self) -> NodeCacheStats {
        let c = &self.counters;
        NodeCacheStats {
            lookups: c.lookups.load(Ordering::Relaxed),
            hits: c.hits.load(Ordering::Relaxed),
            misses: c.misses.load(Ordering::Relaxed),
            ineligible: c.ineligible.load(Ordering::Relaxed),
            adds: c.adds.load(Ordering::Relaxed),
            rejected_adds: c.rejected_adds.load(Ordering::Relaxed),
            evictions: c.evictions.load(Ordering::Relaxed),
        }
    }
}

impl Default for NodeCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/node_cache_tests.rs"]
mod tests;
