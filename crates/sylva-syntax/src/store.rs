//! Green node factory.
//!
//! `GreenStore` is what a parser talks to. It owns the arena, consults the
//! node cache before building small nodes and deduplicates tokens by text.
//!
//! ## Usage
//!
//! ```ignore
//! let store = GreenStore::new();
//! let a = store.token(IDENT, "a");
//! let plus = store.token(PLUS, "+");
//! let b = store.token(IDENT, "b");
//! let first = store.node_default(BINARY, &[Some(a), Some(plus), Some(b)]);
//! let again = store.node_default(BINARY, &[Some(a), Some(plus), Some(b)]);
//! // `again` is usually `first`; a colliding insert may have evicted it.
//! ```

use crate::arena::GreenArena;
use crate::config::{NodeCacheConfig, NodeCacheConfigError};
use crate::flags::{NodeFlags, RawKind};
use crate::green::{GreenDiagnostic, GreenId, GreenNode, GreenNodeData, GreenSlots, SyntaxAnnotation};
use crate::node_cache::{NodeCache, Probe};
use dashmap::DashMap;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Tokens sharing a text, told apart by kind and flags.
type TokenBucket = SmallVec<[(RawKind, NodeFlags, GreenId); 2]>;

/// Thread-safe green node factory.
pub struct GreenStore {
    /// Unique instance ID, for telling stores apart in traces.
    instance_id: u64,
    arena: GreenArena,
    cache: NodeCache,
    tokens: DashMap<Arc<str>, TokenBucket>,
}

impl Default for GreenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GreenStore {
    /// A store with a default-sized node cache.
    pub fn new() -> Self {
        Self::from_cache(NodeCache::new())
    }

    pub fn with_config(config: &NodeCacheConfig) -> Result<Self, NodeCacheConfigError> {
        Ok(Self::from_cache(NodeCache::with_config(config)?))
    }

    fn from_cache(cache: NodeCache) -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed);
        debug!(instance_id, capacity = cache.capacity(), "GreenStore::new");
        GreenStore {
            instance_id,
            arena: GreenArena::new(),
            cache,
            tokens: DashMap::new(),
        }
    }

    /// The process-wide store, created on first use.
    pub fn global() -> &'static GreenStore {
        static GLOBAL: OnceLock<GreenStore> = OnceLock::new();
        GLOBAL.get_or_init(GreenStore::new)
    }

    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    pub fn arena(&self) -> &GreenArena {
        &self.arena
    }

    pub fn cache(&self) -> &NodeCache {
        &self.cache
    }

    /// Node data behind `id`.
    pub fn get(&self, id: GreenId) -> Option<GreenNode> {
        self.arena.get(id)
    }

    /// A present token with default flags.
    pub fn token(&self, kind: RawKind, text: &str) -> GreenId {
        self.token_with_flags(kind, NodeFlags::default_node_flags(), text)
    }

    /// A token; equal `(kind, flags, text)` always yield the same id.
    ///
    /// Missing flags are forced off here. Use [`missing_token`](Self::missing_token)
    /// for a missing token.
    pub fn token_with_flags(&self, kind: RawKind, flags: NodeFlags, text: &str) -> GreenId {
        let flags = (flags & !NodeFlags::DECORATION_MASK) | NodeFlags::IS_NOT_MISSING;

        if let Some(bucket) = self.tokens.get(text)
            && let Some(&(_, _, id)) = bucket.iter().find(|(k, f, _)| *k == kind && *f == flags)
        {
            return id;
        }

        let mut bucket = self.tokens.entry(Arc::from(text)).or_default();
        // Another thread may have added it between the read and the entry lock.
        if let Some(&(_, _, id)) = bucket.iter().find(|(k, f, _)| *k == kind && *f == flags) {
            return id;
        }
        let shared = Arc::clone(bucket.key());
        let id = self.arena.alloc(GreenNodeData::token(kind, flags, shared));
        bucket.push((kind, flags, id));
        trace!(
            instance_id = self.instance_id,
            kind = kind.0,
            id = id.0,
            "GreenStore::token"
        );
        id
    }

    /// A zero-width token standing in for one the parser expected but did not
    /// find. Never deduplicated and never cached.
    pub fn missing_token(&self, kind: RawKind) -> GreenId {
        self.arena
            .alloc(GreenNodeData::token(kind, NodeFlags::empty(), Arc::from("")))
    }

    /// An interior node with default flags.
    pub fn node_default(&self, kind: RawKind, children: &[Option<GreenId>]) -> GreenId {
        self.node(kind, NodeFlags::default_node_flags(), children)
    }

    /// An interior node; reuses a cached equal node when one is resident.
    ///
    /// Width and inherited flags come from the children. Decoration flags in
    /// `flags` are ignored; use [`with_diagnostics`](Self::with_diagnostics)
    /// and [`with_annotations`](Self::with_annotations) instead.
    pub fn node(&self, kind: RawKind, flags: NodeFlags, children: &[Option<GreenId>]) -> GreenId {
        let flags = flags & !NodeFlags::DECORATION_MASK;

        match self.cache.try_get(&self.arena, kind, flags, children) {
            Probe::Hit(id) => {
                trace!(instance_id = self.instance_id, kind = kind.0, id = id.0, "node cache hit");
                id
            }
            Probe::Miss { hash } => {
                let id = self.build(kind, flags, children);
                let added = self.cache.add(&self.arena, id, hash);
                trace!(
                    instance_id = self.instance_id,
                    kind = kind.0,
                    id = id.0,
                    added,
                    "node cache miss"
                );
                id
            }
            Probe::Ineligible => self.build(kind, flags, children),
        }
    }

    /// A list node over `children`.
    pub fn list(&self, children: &[GreenId]) -> GreenId {
        let slots: GreenSlots = children.iter().copied().map(Some).collect();
        self.node_default(RawKind::LIST, &slots)
    }

    fn build(&self, kind: RawKind, flags: NodeFlags, children: &[Option<GreenId>]) -> GreenId {
        let mut width = 0u32;
        let mut flags = flags;
        for &child in children.iter().flatten() {
            let Some(node) = self.arena.get(child) else {
                debug!(instance_id = self.instance_id, child = child.0, "GreenStore::build: unknown child");
                continue;
            };
            width = width.saturating_add(node.width());
            flags |= node.flags().inherited();
        }
        let slots: GreenSlots = children.iter().copied().collect();
        self.arena
            .alloc(GreenNodeData::node(kind, flags, width, slots))
    }

    /// A copy of `id` carrying `diagnostics`. The copy and every node built
    /// over it are never cached. Returns `id` unchanged if it is unknown.
    pub fn with_diagnostics(&self, id: GreenId, diagnostics: Vec<GreenDiagnostic>) -> GreenId {
        let Some(node) = self.arena.get(id) else {
            return id;
        };
        let mut data = GreenNodeData::clone(&node);
        data.set_diagnostics(diagnostics.into());
        let decorated = self.arena.alloc(data);
        trace!(instance_id = self.instance_id, from = id.0, to = decorated.0, "GreenStore::with_diagnostics");
        decorated
    }

    /// A copy of `id` carrying `annotations`; see [`with_diagnostics`](Self::with_diagnostics).
    pub fn with_annotations(&self, id: GreenId, annotations: Vec<SyntaxAnnotation>) -> GreenId {
        let Some(node) = self.arena.get(id) else {
            return id;
        };
        let mut data = GreenNodeData::clone(&node);
        data.set_annotations(annotations.into());
        let decorated = self.arena.alloc(data);
        trace!(instance_id = self.instance_id, from = id.0, to = decorated.0, "GreenStore::with_annotations");
        decorated
    }

    /// Concatenated token text of the subtree rooted at `id`.
    pub fn text(&self, id: GreenId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.arena.get(current) else {
                continue;
            };
            if let Some(text) = node.text() {
                out.push_str(text);
            }
            stack.extend(node.slots().iter().rev().flatten().copied());
        }
        out
    }
}

#[cfg(test)]
#[path = "../tests/store_tests.rs"]
mod tests;
