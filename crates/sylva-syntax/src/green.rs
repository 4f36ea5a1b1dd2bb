//! Immutable green nodes.
//!
//! A green node knows its kind, flags, width and children but not its
//! position; the same node may appear at many offsets (and in many trees).
//! Nodes live in a [`GreenArena`](crate::arena::GreenArena) and are addressed
//! by [`GreenId`].

use crate::flags::{NodeFlags, RawKind};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use sylva_common::limits::{MAX_CACHED_CHILDREN, MAX_TOKEN_WIDTH};

/// Handle of a green node in a [`GreenArena`](crate::arena::GreenArena).
///
/// The low `SHARD_BITS` bits select the arena shard, the rest is the index
/// inside that shard. Two handles are equal iff they name the same node,
/// which is what the node cache uses as child identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GreenId(pub u32);

impl GreenId {
    /// Sentinel that never names a node.
    pub const NONE: GreenId = GreenId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == GreenId::NONE
    }
}

/// Shared handle to node data.
pub type GreenNode = Arc<GreenNodeData>;

/// Child slots; small nodes stay inline.
pub type GreenSlots = SmallVec<[Option<GreenId>; MAX_CACHED_CHILDREN]>;

/// A diagnostic attached to a green node.
///
/// `offset` is relative to the start of the node it is attached to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GreenDiagnostic {
    pub code: u32,
    pub message: String,
    pub offset: u32,
    pub width: u32,
}

impl GreenDiagnostic {
    pub fn new(code: u32, message: impl Into<String>, offset: u32, width: u32) -> Self {
        GreenDiagnostic {
            code,
            message: message.into(),
            offset,
            width,
        }
    }
}

static NEXT_ANNOTATION_ID: AtomicU64 = AtomicU64::new(1);

/// An opaque marker that survives tree edits.
///
/// Annotations compare by their process-unique id only.
#[derive(Clone, Debug)]
pub struct SyntaxAnnotation {
    id: u64,
    kind: Option<Arc<str>>,
    data: Option<Arc<str>>,
}

impl SyntaxAnnotation {
    pub fn new() -> Self {
        Self::with_kind_and_data(None, None)
    }

    pub fn with_kind(kind: &str) -> Self {
        Self::with_kind_and_data(Some(kind), None)
    }

    pub fn with_kind_and_data(kind: Option<&str>, data: Option<&str>) -> Self {
        SyntaxAnnotation {
            id: NEXT_ANNOTATION_ID.fetch_add(1, Ordering::Relaxed),
            kind: kind.map(Arc::from),
            data: data.map(Arc::from),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

impl Default for SyntaxAnnotation {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for SyntaxAnnotation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SyntaxAnnotation {}

impl Hash for SyntaxAnnotation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Immutable data of one green node or token.
#[derive(Clone, Debug)]
pub struct GreenNodeData {
    kind: RawKind,
    flags: NodeFlags,
    width: u32,
    cache_hash: u32,
    slots: GreenSlots,
    text: Option<Arc<str>>,
    diagnostics: Option<Arc<[GreenDiagnostic]>>,
    annotations: Option<Arc<[SyntaxAnnotation]>>,
}

impl GreenNodeData {
    /// Build an interior node. `flags` must already include whatever the
    /// children pass up (see [`NodeFlags::inherited`]).
    pub(crate) fn node(kind: RawKind, flags: NodeFlags, width: u32, slots: GreenSlots) -> Self {
        let cache_hash = cache_hash(kind, flags, &slots);
        GreenNodeData {
            kind,
            flags,
            width,
            cache_hash,
            slots,
            text: None,
            diagnostics: None,
            annotations: None,
        }
    }

    pub(crate) fn token(kind: RawKind, flags: NodeFlags, text: Arc<str>) -> Self {
        let width = token_width(text.len());
        GreenNodeData {
            kind,
            flags,
            width,
            cache_hash: cache_hash(kind, flags, &[]),
            slots: GreenSlots::new(),
            text: Some(text),
            diagnostics: None,
            annotations: None,
        }
    }

    pub(crate) fn set_diagnostics(&mut self, diagnostics: Arc<[GreenDiagnostic]>) {
        self.flags |= NodeFlags::HAS_DIAGNOSTICS | NodeFlags::CONTAINS_DIAGNOSTICS;
        self.diagnostics = Some(diagnostics);
        self.cache_hash = cache_hash(self.kind, self.flags, &self.slots);
    }

    pub(crate) fn set_annotations(&mut self, annotations: Arc<[SyntaxAnnotation]>) {
        self.flags |= NodeFlags::HAS_ANNOTATIONS | NodeFlags::CONTAINS_ANNOTATIONS;
        self.annotations = Some(annotations);
        self.cache_hash = cache_hash(self.kind, self.flags, &self.slots);
    }

    #[inline]
    pub fn kind(&self) -> RawKind {
        self.kind
    }

    #[inline]
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Full width of the text this node covers.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Child in slot `index`; `None` for an empty slot or an out of range index.
    #[inline]
    pub fn slot(&self, index: usize) -> Option<GreenId> {
        self.slots.get(index).copied().flatten()
    }

    #[inline]
    pub fn slots(&self) -> &[Option<GreenId>] {
        &self.slots
    }

    /// Token text; `None` for interior nodes.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[inline]
    pub fn is_token(&self) -> bool {
        self.text.is_some()
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.flags.is_missing()
    }

    pub fn diagnostics(&self) -> &[GreenDiagnostic] {
        self.diagnostics.as_deref().unwrap_or(&[])
    }

    pub fn annotations(&self) -> &[SyntaxAnnotation] {
        self.annotations.as_deref().unwrap_or(&[])
    }

    /// Structural hash of this node, as the node cache computes it for the
    /// node's `(kind, flags, children)` key.
    #[inline]
    pub fn cache_hash(&self) -> u32 {
        self.cache_hash
    }

    /// Whether this node may be a cached node or the child of one.
    ///
    /// Missing nodes, nodes carrying (or containing) diagnostics or
    /// annotations, and nodes with more than `MAX_CACHED_CHILDREN` slots are
    /// never cached.
    #[inline]
    pub fn is_cacheable(&self) -> bool {
        !self.is_missing() && !self.flags.is_decorated() && self.slot_count() <= MAX_CACHED_CHILDREN
    }

    /// Structural equality against a cache key.
    pub fn is_cache_equivalent(
        &self,
        kind: RawKind,
        flags: NodeFlags,
        children: &[Option<GreenId>],
    ) -> bool {
        self.kind == kind && self.flags == flags && self.slots.as_slice() == children
    }
}

/// Width of a token with `len` bytes of text, clamped to [`MAX_TOKEN_WIDTH`].
#[inline]
pub(crate) fn token_width(len: usize) -> u32 {
    debug_assert!(
        len <= MAX_TOKEN_WIDTH as usize,
        "token text of {len} bytes exceeds the u32 offset space"
    );
    u32::try_from(len).unwrap_or(MAX_TOKEN_WIDTH)
}

/// Identity hash of a child handle.
#[inline]
pub(crate) fn identity_hash(id: GreenId) -> u32 {
    let mut hasher = FxHasher::default();
    id.hash(&mut hasher);
    hasher.finish() as u32
}

/// Mix `new` into the running hash `current`.
#[inline]
pub(crate) fn combine(new: u32, current: u32) -> u32 {
    current.wrapping_mul(0xA555_5529).wrapping_add(new)
}

/// Structural hash of a `(kind, flags, children)` key, always in `0..2^31`.
///
/// Children contribute by identity, so the hash is O(slot count) no matter
/// how deep the subtree is. Empty slots contribute nothing.
pub fn cache_hash(kind: RawKind, flags: NodeFlags, children: &[Option<GreenId>]) -> u32 {
    let mut code = u32::from(flags.bits()) ^ u32::from(kind.0);
    for child in children.iter().flatten() {
        code = combine(identity_hash(*child), code);
    }
    code & 0x7FFF_FFFF
}

#[cfg(test)]
#[path = "../tests/green_tests.rs"]
mod tests;
