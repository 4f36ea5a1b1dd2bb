//! Node kinds and node flags.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Raw syntax kind tag.
///
/// The grammar owns the meaning of every value except the reserved ones
/// below; this layer only compares and hashes kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RawKind(pub u16);

impl RawKind {
    /// Reserved for "no kind".
    pub const NONE: RawKind = RawKind(0);
    /// Reserved kind used by `GreenStore::list` for list nodes.
    pub const LIST: RawKind = RawKind(1);
    /// First kind value available to grammars.
    pub const FIRST_GRAMMAR_KIND: u16 = 2;

    #[inline]
    pub fn as_u16(self) -> u16 {
        self.0
    }
}

bitflags! {
    /// Per-node flags.
    ///
    /// `CONTAINS_*` flags are inherited from children when a node is built.
    /// Context flags record the parser state a node was produced in; two
    /// otherwise identical nodes built in different contexts are distinct.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u16 {
        const IS_NOT_MISSING = 1 << 0;
        const HAS_DIAGNOSTICS = 1 << 1;
        const HAS_ANNOTATIONS = 1 << 2;
        const CONTAINS_DIAGNOSTICS = 1 << 3;
        const CONTAINS_ANNOTATIONS = 1 << 4;
        const CONTAINS_SKIPPED_TEXT = 1 << 5;
        const IN_ASYNC_CONTEXT = 1 << 6;
        const IN_AWAIT_CONTEXT = 1 << 7;
        const IN_QUERY_CONTEXT = 1 << 8;

        /// Flags a parent takes over from its children.
        const INHERIT_MASK = Self::CONTAINS_DIAGNOSTICS.bits()
            | Self::CONTAINS_ANNOTATIONS.bits()
            | Self::CONTAINS_SKIPPED_TEXT.bits();
        /// Flags that make a node (and its ancestors) ineligible for caching.
        const DECORATION_MASK = Self::HAS_DIAGNOSTICS.bits()
            | Self::HAS_ANNOTATIONS.bits()
            | Self::CONTAINS_DIAGNOSTICS.bits()
            | Self::CONTAINS_ANNOTATIONS.bits();
        /// Parser context flags.
        const CONTEXT_MASK = Self::IN_ASYNC_CONTEXT.bits()
            | Self::IN_AWAIT_CONTEXT.bits()
            | Self::IN_QUERY_CONTEXT.bits();
    }
}

impl NodeFlags {
    /// Flags of an ordinary, present node built outside any special context.
    #[inline]
    pub const fn default_node_flags() -> NodeFlags {
        NodeFlags::IS_NOT_MISSING
    }

    #[inline]
    pub fn is_missing(self) -> bool {
        !self.contains(NodeFlags::IS_NOT_MISSING)
    }

    #[inline]
    pub fn is_decorated(self) -> bool {
        self.intersects(NodeFlags::DECORATION_MASK)
    }

    /// The flags a parent picks up from a child with these flags.
    #[inline]
    pub fn inherited(self) -> NodeFlags {
        self & NodeFlags::INHERIT_MASK
    }
}
