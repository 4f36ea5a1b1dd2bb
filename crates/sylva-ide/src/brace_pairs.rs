//! Brace pairs.
//!
//! A brace pair is an open token and the close token that ends it, both
//! direct children of the same node: `(` and `)` of an argument list, `{`
//! and `}` of a block. Pairs are found by walking the green tree once and
//! can then be indexed by span for editor queries such as "which pairs are
//! visible" or "which pair surrounds the caret".

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use sylva_collections::{IntervalIntrospector, IntervalTree};
use sylva_common::TextSpan;
use sylva_syntax::{GreenId, GreenStore, RawKind};
use tracing::debug;

/// Open token kind to close token kind.
#[derive(Clone, Debug, Default)]
pub struct BracePairKinds {
    closers: FxHashMap<RawKind, RawKind>,
}

impl BracePairKinds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(open, close)` pairs; a later pair for the same open kind
    /// replaces the earlier one.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (RawKind, RawKind)>) -> Self {
        let mut kinds = Self::new();
        for (open, close) in pairs {
            kinds.add(Some(open), Some(close));
        }
        kinds
    }

    /// Register a pair. Grammars without one of the two kinds pass `None`,
    /// and the pair is skipped.
    pub fn add(&mut self, open: Option<RawKind>, close: Option<RawKind>) {
        if let (Some(open), Some(close)) = (open, close) {
            self.closers.insert(open, close);
        }
    }

    pub fn close_for(&self, open: RawKind) -> Option<RawKind> {
        self.closers.get(&open).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.closers.is_empty()
    }
}

/// Spans of an open token and its close token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BracePair {
    pub open: TextSpan,
    pub close: TextSpan,
}

impl BracePair {
    /// From the start of the open token to the end of the close token.
    pub fn span(&self) -> TextSpan {
        TextSpan::from_bounds(self.open.start(), self.close.end())
    }
}

/// Brace pair collection over a green tree.
pub struct BracePairs<'a> {
    store: &'a GreenStore,
    kinds: &'a BracePairKinds,
}

impl<'a> BracePairs<'a> {
    pub fn new(store: &'a GreenStore, kinds: &'a BracePairKinds) -> Self {
        BracePairs { store, kinds }
    }

    /// Every brace pair under `root` (which starts at offset 0), ordered by
    /// the start of the open token.
    ///
    /// An open token pairs with the first later sibling token of its close
    /// kind. Missing tokens never pair, so an unterminated `(` yields nothing.
    pub fn collect(&self, root: GreenId) -> Vec<BracePair> {
        let mut pairs = Vec::new();
        let mut stack = vec![(root, 0u32)];

        while let Some((id, offset)) = stack.pop() {
            let Some(node) = self.store.get(id) else {
                continue;
            };
            if node.is_token() {
                continue;
            }

            // Absolute span of every present child.
            let mut children: Vec<(GreenId, TextSpan)> = Vec::with_capacity(node.slot_count());
            let mut child_offset = offset;
            for &child in node.slots().iter().flatten() {
                let Some(child_node) = self.store.get(child) else {
                    continue;
                };
                children.push((child, TextSpan::new(child_offset, child_node.width())));
                child_offset = child_offset.saturating_add(child_node.width());
            }

            for (index, &(child, open_span)) in children.iter().enumerate() {
                if let Some(close) = self.close_sibling(child, &children[index + 1..]) {
                    pairs.push(BracePair {
                        open: open_span,
                        close,
                    });
                }
            }

            for &(child, span) in children.iter().rev() {
                stack.push((child, span.start()));
            }
        }

        pairs.sort_by_key(|pair| pair.open.start());
        debug!(root = root.0, pairs = pairs.len(), "BracePairs::collect");
        pairs
    }

    fn close_sibling(&self, open: GreenId, later: &[(GreenId, TextSpan)]) -> Option<TextSpan> {
        let open_node = self.store.get(open)?;
        if !open_node.is_token() || open_node.is_missing() {
            return None;
        }
        let close_kind = self.kinds.close_for(open_node.kind())?;
        later.iter().find_map(|&(sibling, span)| {
            let node = self.store.get(sibling)?;
            (node.is_token() && node.kind() == close_kind && !node.is_missing()).then_some(span)
        })
    }
}

struct BracePairIntrospector;

impl IntervalIntrospector<BracePair> for BracePairIntrospector {
    fn span(&self, pair: &BracePair) -> TextSpan {
        pair.span()
    }
}

/// Brace pairs of one document, indexed by the span they enclose.
#[derive(Clone, Debug, Default)]
pub struct BracePairIndex {
    tree: IntervalTree<BracePair>,
}

impl BracePairIndex {
    pub fn new(pairs: impl IntoIterator<Item = BracePair>) -> Self {
        BracePairIndex {
            tree: IntervalTree::create(&BracePairIntrospector, pairs),
        }
    }

    /// Collect and index the pairs under `root`.
    pub fn build(store: &GreenStore, kinds: &BracePairKinds, root: GreenId) -> Self {
        Self::new(BracePairs::new(store, kinds).collect(root))
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BracePair> {
        self.tree.iter()
    }

    /// Pairs whose enclosed span overlaps or touches `span`, in document order.
    pub fn pairs_intersecting(&self, span: TextSpan) -> Vec<BracePair> {
        self.tree
            .algorithms(&BracePairIntrospector)
            .get_intervals_that_intersect_with(span.start(), span.length())
    }

    /// The smallest pair whose span includes `position`, the position right
    /// after the close token included.
    pub fn innermost_pair_containing(&self, position: u32) -> Option<BracePair> {
        self.tree
            .algorithms(&BracePairIntrospector)
            .get_intervals_that_contain(position, 0)
            .into_iter()
            .min_by_key(|pair| (pair.span().length(), Reverse(pair.open.start())))
    }
}

#[cfg(test)]
#[path = "../tests/brace_pairs_tests.rs"]
mod tests;
