//! Persistent augmented AVL tree of intervals.
//!
//! Values are ordered by the start of their span (as reported by an
//! [`IntervalIntrospector`]); values with equal starts keep insertion order.
//! Every node also records the largest end offset found in its subtree, which
//! lets overlap queries skip whole subtrees.
//!
//! Nodes are shared through `Arc`. Inserting copies only the root-to-leaf
//! path (and only the nodes on it that some snapshot still shares), so
//! cloning a tree is O(1) and a clone never observes later insertions.
//!
//! ```text
//!             [10..15) max_end=20
//!             /                  \
//!   [0..5) max_end=8        [12..20) max_end=20
//!         \
//!       [3..8) max_end=8
//! ```

use crate::introspector::IntervalIntrospector;
use smallvec::SmallVec;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;
use sylva_common::limits::INTERVAL_TREE_INLINE_FRAMES;
use tracing::trace;

type Link<T> = Option<Arc<Node<T>>>;

#[derive(Clone)]
struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
    /// 1 for a leaf.
    height: u32,
    /// Largest `span.end()` of any value in this subtree.
    max_end: u32,
}

impl<T> Node<T> {
    fn leaf<I: IntervalIntrospector<T>>(value: T, introspector: &I) -> Self {
        let max_end = introspector.span(&value).end();
        Node {
            value,
            left: None,
            right: None,
            height: 1,
            max_end,
        }
    }

    /// Recompute height and max end from the children.
    fn update<I: IntervalIntrospector<T>>(&mut self, introspector: &I) {
        self.height = 1 + height(&self.left).max(height(&self.right));
        let mut max_end = introspector.span(&self.value).end();
        if let Some(left) = &self.left {
            max_end = max_end.max(left.max_end);
        }
        if let Some(right) = &self.right {
            max_end = max_end.max(right.max_end);
        }
        self.max_end = max_end;
    }

    /// Left height minus right height.
    fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

#[inline]
fn height<T>(link: &Link<T>) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// Persistent interval tree. See the module docs.
pub struct IntervalTree<T> {
    root: Link<T>,
    len: usize,
}

impl<T> Clone for IntervalTree<T> {
    /// O(1): the clone shares every node with `self`.
    fn clone(&self) -> Self {
        IntervalTree {
            root: self.root.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for IntervalTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for IntervalTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> IntervalTree<T> {
    pub const fn new() -> Self {
        IntervalTree { root: None, len: 0 }
    }

    /// Number of values in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the root; 0 for an empty tree.
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// In-order iterator: ascending start, equal starts in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            stack: SmallVec::new(),
        };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Collect the values matching `test` among those whose spans could touch
    /// `[start, start + length]`, in tree order.
    ///
    /// `test` receives the value, the query start and length and the
    /// introspector. Returns the number of values appended to `out`; with
    /// `stop_after_first` the walk ends at the first match.
    pub fn fill_with_intervals_that_match<I, F>(
        &self,
        start: u32,
        length: u32,
        test: F,
        out: &mut Vec<T>,
        introspector: &I,
        stop_after_first: bool,
    ) -> usize
    where
        T: Clone,
        I: IntervalIntrospector<T>,
        F: Fn(&T, u32, u32, &I) -> bool,
    {
        let mut matches = 0;
        let _ = self.walk_candidates(start, length, introspector, |value| {
            if !test(value, start, length, introspector) {
                return ControlFlow::Continue(());
            }
            out.push(value.clone());
            matches += 1;
            if stop_after_first {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        matches
    }

    /// Whether any candidate value passes `test`. Stops at the first one.
    pub fn any<I, F>(&self, start: u32, length: u32, test: F, introspector: &I) -> bool
    where
        I: IntervalIntrospector<T>,
        F: Fn(&T, u32, u32, &I) -> bool,
    {
        self.walk_candidates(start, length, introspector, |value| {
            if test(value, start, length, introspector) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .is_break()
    }

    /// In-order walk over every node whose value could intersect
    /// `[start, end]`.
    ///
    /// A right subtree is entered only when the node itself starts at or
    /// before `end` (every start to its right is at least as large) and the
    /// subtree reaches `start`. A left subtree is entered only when it
    /// reaches `start`. Frames are `(node, first_visit)`: the first visit
    /// schedules the children around the node, the second one yields it.
    fn walk_candidates<'a, I, V>(
        &'a self,
        start: u32,
        length: u32,
        introspector: &I,
        mut visit: V,
    ) -> ControlFlow<()>
    where
        I: IntervalIntrospector<T>,
        V: FnMut(&'a T) -> ControlFlow<()>,
    {
        let Some(root) = self.root.as_deref() else {
            return ControlFlow::Continue(());
        };
        debug_assert!(
            start.checked_add(length).is_some(),
            "query end overflows u32: start={start}, length={length}"
        );
        let end = start.saturating_add(length);

        let mut stack: SmallVec<[(&'a Node<T>, bool); INTERVAL_TREE_INLINE_FRAMES]> = SmallVec::new();
        stack.push((root, true));

        while let Some((node, first_visit)) = stack.pop() {
            if !first_visit {
                visit(&node.value)?;
                continue;
            }
            // Pushed in reverse: left subtree, node, right subtree.
            if let Some(right) = node.right.as_deref()
                && right.max_end >= start
                && introspector.span(&node.value).start() <= end
            {
                stack.push((right, true));
            }
            stack.push((node, false));
            if let Some(left) = node.left.as_deref()
                && left.max_end >= start
            {
                stack.push((left, true));
            }
        }
        ControlFlow::Continue(())
    }
}

impl<T: Clone> IntervalTree<T> {
    /// Build a tree by inserting `values` in iteration order.
    pub fn create<I, V>(introspector: &I, values: V) -> Self
    where
        I: IntervalIntrospector<T>,
        V: IntoIterator<Item = T>,
    {
        let mut tree = IntervalTree::new();
        for value in values {
            tree.insert(value, introspector);
        }
        trace!(len = tree.len, height = tree.height(), "IntervalTree::create");
        tree
    }

    /// Insert `value`. Snapshots taken before the call are unaffected.
    pub fn insert<I: IntervalIntrospector<T>>(&mut self, value: T, introspector: &I) {
        let start = introspector.span(&value).start();
        self.root = Some(insert(self.root.take(), value, start, introspector));
        self.len += 1;
    }
}

fn insert<T: Clone, I: IntervalIntrospector<T>>(
    link: Link<T>,
    value: T,
    start: u32,
    introspector: &I,
) -> Arc<Node<T>> {
    let Some(mut node) = link else {
        return Arc::new(Node::leaf(value, introspector));
    };
    let n = Arc::make_mut(&mut node);
    // Ties go right so equal starts stay in insertion order.
    if start < introspector.span(&n.value).start() {
        n.left = Some(insert(n.left.take(), value, start, introspector));
    } else {
        n.right = Some(insert(n.right.take(), value, start, introspector));
    }
    n.update(introspector);
    balance(node, introspector)
}

fn balance<T: Clone, I: IntervalIntrospector<T>>(
    node: Arc<Node<T>>,
    introspector: &I,
) -> Arc<Node<T>> {
    match node.balance_factor() {
        -2 => {
            let right_balance = node.right.as_ref().map_or(0, |r| r.balance_factor());
            if right_balance == 1 {
                // Right-left case: rotate the right child right, then rotate left.
                let mut node = node;
                let n = Arc::make_mut(&mut node);
                n.right = n.right.take().map(|r| rotate_right(r, introspector));
                rotate_left(node, introspector)
            } else {
                rotate_left(node, introspector)
            }
        }
        2 => {
            let left_balance = node.left.as_ref().map_or(0, |l| l.balance_factor());
            if left_balance == -1 {
                let mut node = node;
                let n = Arc::make_mut(&mut node);
                n.left = n.left.take().map(|l| rotate_left(l, introspector));
                rotate_right(node, introspector)
            } else {
                rotate_right(node, introspector)
            }
        }
        _ => node,
    }
}

/// ```text
///   node                pivot
///   /  \                /   \
///  a   pivot    =>    node   c
///      /  \           /  \
///     b    c         a    b
/// ```
fn rotate_left<T: Clone, I: IntervalIntrospector<T>>(
    mut node: Arc<Node<T>>,
    introspector: &I,
) -> Arc<Node<T>> {
    let n = Arc::make_mut(&mut node);
    let Some(mut pivot) = n.right.take() else {
        return node;
    };
    let p = Arc::make_mut(&mut pivot);
    n.right = p.left.take();
    n.update(introspector);
    p.left = Some(node);
    p.update(introspector);
    pivot
}

/// ```text
///      node            pivot
///      /  \            /   \
///   pivot  c    =>    a    node
///   /  \                   /  \
///  a    b                 b    c
/// ```
fn rotate_right<T: Clone, I: IntervalIntrospector<T>>(
    mut node: Arc<Node<T>>,
    introspector: &I,
) -> Arc<Node<T>> {
    let n = Arc::make_mut(&mut node);
    let Some(mut pivot) = n.left.take() else {
        return node;
    };
    let p = Arc::make_mut(&mut pivot);
    n.left = p.right.take();
    n.update(introspector);
    p.right = Some(node);
    p.update(introspector);
    pivot
}

/// In-order iterator over an [`IntervalTree`].
pub struct Iter<'a, T> {
    stack: SmallVec<[&'a Node<T>; INTERVAL_TREE_INLINE_FRAMES]>,
}

impl<'a, T> Iter<'a, T> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.value)
    }
}

impl<'a, T> IntoIterator for &'a IntervalTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
#[path = "../tests/interval_tree_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "../tests/interval_tree_proptests.rs"]
mod proptests;
