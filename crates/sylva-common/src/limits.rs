//! Centralized limits and sizing constants.
//!
//! Every tunable size used by the node cache, the green arena and the
//! interval tree lives here so the values stay consistent between the crates
//! that share them.
//!
//! # Categories
//!
//! - **Node cache sizing**: table size and eligibility thresholds
//! - **Sharding**: shard layout of the green arena
//! - **Traversal**: scratch sizes for interval tree walks

// =============================================================================
// Node Cache Sizing
// =============================================================================

/// Default number of bits used to index the node cache.
///
/// The cache is a direct-mapped table of `1 << NODE_CACHE_SIZE_BITS` slots.
/// Each slot is a single `u64`, so the default table occupies 512 KiB.
///
/// # How it works
///
/// ```text
/// cache_hash(kind, flags, children) = 0b0...1011_0110_1100_0101
///                                              ^^^^^^^^^^^^^^^^^^^
///                                  slot index = lower 16 bits
/// ```
pub const NODE_CACHE_SIZE_BITS: u32 = 16;

/// Smallest accepted node cache size (in bits).
///
/// A table smaller than this evicts on nearly every insert and is never
/// useful, even for tests.
pub const MIN_NODE_CACHE_SIZE_BITS: u32 = 4;

/// Largest accepted node cache size (in bits).
///
/// Cache hashes are 31 bits wide, so indexing with more than 30 bits would
/// leave slots that can never be addressed.
pub const MAX_NODE_CACHE_SIZE_BITS: u32 = 30;

/// Maximum number of child slots a node may have and still be cached.
///
/// Small shapes (tokens wrapped in a node, short lists, binary expressions)
/// are by far the most common nodes produced by a parser. Larger nodes are
/// always allocated fresh.
///
/// ```text
/// ParenthesizedExpression  ( expr )      3 slots  -> cached
/// BinaryExpression         a + b         3 slots  -> cached
/// ArgumentList             (a, b, c)     7 slots  -> never cached
/// ```
pub const MAX_CACHED_CHILDREN: usize = 3;

// =============================================================================
// Sharding Constants
// =============================================================================
// Used by the green arena to spread concurrent allocation across locks.

/// Number of bits for shard indexing.
///
/// With 6 bits the green arena has 64 shards, each behind its own lock, so
/// parser threads allocating different nodes rarely contend.
pub const SHARD_BITS: u32 = 6;

/// Number of shards (2^SHARD_BITS = 64).
pub const SHARD_COUNT: usize = 1 << SHARD_BITS;

/// Mask for extracting shard index (SHARD_COUNT - 1 = 63 = 0b111111).
pub const SHARD_MASK: usize = SHARD_COUNT - 1;

/// Largest local index a single shard can hand out.
///
/// A `GreenId` packs the shard index into its low [`SHARD_BITS`] bits and the
/// local index into the rest; `u32::MAX` itself is reserved as a sentinel.
pub const MAX_SHARD_LOCAL_INDEX: u32 = (u32::MAX >> SHARD_BITS) - 1;

/// Largest width a token or node can have.
///
/// Offsets and widths are `u32`, so a document must fit in 4 GiB. Longer
/// token text is clamped to this width, which shifts every later offset;
/// debug builds assert instead.
pub const MAX_TOKEN_WIDTH: u32 = u32::MAX;

// =============================================================================
// Traversal
// =============================================================================

/// Inline capacity of the explicit stack used by interval tree queries.
///
/// An AVL tree with `n` nodes has height at most `1.44 * log2(n + 2)`, so a
/// tree indexing `u32` offsets never exceeds a height of 47. An in-order walk
/// keeps at most two pending frames per level plus the current one, which
/// fits in 96 frames. Queries therefore never touch the heap for scratch.
pub const INTERVAL_TREE_INLINE_FRAMES: usize = 96;
