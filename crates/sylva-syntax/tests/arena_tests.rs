use super::*;
use crate::flags::{NodeFlags, RawKind};

fn token(text: &str) -> GreenNodeData {
    GreenNodeData::token(RawKind(5), NodeFlags::default_node_flags(), Arc::from(text))
}

#[test]
fn test_alloc_and_get() {
    let arena = GreenArena::new();
    assert!(arena.is_empty());

    let a = arena.alloc(token("a"));
    let b = arena.alloc(token("bb"));
    assert_ne!(a, b);
    assert_eq!(arena.len(), 2);

    assert_eq!(arena.get(a).unwrap().text(), Some("a"));
    assert_eq!(arena.get(b).unwrap().width(), 2);
}

#[test]
fn test_equal_data_gets_distinct_ids() {
    // The arena does not deduplicate; that is the store's job.
    let arena = GreenArena::new();
    let a = arena.alloc(token("same"));
    let b = arena.alloc(token("same"));
    assert_ne!(a, b);
}

#[test]
fn test_unknown_ids() {
    let arena = GreenArena::new();
    assert!(arena.get(GreenId::NONE).is_none());
    assert!(arena.get(GreenId(0)).is_none());
    assert!(!arena.contains(GreenId(1 << SHARD_BITS)));

    let id = arena.alloc(token("x"));
    assert!(arena.contains(id));
}

#[test]
fn test_id_packing() {
    let id = make_id(5, 3);
    assert_eq!(id.0 as usize & SHARD_MASK, 3);
    assert_eq!(id.0 >> SHARD_BITS, 5);

    let largest = make_id(MAX_SHARD_LOCAL_INDEX, SHARD_MASK as u32);
    assert!(!largest.is_none());
}

#[test]
fn test_many_allocations_spread_over_shards() {
    let arena = GreenArena::new();
    let ids: Vec<GreenId> = (0..1000).map(|i| arena.alloc(token(&i.to_string()))).collect();
    assert_eq!(arena.len(), 1000);

    let shards: std::collections::HashSet<usize> =
        ids.iter().map(|id| id.0 as usize & SHARD_MASK).collect();
    assert!(shards.len() > 1);

    for (i, id) in ids.iter().enumerate() {
        assert_eq!(arena.get(*id).unwrap().text(), Some(i.to_string().as_str()));
    }
}
