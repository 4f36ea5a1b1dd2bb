use super::*;

const IDENT: RawKind = RawKind(10);
const PLUS: RawKind = RawKind(11);
const OPEN_PAREN: RawKind = RawKind(12);
const CLOSE_PAREN: RawKind = RawKind(13);
const BINARY: RawKind = RawKind(20);
const PAREN_EXPR: RawKind = RawKind(21);
const CALL_ARGS: RawKind = RawKind(22);

#[test]
fn test_tokens_are_deduplicated_by_kind_flags_and_text() {
    let store = GreenStore::new();
    let a1 = store.token(IDENT, "a");
    let a2 = store.token(IDENT, "a");
    let b = store.token(IDENT, "b");
    let plus_a = store.token(PLUS, "a");
    let async_a = store.token_with_flags(
        IDENT,
        NodeFlags::default_node_flags() | NodeFlags::IN_ASYNC_CONTEXT,
        "a",
    );

    assert_eq!(a1, a2);
    assert_ne!(a1, b);
    assert_ne!(a1, plus_a);
    assert_ne!(a1, async_a);
    assert_eq!(store.get(a1).unwrap().text(), Some("a"));
}

#[test]
fn test_missing_tokens_are_never_shared() {
    let store = GreenStore::new();
    let m1 = store.missing_token(CLOSE_PAREN);
    let m2 = store.missing_token(CLOSE_PAREN);
    assert_ne!(m1, m2);

    let m1 = store.get(m1).unwrap();
    assert!(m1.is_missing());
    assert_eq!(m1.width(), 0);
}

#[test]
fn test_node_reuses_cached_node() {
    let store = GreenStore::new();
    let a = store.token(IDENT, "a");
    let plus = store.token(PLUS, "+");
    let b = store.token(IDENT, "b");

    let first = store.node_default(BINARY, &[Some(a), Some(plus), Some(b)]);
    let second = store.node_default(BINARY, &[Some(a), Some(plus), Some(b)]);
    assert_eq!(first, second);

    let node = store.get(first).unwrap();
    assert_eq!(node.width(), 3);
    assert_eq!(store.text(first), "a+b");

    let stats = store.cache().stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[test]
fn test_nested_nodes_reuse_bottom_up() {
    let store = GreenStore::new();
    let build = || {
        let open = store.token(OPEN_PAREN, "(");
        let x = store.token(IDENT, "x");
        let close = store.token(CLOSE_PAREN, ")");
        let inner = store.node_default(PAREN_EXPR, &[Some(open), Some(x), Some(close)]);
        store.node_default(PAREN_EXPR, &[Some(open), Some(inner), Some(close)])
    };
    let first = build();
    let second = build();
    assert_eq!(first, second);
    assert_eq!(store.text(first), "((x))");
}

#[test]
fn test_wide_nodes_are_built_fresh() {
    let store = GreenStore::new();
    let args: Vec<GreenId> = ["a", ",", "b", ",", "c"]
        .iter()
        .map(|t| store.token(IDENT, t))
        .collect();

    let first = store.list(&args);
    let second = store.list(&args);
    assert_ne!(first, second);
    assert_eq!(store.get(first).unwrap().kind(), RawKind::LIST);
    assert_eq!(store.text(first), "a,b,c");

    let wrapped = store.node_default(CALL_ARGS, &[Some(first)]);
    let wrapped_again = store.node_default(CALL_ARGS, &[Some(first)]);
    assert_ne!(wrapped, wrapped_again, "a wide child makes the parent ineligible");
}

#[test]
fn test_missing_child_blocks_caching() {
    let store = GreenStore::new();
    let open = store.token(OPEN_PAREN, "(");
    let x = store.token(IDENT, "x");
    let missing = store.missing_token(CLOSE_PAREN);

    let first = store.node_default(PAREN_EXPR, &[Some(open), Some(x), Some(missing)]);
    let second = store.node_default(PAREN_EXPR, &[Some(open), Some(x), Some(missing)]);
    assert_ne!(first, second);
    assert_eq!(store.get(first).unwrap().width(), 2);
}

#[test]
fn test_decorations_propagate_and_disable_caching() {
    let store = GreenStore::new();
    let x = store.token(IDENT, "x");
    let bad = store.with_diagnostics(x, vec![GreenDiagnostic::new(1005, "expected ')'", 1, 0)]);
    assert_ne!(bad, x);

    let bad_node = store.get(bad).unwrap();
    assert!(bad_node.flags().contains(NodeFlags::HAS_DIAGNOSTICS));
    assert_eq!(bad_node.diagnostics()[0].code, 1005);
    assert_eq!(bad_node.text(), Some("x"));

    let parent = store.node_default(PAREN_EXPR, &[Some(bad)]);
    let parent_node = store.get(parent).unwrap();
    assert!(parent_node.flags().contains(NodeFlags::CONTAINS_DIAGNOSTICS));
    assert!(!parent_node.flags().contains(NodeFlags::HAS_DIAGNOSTICS));
    assert_ne!(parent, store.node_default(PAREN_EXPR, &[Some(bad)]));

    let annotated = store.with_annotations(x, vec![SyntaxAnnotation::new()]);
    let grand = store.node_default(BINARY, &[Some(annotated)]);
    assert!(
        store
            .get(grand)
            .unwrap()
            .flags()
            .contains(NodeFlags::CONTAINS_ANNOTATIONS)
    );
}

#[test]
fn test_decoration_flags_passed_to_node_are_ignored() {
    let store = GreenStore::new();
    let x = store.token(IDENT, "x");
    let flags = NodeFlags::default_node_flags() | NodeFlags::HAS_DIAGNOSTICS;
    let first = store.node(PAREN_EXPR, flags, &[Some(x)]);
    assert_eq!(first, store.node_default(PAREN_EXPR, &[Some(x)]));
    assert!(!store.get(first).unwrap().flags().is_decorated());
}

#[test]
fn test_decorating_unknown_id_is_identity() {
    let store = GreenStore::new();
    assert_eq!(store.with_diagnostics(GreenId(77), vec![]), GreenId(77));
    assert_eq!(store.with_annotations(GreenId::NONE, vec![]), GreenId::NONE);
}

#[test]
fn test_with_config() {
    let store = GreenStore::with_config(&NodeCacheConfig::with_size_bits(8)).unwrap();
    assert_eq!(store.cache().capacity(), 256);
    assert!(GreenStore::with_config(&NodeCacheConfig::with_size_bits(0)).is_err());
}

#[test]
fn test_global_store_is_shared() {
    let a = GreenStore::global();
    let b = GreenStore::global();
    assert!(std::ptr::eq(a, b));
    assert_eq!(a.token(IDENT, "global"), b.token(IDENT, "global"));
}

#[test]
fn test_instances_have_distinct_ids() {
    assert_ne!(GreenStore::new().instance_id(), GreenStore::new().instance_id());
}
