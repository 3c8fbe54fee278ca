// tests/locator_tests.rs

use arbor_query::tree::{MemoryNode, Node};
use arbor_query::{CancellationFlag, Error, Locator, Predicate, filters, parse_filter};
use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// ```text
/// root
/// ├── a            (kind: page)
/// │   ├── a1       (kind: page)
/// │   └── a2       (kind: asset)
/// ├── b            (kind: asset)
/// └── c            (kind: page)
///     └── c1       (kind: page)
///         └── c11  (kind: page)
/// ```
fn tree() -> MemoryNode {
    let node = |name: &str, kind: &str| MemoryNode::builder(name).property("kind", kind);
    MemoryNode::builder("root")
        .property("kind", "page")
        .child(
            node("a", "page")
                .child(node("a1", "page"))
                .child(node("a2", "asset")),
        )
        .child(node("b", "asset"))
        .child(node("c", "page").child(node("c1", "page").child(node("c11", "page"))))
        .build()
}

fn names(nodes: &[MemoryNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.name()).collect()
}

fn pages() -> Predicate {
    parse_filter("[kind] == 'page'").unwrap()
}

// ============================================================================
// Visit order
// ============================================================================

#[test]
fn test_stream_is_depth_first_reverse_siblings() {
    let all: Vec<MemoryNode> = Locator::start_from(tree()).stream().collect();
    assert_eq!(names(&all), ["root", "c", "c1", "c11", "b", "a", "a2", "a1"]);
}

#[test]
fn test_locate_uses_stream_order() {
    let found = Locator::start_from(tree()).locate(&pages());
    assert_eq!(names(&found), ["root", "c", "c1", "c11", "a", "a1"]);
}

#[test]
fn test_start_node_is_candidate() {
    let start = tree().find("c").unwrap();
    let found = Locator::start_from(start).locate(&Predicate::always());
    assert_eq!(names(&found), ["c", "c1", "c11"]);
}

// ============================================================================
// Limit & range
// ============================================================================

#[test]
fn test_limit_returns_exactly_n() {
    for n in 0..=6 {
        let found = Locator::start_from(tree()).limit(n).unwrap().locate(&pages());
        assert_eq!(found.len(), n as usize, "Failed for limit {}", n);
    }
    let found = Locator::start_from(tree()).limit(3).unwrap().locate(&pages());
    assert_eq!(names(&found), ["root", "c", "c1"]);
}

#[test]
fn test_limit_larger_than_matches() {
    let found = Locator::start_from(tree()).limit(100).unwrap().locate(&pages());
    assert_eq!(found.len(), 6);
}

#[test]
fn test_range_skips_then_limits() {
    let found = Locator::start_from(tree()).range(2, 3).unwrap().locate(&pages());
    assert_eq!(names(&found), ["c1", "c11", "a"]);

    let found = Locator::start_from(tree()).range(5, 10).unwrap().locate(&pages());
    assert_eq!(names(&found), ["a1"]);

    let found = Locator::start_from(tree()).range(10, 10).unwrap().locate(&pages());
    assert!(found.is_empty());
}

#[test]
fn test_range_with_huge_limit_does_not_overflow() {
    let found = Locator::start_from(tree())
        .range(1, i64::MAX)
        .unwrap()
        .locate(&pages());
    assert_eq!(found.len(), 5);
}

#[test]
fn test_limit_resets_range_start() {
    let found = Locator::start_from(tree())
        .range(4, 1)
        .unwrap()
        .limit(2)
        .unwrap()
        .locate(&pages());
    assert_eq!(names(&found), ["root", "c"]);
}

#[test]
fn test_negative_arguments_fail_fast() {
    assert!(matches!(Locator::start_from(tree()).limit(-1), Err(Error::InvalidArgument(_))));
    assert!(matches!(Locator::start_from(tree()).range(-1, 1), Err(Error::InvalidArgument(_))));
    assert!(matches!(Locator::start_from(tree()).range(0, -1), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_limit_stops_evaluating() {
    let evaluated = Arc::new(AtomicUsize::new(0));
    let counter = evaluated.clone();
    let counting = Predicate::new(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
        true
    });

    let found = Locator::start_from(tree()).limit(2).unwrap().locate(&counting);
    assert_eq!(found.len(), 2);
    assert_eq!(evaluated.load(Ordering::Relaxed), 2);
}

// ============================================================================
// Traversal control
// ============================================================================

#[test]
fn test_traversal_control_false_keeps_only_root() {
    let found = Locator::start_from(tree())
        .traversal_control(Predicate::never())
        .locate(&Predicate::always());
    assert_eq!(names(&found), ["root"]);
}

#[test]
fn test_traversal_control_false_with_non_matching_root() {
    let found = Locator::start_from(tree())
        .traversal_control(Predicate::never())
        .locate(&parse_filter("[kind] == 'asset'").unwrap());
    assert!(found.is_empty());
}

#[test]
fn test_traversal_control_prunes_subtrees() {
    let found = Locator::start_from(tree())
        .traversal_control_expr("name() != 'c'")
        .unwrap()
        .locate(&pages());
    assert_eq!(names(&found), ["root", "a", "a1"]);
}

#[test]
fn test_traversal_control_by_depth() {
    let found = Locator::start_from(tree())
        .traversal_control(filters::depth_is_less_than(4))
        .locate(&Predicate::always());
    assert_eq!(names(&found), ["root", "c", "c1", "b", "a", "a2", "a1"]);
}

#[test]
fn test_traversal_control_expr_reports_parse_errors() {
    assert!(matches!(
        Locator::start_from(tree()).traversal_control_expr("name() ~ 'x'"),
        Err(Error::Parse(_))
    ));
}

#[test]
fn test_stream_respects_traversal_control() {
    let streamed: Vec<MemoryNode> = Locator::start_from(tree())
        .traversal_control(parse_filter("[kind] == 'page'").unwrap())
        .stream()
        .collect();
    assert_eq!(names(&streamed), ["root", "c", "c1", "c11", "a", "a1"]);
}

#[test]
fn test_stream_ignores_limit() {
    let streamed = Locator::start_from(tree()).limit(1).unwrap().stream().count();
    assert_eq!(streamed, 8);
}

// ============================================================================
// Modes
// ============================================================================

#[test]
fn test_callback_sees_same_nodes_as_collect() {
    let locator = Locator::start_from(tree()).range(1, 4).unwrap();
    let mut seen = Vec::new();
    locator.for_each(&pages(), |node| seen.push(node.path().to_string()));

    let collected: Vec<String> = locator
        .locate(&pages())
        .iter()
        .map(|n| n.path().to_string())
        .collect();
    assert_eq!(seen, collected);
    assert_eq!(seen, ["/root/c", "/root/c/c1", "/root/c/c1/c11", "/root/a"]);
}

#[test]
fn test_lazy_iteration_defers_children() {
    let expanded = Arc::new(AtomicUsize::new(0));
    let counter = expanded.clone();
    let counting_control = Predicate::new(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
        true
    });

    let locator = Locator::start_from(tree()).traversal_control(counting_control);
    let mut matches = locator.iter(&Predicate::always());

    let first = matches.next().unwrap();
    assert_eq!(first.name(), "root");
    // root's children are not looked at until the next pull
    assert_eq!(expanded.load(Ordering::Relaxed), 0);

    let second = matches.next().unwrap();
    assert_eq!(second.name(), "c");
    assert_eq!(expanded.load(Ordering::Relaxed), 3);
}

#[test]
fn test_lazy_iteration_can_stop_early() {
    let locator = Locator::start_from(tree());
    let first_asset = locator
        .iter(&parse_filter("[kind] == 'asset'").unwrap())
        .next()
        .map(|n| n.path().to_string());
    assert_eq!(first_asset.as_deref(), Some("/root/b"));
}

#[test]
fn test_iterator_is_fused() {
    let locator = Locator::start_from(tree()).limit(1).unwrap();
    let mut matches = locator.iter(&pages());
    assert!(matches.next().is_some());
    assert!(matches.next().is_none());
    assert!(matches.next().is_none());
}

#[test]
fn test_locator_is_reusable() {
    let locator = Locator::start_from(tree()).limit(2).unwrap();
    let first = locator.locate(&pages());
    let second = locator.locate(&pages());
    assert_eq!(names(&first), names(&second));
}

#[test]
fn test_locate_expr() {
    let found = Locator::start_from(tree()).locate_expr("[kind] == 'asset'").unwrap();
    assert_eq!(names(&found), ["b", "a2"]);
    assert!(Locator::start_from(tree()).locate_expr("[kind] ==").is_err());
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn test_cancel_from_callback() {
    let flag = CancellationFlag::new();
    let locator = Locator::start_from(tree()).with_cancellation(flag.clone());
    let seen = Cell::new(0);

    locator.for_each(&Predicate::always(), |_| {
        seen.set(seen.get() + 1);
        if seen.get() == 3 {
            flag.cancel();
        }
    });
    assert_eq!(seen.get(), 3);
}

#[test]
fn test_cancelled_before_start() {
    let flag = CancellationFlag::new();
    flag.cancel();
    let found = Locator::start_from(tree())
        .with_cancellation(flag)
        .locate(&Predicate::always());
    assert!(found.is_empty());
}
