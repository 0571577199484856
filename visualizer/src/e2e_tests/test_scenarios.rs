//! Worked examples with order 3.

use crate::e2e_tests::helpers::TestSession;

#[test]
fn test_fourth_insert_splits_root() {
    let mut t = TestSession::new();

    let output = t.ok("insert 10 20 30 40");

    assert_eq!(
        output,
        "inserted 10\ninserted 20\ninserted 30\ninserted 40\nL0  [20]\nL1  [10] [30|40]"
    );
    assert_eq!(t.root_keys(), vec![20]);
    assert_eq!(t.leaves(), vec![vec![10], vec![30, 40]]);
    t.assert_valid();
}

#[test]
fn test_single_insert_no_split() {
    let mut t = TestSession::new();

    assert_eq!(t.ok("insert 5"), "inserted 5\nL0  [5]");
    assert!(t.session.tree().root().is_leaf());
}

#[test]
fn test_one_to_seven_ascending() {
    let mut t = TestSession::new();
    for key in 1..=7 {
        t.ok(&format!("insert {key}"));
    }

    let tree = t.session.tree();
    assert_eq!(tree.height(), 2);
    assert_eq!(t.root_keys().len(), 2);
    assert!(t.leaves().iter().all(|leaf| leaf.len() <= 3));
    assert_eq!(tree.keys(), (1..=7).collect::<Vec<_>>());
    t.assert_valid();
}

#[test]
fn test_one_at_a_time_matches_batch() {
    let mut batch = TestSession::new();
    batch.ok("insert 8 3 11 1 6 14 4 7 13 2");

    let mut single = TestSession::new();
    for key in [8, 3, 11, 1, 6, 14, 4, 7, 13, 2] {
        single.ok(&format!("insert {key}"));
    }

    assert_eq!(batch.ok("show"), single.ok("show"));
}

#[test]
fn test_larger_order() {
    let mut t = TestSession::with_order(5);
    assert_eq!(t.session.config().order.get(), 5);
    t.ok("insert 1 2 3 4 5");
    assert_eq!(t.root_keys(), vec![1, 2, 3, 4, 5]);

    t.ok("insert 6");
    assert_eq!(t.root_keys(), vec![3]);
    assert_eq!(t.leaves(), vec![vec![1, 2], vec![4, 5, 6]]);
    t.assert_valid();
}

#[test]
fn test_contains_and_check() {
    let mut t = TestSession::new();
    t.ok("insert 4 8 15 16 23 42");

    assert_eq!(t.ok("contains 15"), "15 is present");
    assert_eq!(t.ok("contains 7"), "7 is absent");
    assert_eq!(t.ok("check"), "ok: all invariants hold");
}

#[test]
fn test_stats() {
    let mut t = TestSession::new();
    assert_eq!(t.ok("stats"), "keys=0 nodes=1 height=1 order=3 version=v0");

    t.ok("insert 10 20 30 40");
    assert_eq!(t.ok("stats"), "keys=4 nodes=3 height=2 order=3 version=v4");
}
