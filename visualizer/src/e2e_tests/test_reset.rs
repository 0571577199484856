//! Reset returns the session to a single empty leaf.

use crate::e2e_tests::helpers::TestSession;

#[test]
fn test_reset_after_inserts() {
    let mut t = TestSession::new();
    for key in 1..=10 {
        t.ok(&format!("insert {key}"));
    }

    assert_eq!(t.ok("reset"), "tree reset\nL0  []");

    let tree = t.session.tree();
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.node_count(), 1);
    assert!(tree.root().is_leaf());
    assert_eq!(t.ok("contains 5"), "5 is absent");
    assert_eq!(t.ok("stats"), "keys=0 nodes=1 height=1 order=3 version=v11");
}

#[test]
fn test_reset_empty_tree() {
    let mut t = TestSession::new();
    assert_eq!(t.ok("reset"), "tree reset\nL0  []");
    assert!(t.session.tree().is_empty());
}

#[test]
fn test_insert_after_reset() {
    let mut t = TestSession::new();
    t.ok("insert 10 20 30 40");
    t.ok("reset");

    assert_eq!(
        t.ok("insert 10 20 30 40"),
        "inserted 10\ninserted 20\ninserted 30\ninserted 40\nL0  [20]\nL1  [10] [30|40]"
    );
    t.assert_valid();
}
