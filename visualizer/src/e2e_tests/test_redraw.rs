//! The view redraws exactly when the tree's version moves.

use crate::btree::TreeSnapshot;
use crate::e2e_tests::helpers::TestSession;

#[test]
fn test_rendered_version_follows_mutations() {
    let mut t = TestSession::new();
    assert_eq!(t.session.rendered_version(), None);

    t.ok("insert 1");
    assert_eq!(
        t.session.rendered_version(),
        Some(t.session.tree().version())
    );

    t.ok("insert 2 3");
    assert_eq!(
        t.session.rendered_version(),
        Some(t.session.tree().version())
    );
}

#[test]
fn test_queries_do_not_redraw() {
    let mut t = TestSession::new();
    t.ok("insert 1 2 3");

    assert_eq!(t.ok("contains 2"), "2 is present");
    assert!(t.ok("stats").starts_with("keys=3 "));
    assert!(t.ok("help").starts_with("commands:"));
}

#[test]
fn test_show_is_idempotent() {
    let mut t = TestSession::with_order(4);
    t.ok("random 60 11");

    let first = t.ok("show");
    let second = t.ok("show");
    assert_eq!(first, second);
}

#[test]
fn test_json_session_renders_snapshot() {
    let mut t = TestSession::json();

    let output = t.ok("insert 10 20 30 40");
    let json = output
        .split_once("\ninserted 40\n")
        .map(|(_, rest)| rest)
        .expect("render follows insert lines");

    let snapshot: TreeSnapshot = serde_json::from_str(json).expect("valid snapshot json");
    assert_eq!(snapshot, t.session.tree().snapshot());
    assert_eq!(snapshot.root.keys, vec![20]);
}

#[test]
fn test_json_command_in_text_session() {
    let mut t = TestSession::new();
    t.ok("insert 3 1 2");

    let json = t.ok("json");
    let snapshot: TreeSnapshot = serde_json::from_str(&json).expect("valid snapshot json");
    assert_eq!(snapshot.root.keys, vec![1, 2, 3]);
    assert_eq!(snapshot.order, 3);
}
