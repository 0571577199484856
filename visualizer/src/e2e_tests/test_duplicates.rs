//! Inserting a key that is already present is reported and ignored.

use crate::e2e_tests::helpers::TestSession;

#[test]
fn test_duplicate_in_same_line() {
    let mut t = TestSession::new();

    let output = t.ok("insert 10 20 10");

    assert_eq!(
        output,
        "inserted 10\ninserted 20\n10 already present\nL0  [10|20]"
    );
    assert_eq!(t.session.tree().len(), 2);
}

#[test]
fn test_duplicate_only_does_not_redraw() {
    let mut t = TestSession::new();
    t.ok("insert 10 20 30 40");
    let version = t.session.tree().version();

    assert_eq!(t.ok("insert 30"), "30 already present");
    assert_eq!(t.session.tree().version(), version);
    assert_eq!(t.leaves(), vec![vec![10], vec![30, 40]]);
}

#[test]
fn test_duplicate_promoted_key() {
    let mut t = TestSession::new();
    t.ok("insert 10 20 30 40");

    // 20 lives in the root, not a leaf.
    assert_eq!(t.ok("insert 20"), "20 already present");
    assert_eq!(t.session.tree().keys(), vec![10, 20, 30, 40]);
    t.assert_valid();
}
