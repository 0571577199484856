//! Seeded random fills.

use crate::e2e_tests::helpers::TestSession;

#[test]
fn test_random_fill_is_valid() {
    let mut t = TestSession::new();

    let output = t.ok("random 200 7");

    assert!(output.starts_with("inserted "), "{output}");
    assert!(output.contains("of 200 random keys (seed 7)"), "{output}");
    assert!(t.session.tree().len() <= 200);
    assert!(t.session.tree().len() > 0);
    t.assert_valid();
}

#[test]
fn test_same_seed_same_tree() {
    let mut a = TestSession::new();
    let mut b = TestSession::new();

    a.ok("random 100 42");
    b.ok("random 100 42");

    assert_eq!(a.session.tree().keys(), b.session.tree().keys());
    assert_eq!(a.ok("show"), b.ok("show"));
}

#[test]
fn test_random_zero_changes_nothing() {
    let mut t = TestSession::new();
    t.ok("show");

    assert_eq!(t.ok("random 0 1"), "inserted 0 of 0 random keys (seed 1)");
    assert!(t.session.tree().is_empty());
}

#[test]
fn test_random_fill_with_larger_order() {
    let mut t = TestSession::with_order(6);
    t.ok("random 500 3");
    t.assert_valid();
    assert_eq!(t.ok("check"), "ok: all invariants hold");
}
