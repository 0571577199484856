//! Bad input yields an inline error and leaves the tree alone.

use crate::e2e_tests::helpers::TestSession;
use crate::session::Response;

#[test]
fn test_non_integer_key() {
    let mut t = TestSession::new();
    t.ok("insert 1 2");
    let version = t.session.tree().version();

    assert_eq!(t.err("insert 3 x"), "'x' is not an integer key");

    // Nothing from the rejected line was applied, not even the valid 3.
    assert_eq!(t.session.tree().keys(), vec![1, 2]);
    assert_eq!(t.session.tree().version(), version);
}

#[test]
fn test_key_out_of_range() {
    let mut t = TestSession::new();
    assert_eq!(
        t.err("insert 99999999999999999999"),
        "'99999999999999999999' is not an integer key"
    );
    assert!(t.session.tree().is_empty());
}

#[test]
fn test_unknown_command() {
    let mut t = TestSession::new();
    assert_eq!(t.err("delete 4"), "unknown command 'delete' (try 'help')");
}

#[test]
fn test_missing_and_extra_arguments() {
    let mut t = TestSession::new();
    assert_eq!(t.err("insert"), "insert: missing key");
    assert_eq!(t.err("contains"), "contains: missing key");
    assert_eq!(t.err("random"), "random: missing count");
    assert_eq!(t.err("show all"), "show: unexpected argument 'all'");
}

#[test]
fn test_random_over_cap() {
    let mut t = TestSession::new();
    assert_eq!(
        t.err("random 5000"),
        "cannot insert 5000 random keys at once (max 1000)"
    );
    assert!(t.session.tree().is_empty());
}

#[test]
fn test_blank_and_comment_lines() {
    let mut t = TestSession::new();
    assert_eq!(t.send(""), Response::Output(String::new()));
    assert_eq!(t.send("   "), Response::Output(String::new()));
    assert_eq!(t.send("# a comment"), Response::Output(String::new()));
}

#[test]
fn test_quit() {
    let mut t = TestSession::new();
    assert_eq!(t.send("quit"), Response::Quit);
    assert_eq!(t.send("EXIT"), Response::Quit);
}

#[test]
fn test_session_usable_after_error() {
    let mut t = TestSession::new();
    t.err("insert nope");
    assert_eq!(t.ok("insert 7"), "inserted 7\nL0  [7]");
}
