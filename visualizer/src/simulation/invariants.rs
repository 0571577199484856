//! Invariant checking for deterministic simulation testing.
//!
//! The history keeps a model of what the tree should contain; the checker
//! compares the real tree against that model after every operation.

use std::collections::BTreeSet;

use crate::btree::{BTree, InsertOutcome, Key, Version};

/// A recorded operation in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// An insert and what the tree reported.
    Insert { key: Key, outcome: InsertOutcome },
    /// A reset.
    Reset,
}

/// Tracks the history of operations and the expected key set.
#[derive(Debug, Default)]
pub struct OperationHistory {
    operations: Vec<Operation>,
    expected: BTreeSet<Key>,
    inserted: u64,
    duplicates: u64,
    resets: u64,
}

impl OperationHistory {
    /// Create a new empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an insert.
    ///
    /// Returns whether the model expected the key to be new.
    pub fn record_insert(&mut self, key: Key, outcome: InsertOutcome) -> bool {
        let expected_new = self.expected.insert(key);
        if outcome.is_inserted() {
            self.inserted += 1;
        } else {
            self.duplicates += 1;
        }
        self.operations.push(Operation::Insert { key, outcome });
        expected_new
    }

    /// Record a reset.
    pub fn record_reset(&mut self) {
        self.expected.clear();
        self.resets += 1;
        self.operations.push(Operation::Reset);
    }

    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Every operation recorded so far, in order.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The keys the tree should hold right now.
    #[must_use]
    pub const fn expected(&self) -> &BTreeSet<Key> {
        &self.expected
    }

    /// Get statistics.
    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            total_operations: self.operations.len(),
            inserted: self.inserted,
            duplicates: self.duplicates,
            resets: self.resets,
            expected_keys: self.expected.len(),
        }
    }
}

/// Statistics about the operation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_operations: usize,
    pub inserted: u64,
    pub duplicates: u64,
    pub resets: u64,
    pub expected_keys: usize,
}

/// An invariant violation detected during simulation.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violation.
    pub description: String,
    /// Operation index where it was detected.
    pub operation_index: usize,
    /// Additional context.
    pub context: String,
}

/// Checker for tree invariants.
#[derive(Debug, Default)]
pub struct InvariantChecker {
    violations: Vec<InvariantViolation>,
}

impl InvariantChecker {
    /// Create a new invariant checker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Get all violations.
    #[must_use]
    pub fn violations(&self) -> &[InvariantViolation] {
        &self.violations
    }

    /// Consume the checker and return its violations.
    #[must_use]
    pub fn into_violations(self) -> Vec<InvariantViolation> {
        self.violations
    }

    /// Check if any violations were detected.
    #[must_use]
    pub const fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Report every structural violation the tree finds in itself.
    pub fn check_structure(&mut self, tree: &BTree, operation_index: usize) {
        for violation in tree.check_invariants() {
            self.violations.push(InvariantViolation {
                description: "Structural invariant broken".to_string(),
                operation_index,
                context: violation.to_string(),
            });
        }
    }

    /// Check that an in-order walk of the tree yields exactly the model.
    pub fn check_contents(
        &mut self,
        tree: &BTree,
        history: &OperationHistory,
        operation_index: usize,
    ) {
        let actual = tree.keys();
        let expected: Vec<Key> = history.expected().iter().copied().collect();
        if actual != expected {
            let missing: Vec<Key> = expected
                .iter()
                .filter(|&&k| actual.binary_search(&k).is_err())
                .copied()
                .collect();
            self.violations.push(InvariantViolation {
                description: "Tree contents differ from model".to_string(),
                operation_index,
                context: format!(
                    "expected {} keys, found {}; missing {missing:?}",
                    expected.len(),
                    actual.len()
                ),
            });
        }
    }

    /// Check that an insert reported what the model predicted.
    pub fn check_outcome(
        &mut self,
        key: Key,
        outcome: InsertOutcome,
        expected_new: bool,
        operation_index: usize,
    ) {
        if outcome.is_inserted() != expected_new {
            self.violations.push(InvariantViolation {
                description: "Insert outcome disagrees with model".to_string(),
                operation_index,
                context: format!("key {key}: got {outcome:?}, expected new = {expected_new}"),
            });
        }
    }

    /// Check that the version moved exactly when the tree changed.
    pub fn check_version(
        &mut self,
        before: Version,
        after: Version,
        mutated: bool,
        operation_index: usize,
    ) {
        let ok = if mutated {
            after == before.next()
        } else {
            after == before
        };
        if !ok {
            self.violations.push(InvariantViolation {
                description: "Version did not track mutation".to_string(),
                operation_index,
                context: format!("before {before}, after {after}, mutated {mutated}"),
            });
        }
    }
}
