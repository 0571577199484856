//! Main simulator harness for deterministic simulation testing.
//!
//! Drives a tree with a seeded sequence of inserts and resets and checks
//! every invariant after each step.

use crate::btree::{BTree, Key, Order};

use super::invariants::{InvariantChecker, InvariantViolation, Operation, OperationHistory};
use super::key_gen::{KeyGenConfig, KeyGenerator};

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Order of the simulated tree.
    pub order: Order,
    /// Key generation configuration.
    pub key_config: KeyGenConfig,
    /// Probability that an operation is a reset instead of an insert.
    pub reset_rate: f64,
}

impl SimulatorConfig {
    /// Create a new simulator config with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            order: Order::default(),
            key_config: KeyGenConfig::default(),
            reset_rate: 0.0,
        }
    }

    /// Set the tree order.
    #[must_use]
    pub const fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Set the key configuration.
    #[must_use]
    pub const fn with_key_config(mut self, config: KeyGenConfig) -> Self {
        self.key_config = config;
        self
    }

    /// Set the reset rate.
    #[must_use]
    pub const fn with_reset_rate(mut self, rate: f64) -> Self {
        self.reset_rate = rate;
        self
    }
}

/// Results from a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The seed used for this simulation.
    pub seed: u64,
    /// Number of operations executed.
    pub operations: usize,
    /// Keys actually added.
    pub inserted: u64,
    /// Inserts ignored as duplicates.
    pub duplicates: u64,
    /// Resets executed.
    pub resets: u64,
    /// Tree height when the run finished.
    pub final_height: usize,
    /// Keys held when the run finished, in order.
    pub final_keys: Vec<Key>,
    /// Invariant violations detected.
    pub invariant_violations: Vec<InvariantViolation>,
    /// The operation during which the first violation was detected.
    pub first_failure: Option<Operation>,
}

impl SimulationResult {
    /// Check if the simulation passed (no invariant violations).
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }
}

/// The main simulator harness.
pub struct Simulator {
    config: SimulatorConfig,
    keys: KeyGenerator,
    history: OperationHistory,
    checker: InvariantChecker,
    tree: BTree,
}

impl Simulator {
    /// Create a new simulator with the given configuration.
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        let keys = KeyGenerator::with_config(config.seed, config.key_config.clone());
        let tree = BTree::new(config.order);
        Self {
            config,
            keys,
            history: OperationHistory::new(),
            checker: InvariantChecker::new(),
            tree,
        }
    }

    /// Run the simulation for a given number of operations.
    pub fn run(mut self, operation_count: usize) -> SimulationResult {
        tracing::debug!(
            seed = self.config.seed,
            order = %self.config.order,
            operation_count,
            "starting simulation"
        );

        for index in 0..operation_count {
            self.step(index);
        }

        let stats = self.history.stats();
        let first_failure = self
            .checker
            .violations()
            .first()
            .and_then(|v| self.history.operations().get(v.operation_index))
            .copied();
        let result = SimulationResult {
            seed: self.config.seed,
            operations: stats.total_operations,
            inserted: stats.inserted,
            duplicates: stats.duplicates,
            resets: stats.resets,
            final_height: self.tree.height(),
            final_keys: self.tree.keys(),
            invariant_violations: self.checker.into_violations(),
            first_failure,
        };

        if !result.passed() {
            tracing::warn!(
                seed = result.seed,
                violations = result.invariant_violations.len(),
                first_failure = ?result.first_failure,
                "simulation found invariant violations"
            );
        }
        result
    }

    fn step(&mut self, index: usize) {
        let before = self.tree.version();

        if self.keys.roll() < self.config.reset_rate {
            self.tree.reset();
            self.history.record_reset();
            self.checker.check_version(before, self.tree.version(), true, index);
        } else {
            let key = self.keys.next_key();
            let outcome = self.tree.insert(key);
            let expected_new = self.history.record_insert(key, outcome);
            self.checker.check_outcome(key, outcome, expected_new, index);
            self.checker.check_version(before, self.tree.version(), outcome.is_inserted(), index);
        }

        self.checker.check_structure(&self.tree, index);
        self.checker.check_contents(&self.tree, &self.history, index);
    }
}
