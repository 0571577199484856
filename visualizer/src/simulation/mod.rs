//! Deterministic simulation of tree sessions.
//!
//! # Design Principles
//!
//! 1. All randomness is seeded for reproducibility
//! 2. Invariants are checked after every single operation
//! 3. Given the same seed, execution is identical
//!
//! # Usage
//!
//! ```
//! use visualizer::simulation::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::new(12345).with_reset_rate(0.01);
//! let result = Simulator::new(config).run(200);
//!
//! assert!(result.passed());
//! ```

mod invariants;
mod key_gen;
mod simulator;

pub use invariants::{
    HistoryStats, InvariantChecker, InvariantViolation, Operation, OperationHistory,
};
pub use key_gen::{KeyGenConfig, KeyGenerator};
pub use simulator::{SimulationResult, Simulator, SimulatorConfig};
