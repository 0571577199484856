// Life of a command:
// 1. A line comes in from the user
// 2. Parse it into a Command (bad input stops here with an inline error)
// 3. Run it against the session's tree
// 4. If the tree's version moved, take a snapshot and render it
//
// Components:
//  - B-tree engine (arena of nodes, top-down splitting)
//  - Snapshot + renderers (text rows of key cells, JSON)
//  - Session (owns the tree, tracks the last drawn version)

pub mod btree;
pub mod config;
pub mod render;
pub mod session;
pub mod simulation;

#[cfg(test)]
mod e2e_tests;

pub use session::{Command, Response, Session};
