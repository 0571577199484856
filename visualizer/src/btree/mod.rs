//! In-memory B-tree used by the visualizer.
//!
//! # Structure
//!
//! The tree owns an arena of [`Node`]s addressed by [`NodeId`]. Each node
//! holds at most `order` sorted keys; internal nodes hold one more child
//! than keys. Insertion splits full nodes on the way down, so all leaves
//! stay at the same depth.
//!
//! # Usage
//!
//! ```
//! use visualizer::btree::{BTree, InsertOutcome};
//!
//! let mut tree = BTree::with_order(3).expect("order 3 is valid");
//! for key in [10, 20, 30, 40] {
//!     tree.insert(key);
//! }
//!
//! assert_eq!(tree.root().keys(), &[20]);
//! assert_eq!(tree.insert(30), InsertOutcome::Duplicate);
//! assert_eq!(tree.keys(), vec![10, 20, 30, 40]);
//! ```

mod node;
mod snapshot;
mod tree;

pub use node::{DEFAULT_ORDER, Key, MIN_ORDER, Node, NodeId, Order};
pub use snapshot::{NodeSnapshot, TreeSnapshot};
pub use tree::{BTree, BTreeError, InsertOutcome, StructuralViolation, Version};
