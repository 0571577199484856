//! B-tree node types.
//!
//! Nodes live in the tree's arena and refer to their children by [`NodeId`].
//! A node with no children is a leaf; an internal node always has one more
//! child than it has keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::btree::tree::BTreeError;

/// A key stored in the tree.
pub type Key = i64;

/// Smallest order that still leaves both halves non-empty after a split.
pub const MIN_ORDER: usize = 3;

/// Order used when nothing else is configured.
pub const DEFAULT_ORDER: usize = 3;

/// Identity of a node.
///
/// Ids are handed out from a monotonic counter and are never reused for the
/// lifetime of a tree, including across resets. Renderers use them as stable
/// keys for each drawn node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Maximum number of keys a node may hold before it must split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order(usize);

impl Order {
    /// Validate and wrap an order.
    ///
    /// # Errors
    ///
    /// Returns `BTreeError::InvalidOrder` if `order` is below [`MIN_ORDER`].
    pub const fn new(order: usize) -> Result<Self, BTreeError> {
        if order < MIN_ORDER {
            return Err(BTreeError::InvalidOrder(order));
        }
        Ok(Self(order))
    }

    /// The raw key limit.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Index of the key promoted out of a full node.
    #[must_use]
    pub const fn mid(self) -> usize {
        self.0 / 2
    }
}

impl Default for Order {
    fn default() -> Self {
        Self(DEFAULT_ORDER)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single B-tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) id: NodeId,
    /// Keys in strictly ascending order.
    pub(crate) keys: Vec<Key>,
    /// Child handles. Empty for leaves, otherwise `keys.len() + 1` long.
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    /// Create an empty leaf.
    #[must_use]
    pub const fn new(id: NodeId) -> Self {
        Self {
            id,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty() is not const-stable
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if the node has reached the key limit and must split before
    /// anything descends through it.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_full(&self, order: Order) -> bool {
        self.keys.len() >= order.get()
    }

    /// Find the child index whose range contains `key`.
    ///
    /// Scans left to right and stops at the first key greater than `key`;
    /// falls through to the last child.
    #[must_use]
    pub fn find_child_index(&self, key: Key) -> usize {
        self.keys
            .iter()
            .position(|&k| key < k)
            .unwrap_or(self.keys.len())
    }

    /// Check whether this node itself holds `key`.
    #[must_use]
    pub fn holds(&self, key: Key) -> bool {
        self.keys.binary_search(&key).is_ok()
    }

    /// Insert a key at its sorted position.
    ///
    /// Walks from the end and shifts every larger key one slot right.
    pub fn insert_sorted(&mut self, key: Key) {
        let mut i = self.keys.len();
        self.keys.push(key);
        while i > 0 && self.keys[i - 1] > key {
            self.keys[i] = self.keys[i - 1];
            i -= 1;
        }
        self.keys[i] = key;
    }

    /// Split a full node around `order.mid()`.
    ///
    /// Returns the promoted key and the keys and children that belong to the
    /// new right sibling. `self` keeps everything before the promoted key.
    #[must_use]
    pub fn split_off(&mut self, order: Order) -> (Key, Vec<Key>, Vec<NodeId>) {
        let mid = order.mid();

        let right_keys: Vec<Key> = self.keys.drain(mid + 1..).collect();
        let right_children: Vec<NodeId> = if self.is_leaf() {
            Vec::new()
        } else {
            self.children.drain(mid + 1..).collect()
        };

        // Only the promoted key is left past the boundary.
        let promoted = self.keys.remove(mid);

        (promoted, right_keys, right_children)
    }
}
