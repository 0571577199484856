//! In-memory B-tree with proactive top-down splitting.
//!
//! Nodes are stored in an arena owned by the tree and addressed by
//! [`NodeId`]. Insertion makes a single pass from the root to a leaf: any
//! full node met on the way down is split before the descent continues, so a
//! split never has to travel back up the tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::btree::node::{Key, Node, NodeId, Order};

/// Mutation counter.
///
/// Every successful mutation advances the version by one. Views compare the
/// version they last drew against the current one to decide whether to
/// redraw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(pub u64);

impl Version {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Result of an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was added; the tree is now at `version`.
    Inserted { version: Version },
    /// The key was already present. Nothing changed.
    Duplicate,
}

impl InsertOutcome {
    #[must_use]
    pub const fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted { .. })
    }
}

/// A B-tree of integer keys.
///
/// Nodes live in an arena owned by the tree. The order is fixed at
/// construction and every mutation advances the version by one.
///
/// # Post-conditions
///
/// After every public operation:
/// - Keys within each node are strictly ascending
/// - No node holds more than `order` keys
/// - Every internal node has one more child than it has keys
/// - All leaves sit at the same depth
/// - No key appears twice
#[derive(Debug, Clone)]
pub struct BTree {
    /// Arena. The node with id `base + i` lives at slot `i`.
    nodes: Vec<Node>,
    /// Id of the node in slot 0.
    base: u64,
    /// Next id to hand out. Never decreases.
    next_id: u64,
    root: NodeId,
    order: Order,
    /// Number of keys stored.
    len: usize,
    version: Version,
}

impl Default for BTree {
    fn default() -> Self {
        Self::new(Order::default())
    }
}

impl BTree {
    /// Create an empty tree whose root is an empty leaf.
    #[must_use]
    pub fn new(order: Order) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            base: 0,
            next_id: 0,
            root: NodeId(0),
            order,
            len: 0,
            version: Version::default(),
        };
        tree.root = tree.allocate();
        tree
    }

    /// Create an empty tree with a raw order value.
    ///
    /// # Errors
    ///
    /// Returns `BTreeError::InvalidOrder` if `order` is too small to split.
    pub fn with_order(order: usize) -> Result<Self, BTreeError> {
        Ok(Self::new(Order::new(order)?))
    }

    #[must_use]
    pub const fn order(&self) -> Order {
        self.order
    }

    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    #[must_use]
    pub const fn root_id(&self) -> NodeId {
        self.root
    }

    /// Number of keys in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes currently allocated. No node is ever orphaned, so this
    /// is also the number of reachable nodes.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of levels, counting the root. An empty tree has height 1.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.node_at(self.root);
        while let Some(&first) = current.children.first() {
            height += 1;
            current = self.node_at(first);
        }
        height
    }

    /// Look up a node by id.
    ///
    /// Returns `None` for ids that were never handed out or that were
    /// discarded by a reset.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = usize::try_from(id.0.checked_sub(self.base)?).ok()?;
        self.nodes.get(slot)
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        self.node_at(self.root)
    }

    /// Check whether `key` is stored anywhere in the tree.
    #[must_use]
    pub fn contains(&self, key: Key) -> bool {
        let mut current = self.node_at(self.root);
        loop {
            if current.holds(key) {
                return true;
            }
            if current.is_leaf() {
                return false;
            }
            current = self.node_at(current.children[current.find_child_index(key)]);
        }
    }

    /// All keys in ascending order.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        let mut out = Vec::with_capacity(self.len);
        self.collect_keys(self.root, &mut out);
        out
    }

    fn collect_keys(&self, id: NodeId, out: &mut Vec<Key>) {
        let node = self.node_at(id);
        if node.is_leaf() {
            out.extend_from_slice(&node.keys);
            return;
        }
        for (i, &child) in node.children.iter().enumerate() {
            self.collect_keys(child, out);
            if let Some(&key) = node.keys.get(i) {
                out.push(key);
            }
        }
    }

    /// Insert a key.
    ///
    /// Splits a full root first, then walks down splitting every full child
    /// before entering it, and finally places the key in a leaf. Inserting a
    /// key that is already present leaves the tree and its version untouched.
    ///
    /// # Pre-conditions
    ///
    /// - The tree satisfies its structural invariants
    ///
    /// # Post-conditions
    ///
    /// - `contains(key)` is true
    /// - On `Inserted`, `len()` grew by one and the version advanced by one
    /// - On `Duplicate`, nothing changed
    /// - Height grew by at most one
    pub fn insert(&mut self, key: Key) -> InsertOutcome {
        if self.contains(key) {
            tracing::debug!(key, "ignoring duplicate key");
            return InsertOutcome::Duplicate;
        }

        if self.node_at(self.root).is_full(self.order) {
            self.grow_root();
        }

        let mut current = self.root;
        loop {
            let node = self.node_at(current);
            if node.is_leaf() {
                break;
            }

            let mut index = node.find_child_index(key);
            let child = node.children[index];
            if self.node_at(child).is_full(self.order) {
                self.split_full_child(current, index);
                // The promoted key now separates the two halves.
                if key > self.node_at(current).keys[index] {
                    index += 1;
                }
            }
            current = self.node_at(current).children[index];
        }

        self.node_at_mut(current).insert_sorted(key);
        self.len += 1;
        self.version = self.version.next();

        InsertOutcome::Inserted {
            version: self.version,
        }
    }

    /// Split the full child at `index` of `parent`.
    ///
    /// The child's middle key moves up into `parent` at `index`, the keys
    /// after it move into a new sibling at `index + 1`, and the keys before
    /// it stay where they are.
    ///
    /// # Errors
    ///
    /// Fails without touching the tree if `parent` is unknown or already
    /// full, if `index` is out of range, or if the child does not hold
    /// exactly `order` keys.
    pub fn split_child(&mut self, parent: NodeId, index: usize) -> Result<(), BTreeError> {
        let order = self.order;
        let parent_node = self.node(parent).ok_or(BTreeError::UnknownNode(parent))?;

        if parent_node.is_full(order) {
            return Err(BTreeError::ParentFull {
                parent,
                len: parent_node.keys.len(),
                order: order.get(),
            });
        }

        let child = *parent_node
            .children
            .get(index)
            .ok_or(BTreeError::ChildIndexOutOfBounds {
                index,
                children: parent_node.children.len(),
            })?;

        let child_len = self.node_at(child).keys.len();
        if child_len != order.get() {
            return Err(BTreeError::ChildNotFull {
                index,
                len: child_len,
                order: order.get(),
            });
        }

        self.split_full_child(parent, index);
        self.version = self.version.next();
        Ok(())
    }

    /// Discard every node and start over with an empty leaf root.
    ///
    /// Node ids keep counting up from where they were.
    pub fn reset(&mut self) {
        let discarded = self.nodes.len();
        self.nodes.clear();
        self.base = self.next_id;
        self.root = self.allocate();
        self.len = 0;
        self.version = self.version.next();
        tracing::info!(discarded, version = %self.version, "tree reset");
    }

    /// Make the old root the only child of a new root and split it.
    fn grow_root(&mut self) {
        let old_root = self.root;
        let new_root = self.allocate();
        self.node_at_mut(new_root).children.push(old_root);
        self.root = new_root;
        self.split_full_child(new_root, 0);
        tracing::debug!(old_root = %old_root, new_root = %new_root, "root split");
    }

    /// Split without checking preconditions. Callers guarantee that the child
    /// is full and the parent is not.
    fn split_full_child(&mut self, parent: NodeId, index: usize) {
        let order = self.order;
        let child = self.node_at(parent).children[index];

        let (promoted, right_keys, right_children) = self.node_at_mut(child).split_off(order);

        let sibling = self.allocate();
        let sibling_node = self.node_at_mut(sibling);
        sibling_node.keys = right_keys;
        sibling_node.children = right_children;

        let parent_node = self.node_at_mut(parent);
        parent_node.keys.insert(index, promoted);
        parent_node.children.insert(index + 1, sibling);

        tracing::debug!(
            parent = %parent,
            child = %child,
            sibling = %sibling,
            promoted,
            "split child"
        );
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(Node::new(id));
        id
    }

    /// Arena slot for an id handed out by this tree since the last reset.
    #[allow(clippy::cast_possible_truncation)]
    const fn slot(&self, id: NodeId) -> usize {
        (id.0 - self.base) as usize
    }

    fn node_at(&self, id: NodeId) -> &Node {
        &self.nodes[self.slot(id)]
    }

    fn node_at_mut(&mut self, id: NodeId) -> &mut Node {
        let slot = self.slot(id);
        &mut self.nodes[slot]
    }

    /// Mutable arena access for tests that need to build broken trees.
    #[cfg(test)]
    pub(crate) fn node_mut_for_test(&mut self, id: NodeId) -> &mut Node {
        self.node_at_mut(id)
    }

    /// Walk the whole tree and report every structural problem found.
    ///
    /// Checks that keys are strictly ascending and within the range implied
    /// by the separators above them, that no node holds more than `order`
    /// keys, that internal nodes have one more child than keys, that every
    /// leaf sits at the same depth, and that the key counter matches.
    #[must_use]
    pub fn check_invariants(&self) -> Vec<StructuralViolation> {
        let mut walk = Walk {
            violations: Vec::new(),
            leaf_depth: None,
            keys_seen: 0,
            nodes_seen: 0,
        };
        self.check_node(self.root, 0, None, None, &mut walk);

        if walk.keys_seen != self.len {
            walk.violations.push(StructuralViolation::KeyCountMismatch {
                counted: walk.keys_seen,
                recorded: self.len,
            });
        }
        if walk.nodes_seen != self.nodes.len() {
            walk.violations.push(StructuralViolation::Unreachable {
                reachable: walk.nodes_seen,
                allocated: self.nodes.len(),
            });
        }
        walk.violations
    }

    fn check_node(
        &self,
        id: NodeId,
        depth: usize,
        lower: Option<Key>,
        upper: Option<Key>,
        walk: &mut Walk,
    ) {
        let Some(node) = self.node(id) else {
            walk.violations.push(StructuralViolation::DanglingChild { node: id });
            return;
        };
        walk.nodes_seen += 1;
        walk.keys_seen += node.keys.len();

        if !node.keys.windows(2).all(|pair| pair[0] < pair[1]) {
            walk.violations.push(StructuralViolation::Unsorted {
                node: id,
                keys: node.keys.clone(),
            });
        }

        if node.keys.len() > self.order.get() {
            walk.violations.push(StructuralViolation::Overfull {
                node: id,
                len: node.keys.len(),
                order: self.order.get(),
            });
        }

        if id != self.root && node.keys.is_empty() {
            walk.violations.push(StructuralViolation::EmptyNode { node: id });
        }

        for &key in &node.keys {
            let above = lower.is_some_and(|lo| key <= lo);
            let below = upper.is_some_and(|hi| key >= hi);
            if above || below {
                walk.violations.push(StructuralViolation::OutOfRange {
                    node: id,
                    key,
                    lower,
                    upper,
                });
            }
        }

        if node.is_leaf() {
            match walk.leaf_depth {
                None => walk.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    walk.violations.push(StructuralViolation::UnevenLeafDepth {
                        node: id,
                        depth,
                        expected,
                    });
                }
                Some(_) => {}
            }
            return;
        }

        if node.children.len() != node.keys.len() + 1 {
            walk.violations.push(StructuralViolation::Arity {
                node: id,
                keys: node.keys.len(),
                children: node.children.len(),
            });
        }

        for (i, &child) in node.children.iter().enumerate() {
            let lo = if i == 0 { lower } else { node.keys.get(i - 1).copied() };
            let hi = node.keys.get(i).copied().or(upper);
            self.check_node(child, depth + 1, lo, hi, walk);
        }
    }
}

/// Scratch state for [`BTree::check_invariants`].
struct Walk {
    violations: Vec<StructuralViolation>,
    leaf_depth: Option<usize>,
    keys_seen: usize,
    nodes_seen: usize,
}

/// A structural problem found by [`BTree::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralViolation {
    /// Keys are not strictly ascending.
    Unsorted { node: NodeId, keys: Vec<Key> },
    /// More than `order` keys.
    Overfull {
        node: NodeId,
        len: usize,
        order: usize,
    },
    /// Internal node whose child count is not key count + 1.
    Arity {
        node: NodeId,
        keys: usize,
        children: usize,
    },
    /// A leaf at a different depth from the first leaf found.
    UnevenLeafDepth {
        node: NodeId,
        depth: usize,
        expected: usize,
    },
    /// A key outside the range its ancestors' separators allow.
    OutOfRange {
        node: NodeId,
        key: Key,
        lower: Option<Key>,
        upper: Option<Key>,
    },
    /// A non-root node without keys.
    EmptyNode { node: NodeId },
    /// A child handle that does not resolve to a node.
    DanglingChild { node: NodeId },
    /// Allocated nodes that cannot be reached from the root.
    Unreachable { reachable: usize, allocated: usize },
    /// The stored key counter disagrees with the keys actually present.
    KeyCountMismatch { counted: usize, recorded: usize },
}

impl fmt::Display for StructuralViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsorted { node, keys } => write!(f, "{node}: keys not ascending {keys:?}"),
            Self::Overfull { node, len, order } => {
                write!(f, "{node}: holds {len} keys, order is {order}")
            }
            Self::Arity {
                node,
                keys,
                children,
            } => write!(f, "{node}: {keys} keys but {children} children"),
            Self::UnevenLeafDepth {
                node,
                depth,
                expected,
            } => write!(f, "{node}: leaf at depth {depth}, expected {expected}"),
            Self::OutOfRange {
                node,
                key,
                lower,
                upper,
            } => write!(
                f,
                "{node}: key {key} outside ({}, {})",
                lower.map_or_else(|| "-inf".to_string(), |k| k.to_string()),
                upper.map_or_else(|| "+inf".to_string(), |k| k.to_string()),
            ),
            Self::EmptyNode { node } => write!(f, "{node}: non-root node has no keys"),
            Self::DanglingChild { node } => write!(f, "{node}: child handle does not resolve"),
            Self::Unreachable {
                reachable,
                allocated,
            } => write!(f, "{reachable} of {allocated} allocated nodes reachable"),
            Self::KeyCountMismatch { counted, recorded } => {
                write!(f, "counted {counted} keys, tree records {recorded}")
            }
        }
    }
}

/// Errors that can occur during B-tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    /// Order too small to split into two non-empty halves.
    InvalidOrder(usize),
    /// Node id not present in the arena.
    UnknownNode(NodeId),
    /// Child index past the end of the parent's children.
    ChildIndexOutOfBounds { index: usize, children: usize },
    /// Split requested on a child that does not hold exactly `order` keys.
    ChildNotFull {
        index: usize,
        len: usize,
        order: usize,
    },
    /// Split requested under a parent that has no room for the promoted key.
    ParentFull {
        parent: NodeId,
        len: usize,
        order: usize,
    },
}

impl fmt::Display for BTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOrder(order) => write!(
                f,
                "invalid order {order}: must be at least {}",
                crate::btree::node::MIN_ORDER
            ),
            Self::UnknownNode(id) => write!(f, "unknown node {id}"),
            Self::ChildIndexOutOfBounds { index, children } => {
                write!(f, "child index {index} out of bounds ({children} children)")
            }
            Self::ChildNotFull { index, len, order } => {
                write!(f, "child {index} holds {len} keys, split needs exactly {order}")
            }
            Self::ParentFull { parent, len, order } => {
                write!(f, "parent {parent} already holds {len} of {order} keys")
            }
        }
    }
}

impl std::error::Error for BTreeError {}
