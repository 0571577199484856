//! Immutable deep copies of a tree for the presentation layer.

use serde::{Deserialize, Serialize};

use crate::btree::node::{Key, NodeId};
use crate::btree::tree::{BTree, Version};

/// A deep copy of a whole tree at one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub version: Version,
    pub order: usize,
    pub root: NodeSnapshot,
}

/// A deep copy of one node and everything below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub keys: Vec<Key>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Self>,
}

impl NodeSnapshot {
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl TreeSnapshot {
    /// Nodes grouped by depth, root level first, each level left to right.
    #[must_use]
    pub fn levels(&self) -> Vec<Vec<&NodeSnapshot>> {
        let mut levels = Vec::new();
        let mut current = vec![&self.root];
        while !current.is_empty() {
            let next: Vec<&NodeSnapshot> = current
                .iter()
                .flat_map(|node| node.children.iter())
                .collect();
            levels.push(current);
            current = next;
        }
        levels
    }

    /// Total number of keys in the snapshot.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.levels()
            .iter()
            .flatten()
            .map(|node| node.keys.len())
            .sum()
    }
}

impl BTree {
    /// Take a deep copy of the current tree.
    #[must_use]
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            version: self.version(),
            order: self.order().get(),
            root: self.snapshot_node(self.root_id()),
        }
    }

    fn snapshot_node(&self, id: NodeId) -> NodeSnapshot {
        let Some(node) = self.node(id) else {
            return NodeSnapshot {
                id,
                keys: Vec::new(),
                children: Vec::new(),
            };
        };
        NodeSnapshot {
            id,
            keys: node.keys().to_vec(),
            children: node
                .children()
                .iter()
                .map(|&child| self.snapshot_node(child))
                .collect(),
        }
    }
}
