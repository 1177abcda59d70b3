//! Weight-ordered worklist used while building the Huffman tree.
//!
//! The list holds node indices in ascending weight order. A new node
//! goes right after the last node that is not heavier than it, except
//! that a node no heavier than the current head becomes the new head.
//! Merge order, and therefore the tree, is fully determined by the input
//! bytes.

use crate::tree::NodeId;
use std::collections::VecDeque;

/// Ascending-weight ordered sequence of tree nodes.
#[derive(Debug, Clone, Default)]
pub struct Worklist {
    items: VecDeque<(u64, NodeId)>,
}

impl Worklist {
    /// Create an empty worklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` with `weight`.
    ///
    /// A node weighing no more than the head becomes the new head.
    /// Otherwise it goes right after the last element whose weight is not
    /// greater than `weight`.
    pub fn insert(&mut self, node: NodeId, weight: u64) {
        let at = match self.items.front() {
            Some(&(head, _)) if weight <= head => 0,
            _ => self.items.partition_point(|&(w, _)| w <= weight),
        };
        self.items.insert(at, (weight, node));
    }

    /// Remove and return the lightest node with its weight.
    pub fn pop_lowest(&mut self) -> Option<(NodeId, u64)> {
        self.items.pop_front().map(|(weight, node)| (node, weight))
    }

    /// Number of queued nodes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the worklist is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Queued nodes from lightest to heaviest.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, u64)> + '_ {
        self.items.iter().map(|&(weight, node)| (node, weight))
    }
}
