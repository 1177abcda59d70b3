//! Huffman tree stored as an arena of nodes.
//!
//! Nodes reference their children by [`NodeId`]. Leaves are a distinct
//! variant, so every byte value (including `0x00`) can be a symbol.
//!
//! A tree comes from one of two places:
//!
//! - [`HuffmanTree::build`] merges frequency-weighted nodes greedily
//!   (encode time).
//! - [`HuffmanTree::rebuild`] replays stored codes (decode time). No
//!   weights are needed because the codes alone fix the tree shape.

use crate::MAX_CODE_LENGTH;
use crate::codes::CodeEntry;
use crate::frequency::FrequencyTable;
use crate::worklist::Worklist;
use qhuff_core::error::{QhuffError, Result};

/// Index of a node inside a [`HuffmanTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Wrap a raw arena index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// A source symbol.
    Leaf {
        /// Byte value.
        symbol: u8,
        /// Frequency (zero in rebuilt trees).
        weight: u64,
    },
    /// A merge point.
    Internal {
        /// Sum of child weights (zero in rebuilt trees).
        weight: u64,
        /// Child reached by bit 0.
        left: Option<NodeId>,
        /// Child reached by bit 1.
        right: Option<NodeId>,
    },
}

impl Node {
    fn empty() -> Self {
        Node::Internal {
            weight: 0,
            left: None,
            right: None,
        }
    }

    /// Weight of the node.
    pub fn weight(&self) -> u64 {
        match *self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => weight,
        }
    }

    /// Symbol if this is a leaf.
    pub fn symbol(&self) -> Option<u8> {
        match *self {
            Node::Leaf { symbol, .. } => Some(symbol),
            Node::Internal { .. } => None,
        }
    }
}

/// A Huffman tree.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree for `frequencies`.
    ///
    /// The two lightest nodes are merged (first popped on the left) and
    /// the merged node goes back into the worklist until one node is
    /// left. A source with a single distinct symbol gets a synthesized
    /// root with that leaf as its left child, so the symbol still has a
    /// one-bit code.
    pub fn build(frequencies: &FrequencyTable) -> Result<Self> {
        let mut nodes = Vec::with_capacity(2 * frequencies.distinct() + 1);
        let mut worklist = Worklist::new();

        for entry in frequencies.entries() {
            let id = NodeId(nodes.len());
            nodes.push(Node::Leaf {
                symbol: entry.symbol,
                weight: entry.count,
            });
            worklist.insert(id, entry.count);
        }

        if worklist.len() == 1 {
            if let Some((leaf, weight)) = worklist.pop_lowest() {
                let root = NodeId(nodes.len());
                nodes.push(Node::Internal {
                    weight,
                    left: Some(leaf),
                    right: None,
                });
                return Ok(Self { nodes, root });
            }
        }

        let root = loop {
            let Some((first, first_weight)) = worklist.pop_lowest() else {
                return Err(QhuffError::EmptySource);
            };
            let Some((second, second_weight)) = worklist.pop_lowest() else {
                break first;
            };

            let weight = first_weight + second_weight;
            let merged = NodeId(nodes.len());
            nodes.push(Node::Internal {
                weight,
                left: Some(first),
                right: Some(second),
            });
            worklist.insert(merged, weight);
        };

        Ok(Self { nodes, root })
    }

    /// Rebuild a tree from stored code entries.
    ///
    /// Each entry walks `length` bits of its code, least significant bit
    /// first; bit 1 goes right and bit 0 goes left, creating empty nodes
    /// on the way. The node at the end of the walk becomes the leaf.
    pub fn rebuild(entries: &[CodeEntry]) -> Result<Self> {
        let mut nodes = vec![Node::empty()];
        let root = NodeId(0);
        let mut seen = [false; 256];

        for entry in entries {
            let length = entry.length as usize;
            if length == 0 || length > MAX_CODE_LENGTH {
                return Err(QhuffError::invalid_code_table(
                    entry.symbol,
                    format!("code length {} outside 1..={}", length, MAX_CODE_LENGTH),
                ));
            }
            if std::mem::replace(&mut seen[entry.symbol as usize], true) {
                return Err(QhuffError::invalid_code_table(entry.symbol, "duplicate symbol"));
            }

            let mut cursor = root;
            let mut code = entry.code;
            for _ in 0..length {
                let bit = code & 1 == 1;
                code >>= 1;

                let next = match nodes[cursor.0] {
                    Node::Leaf { symbol, .. } => {
                        return Err(QhuffError::invalid_code_table(
                            entry.symbol,
                            format!("code passes through the leaf of {:#04x}", symbol),
                        ));
                    }
                    Node::Internal { left, right, .. } => {
                        if bit {
                            right
                        } else {
                            left
                        }
                    }
                };

                cursor = match next {
                    Some(child) => child,
                    None => {
                        let child = NodeId(nodes.len());
                        nodes.push(Node::empty());
                        if let Node::Internal { left, right, .. } = &mut nodes[cursor.0] {
                            if bit {
                                *right = Some(child);
                            } else {
                                *left = Some(child);
                            }
                        }
                        child
                    }
                };
            }

            match nodes[cursor.0] {
                Node::Internal {
                    left: None,
                    right: None,
                    ..
                } => {
                    nodes[cursor.0] = Node::Leaf {
                        symbol: entry.symbol,
                        weight: 0,
                    };
                }
                _ => {
                    return Err(QhuffError::invalid_code_table(
                        entry.symbol,
                        "code is a prefix of another code",
                    ));
                }
            }
        }

        Ok(Self { nodes, root })
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Child of `id` reached by `bit` (`true` = right), if any.
    #[inline]
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.nodes[id.0] {
            Node::Internal { left, right, .. } => {
                if bit {
                    right
                } else {
                    left
                }
            }
            Node::Leaf { .. } => None,
        }
    }

    /// Leaves with their depth, in preorder (left before right).
    pub fn leaves(&self) -> Vec<(u8, usize)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id.0] {
                Node::Leaf { symbol, .. } => out.push((symbol, depth)),
                Node::Internal { left, right, .. } => {
                    if let Some(right) = right {
                        stack.push((right, depth + 1));
                    }
                    if let Some(left) = left {
                        stack.push((left, depth + 1));
                    }
                }
            }
        }
        out
    }

    /// Depth of the leaf carrying `symbol`.
    pub fn depth_of(&self, symbol: u8) -> Option<usize> {
        self.leaves()
            .into_iter()
            .find(|&(s, _)| s == symbol)
            .map(|(_, depth)| depth)
    }

    /// Render the tree shape as nested parentheses, e.g. `(c (a b))`.
    /// Symbols are printed as characters when printable, `0xNN` otherwise.
    pub fn shape(&self) -> String {
        let mut out = String::new();
        self.write_shape(self.root, &mut out);
        out
    }

    fn write_shape(&self, id: NodeId, out: &mut String) {
        match self.nodes[id.0] {
            Node::Leaf { symbol, .. } => {
                if symbol.is_ascii_graphic() {
                    out.push(symbol as char);
                } else {
                    out.push_str(&format!("{:#04x}", symbol));
                }
            }
            Node::Internal { left, right, .. } => {
                out.push('(');
                match left {
                    Some(left) => self.write_shape(left, out),
                    None => out.push('-'),
                }
                out.push(' ');
                match right {
                    Some(right) => self.write_shape(right, out),
                    None => out.push('-'),
                }
                out.push(')');
            }
        }
    }
}
