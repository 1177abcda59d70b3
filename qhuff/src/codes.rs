//! Code table derivation.
//!
//! Codes are assigned by a preorder walk of the tree: a left edge appends
//! bit 0, a right edge bit 1, with the root edge ending up as the most
//! significant bit. The payload is packed least significant bit first, so
//! each code is bit-reversed before it is stored.

use crate::MAX_CODE_LENGTH;
use crate::tree::{HuffmanTree, Node};
use qhuff_core::error::{QhuffError, Result};

/// Code assigned to one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    /// Byte value.
    pub symbol: u8,
    /// Number of meaningful low bits in `code` (1-32).
    pub length: u8,
    /// Code bits in packing order (first bit in the LSB).
    pub code: u32,
}

impl CodeEntry {
    /// Create an entry.
    pub fn new(symbol: u8, length: u8, code: u32) -> Self {
        Self {
            symbol,
            length,
            code,
        }
    }

    /// Code bits in tree-walk order, as a string of `0`/`1`.
    pub fn bit_string(&self) -> String {
        (0..self.length)
            .map(|i| if (self.code >> i) & 1 == 1 { '1' } else { '0' })
            .collect()
    }
}

/// Reverse the low `length` bits of `value`.
#[inline]
pub fn reverse_bits(value: u32, length: u32) -> u32 {
    value
        .reverse_bits()
        .checked_shr(u32::BITS - length)
        .unwrap_or(0)
}

/// Symbol to code mapping for every symbol present in the source.
#[derive(Debug, Clone)]
pub struct CodeTable {
    slots: [Option<CodeEntry>; 256],
    len: usize,
}

impl Default for CodeTable {
    fn default() -> Self {
        Self {
            slots: [None; 256],
            len: 0,
        }
    }
}

impl CodeTable {
    /// Derive the code table from a built tree.
    ///
    /// Fails with `CodeLengthOverflow` when a leaf is deeper than
    /// [`MAX_CODE_LENGTH`].
    pub fn generate(tree: &HuffmanTree) -> Result<Self> {
        let mut table = Self::default();
        let mut stack = vec![(tree.root(), 0usize, 0u32)];

        while let Some((id, depth, code)) = stack.pop() {
            match *tree.node(id) {
                Node::Leaf { symbol, .. } => {
                    if depth > MAX_CODE_LENGTH {
                        return Err(QhuffError::code_length_overflow(
                            symbol,
                            depth,
                            MAX_CODE_LENGTH,
                        ));
                    }
                    let reversed = reverse_bits(code, depth as u32);
                    table.insert(CodeEntry::new(symbol, depth as u8, reversed));
                }
                Node::Internal { left, right, .. } => {
                    // right first so the left subtree is visited first
                    if let Some(right) = right {
                        stack.push((right, depth + 1, (code << 1) | 1));
                    }
                    if let Some(left) = left {
                        stack.push((left, depth + 1, code << 1));
                    }
                }
            }
        }

        Ok(table)
    }

    /// Build a table from stored entries.
    pub fn from_entries(entries: &[CodeEntry]) -> Self {
        let mut table = Self::default();
        for &entry in entries {
            table.insert(entry);
        }
        table
    }

    fn insert(&mut self, entry: CodeEntry) {
        if self.slots[entry.symbol as usize].replace(entry).is_none() {
            self.len += 1;
        }
    }

    /// Code for `symbol`.
    #[inline]
    pub fn get(&self, symbol: u8) -> Option<CodeEntry> {
        self.slots[symbol as usize]
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = CodeEntry> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the table has no codes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Longest code in the table.
    pub fn max_length(&self) -> u8 {
        self.iter().map(|e| e.length).max().unwrap_or(0)
    }

    /// Payload bits needed to encode a source with these frequencies.
    pub fn encoded_bits(&self, frequencies: &crate::FrequencyTable) -> u64 {
        self.iter()
            .map(|e| u64::from(e.length) * frequencies.get(e.symbol))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FrequencyTable;

    fn is_prefix_free(table: &CodeTable) -> bool {
        let entries: Vec<_> = table.iter().collect();
        for a in &entries {
            for b in &entries {
                if a.symbol == b.symbol || a.length > b.length {
                    continue;
                }
                let mask = if a.length == 32 {
                    u32::MAX
                } else {
                    (1u32 << a.length) - 1
                };
                if b.code & mask == a.code {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits(0b10, 2), 0b01);
        assert_eq!(reverse_bits(0b1100, 4), 0b0011);
        assert_eq!(reverse_bits(0b101, 3), 0b101);
        assert_eq!(reverse_bits(1, 32), 0x8000_0000);
        assert_eq!(reverse_bits(0, 0), 0);
    }

    #[test]
    fn test_tie_break_codes() {
        let freq = FrequencyTable::from_counts([(b'a', 2), (b'b', 2), (b'c', 3)]);
        let tree = HuffmanTree::build(&freq).unwrap();
        let table = CodeTable::generate(&tree).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get(b'c'), Some(CodeEntry::new(b'c', 1, 0b0)));
        // walk order "10" stored reversed
        assert_eq!(table.get(b'b'), Some(CodeEntry::new(b'b', 2, 0b01)));
        assert_eq!(table.get(b'a'), Some(CodeEntry::new(b'a', 2, 0b11)));
        assert_eq!(table.get(b'b').unwrap().bit_string(), "10");
    }

    #[test]
    fn test_lengths_match_leaf_depths() {
        let freq = FrequencyTable::from_bytes(b"she sells sea shells by the sea shore");
        let tree = HuffmanTree::build(&freq).unwrap();
        let table = CodeTable::generate(&tree).unwrap();

        assert_eq!(table.len(), freq.distinct());
        for entry in table.iter() {
            assert_eq!(tree.depth_of(entry.symbol), Some(entry.length as usize));
        }
        assert!(is_prefix_free(&table));
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"aaaa")).unwrap();
        let table = CodeTable::generate(&tree).unwrap();
        assert_eq!(table.get(b'a'), Some(CodeEntry::new(b'a', 1, 0)));
        assert_eq!(table.encoded_bits(&FrequencyTable::from_bytes(b"aaaa")), 4);
    }

    #[test]
    fn test_all_byte_values() {
        let data: Vec<u8> = (0..=255u8).chain(0..=10u8).collect();
        let freq = FrequencyTable::from_bytes(&data);
        let table = CodeTable::generate(&HuffmanTree::build(&freq).unwrap()).unwrap();
        assert_eq!(table.len(), 256);
        assert!(table.get(0).is_some());
        assert!(is_prefix_free(&table));
    }

    #[test]
    fn test_code_length_overflow() {
        // Fibonacci weights produce a fully skewed tree, one level per symbol.
        let mut weights = vec![1u64, 1];
        while weights.len() < 40 {
            let n = weights.len();
            weights.push(weights[n - 1] + weights[n - 2]);
        }
        let freq = FrequencyTable::from_counts(
            weights.iter().enumerate().map(|(i, &w)| (i as u8 + 1, w)),
        );
        let tree = HuffmanTree::build(&freq).unwrap();
        let err = CodeTable::generate(&tree).unwrap_err();
        assert!(matches!(
            err,
            QhuffError::CodeLengthOverflow { depth, max: 32, .. } if depth > 32
        ));
    }
}
