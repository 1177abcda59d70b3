//! Byte frequency counting.

use crate::BUFFER_SIZE;
use qhuff_core::Result;
use std::io::{ErrorKind, Read};

/// One live slot of a [`FrequencyTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyEntry {
    /// Byte value.
    pub symbol: u8,
    /// Occurrences, always at least one.
    pub count: u64,
}

/// Occurrence counts for all 256 byte values.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    counts: [u64; 256],
    total: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            counts: [0; 256],
            total: 0,
        }
    }
}

impl FrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every byte of `reader`, reading it to the end in
    /// [`BUFFER_SIZE`] chunks.
    pub fn count<R: Read>(reader: &mut R) -> Result<Self> {
        let mut table = Self::new();
        let mut buf = [0u8; BUFFER_SIZE];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            table.update(&buf[..n]);
        }
        Ok(table)
    }

    /// Count the bytes of an in-memory slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.update(data);
        table
    }

    /// Build a table from explicit `(symbol, count)` pairs. Zero counts are
    /// ignored; repeated symbols accumulate.
    pub fn from_counts(pairs: impl IntoIterator<Item = (u8, u64)>) -> Self {
        let mut table = Self::new();
        for (symbol, count) in pairs {
            table.counts[symbol as usize] += count;
            table.total += count;
        }
        table
    }

    /// Add the bytes of `data` to the counts.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
        self.total += data.len() as u64;
    }

    /// Count for one symbol (zero when absent).
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Live entries in ascending symbol order.
    pub fn entries(&self) -> impl Iterator<Item = FrequencyEntry> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(symbol, &count)| FrequencyEntry {
                symbol: symbol as u8,
                count,
            })
    }

    /// Number of distinct symbols seen.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Whether no byte was counted.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
