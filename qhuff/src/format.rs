//! On-disk records: the archive header and code table entries.
//!
//! Both records keep the field order, alignment padding and native byte
//! order of a plain C struct layout:
//!
//! ```text
//! ArchiveHeader (12 bytes)     CodeEntry (8 bytes)
//!   0      table_length  u8      0      symbol  u8
//!   1..4   padding               1      length  u8
//!   4..8   number_of_blocks u32  2..4   padding
//!   8..12  remaining_bits u32    4..8   code    u32
//! ```
//!
//! Padding is written as zero and ignored when reading.

use crate::codes::CodeEntry;
use qhuff_core::error::{QhuffError, Result};
use std::io::{self, ErrorKind, Read, Write};

/// Size of [`ArchiveHeader`] on disk.
pub const HEADER_SIZE: usize = 12;

/// Size of one [`CodeEntry`] on disk.
pub const CODE_ENTRY_SIZE: usize = 8;

/// Fixed-size archive header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchiveHeader {
    /// Number of code table entries; a full 256-entry table is stored as 0.
    pub table_length: u8,
    /// Number of payload blocks written.
    pub number_of_blocks: u32,
    /// Significant bits in the last block.
    pub remaining_bits: u32,
}

impl ArchiveHeader {
    /// Create a header for a table with `entries` codes (1-256).
    pub fn new(entries: usize, number_of_blocks: u32, remaining_bits: u32) -> Self {
        debug_assert!(
            (1..=256).contains(&entries),
            "code table holds {} entries, expected 1..=256",
            entries
        );
        Self {
            table_length: entries as u8,
            number_of_blocks,
            remaining_bits,
        }
    }

    /// Number of code table entries that follow the header.
    pub fn entry_count(&self) -> usize {
        match self.table_length {
            0 => 256,
            n => n as usize,
        }
    }

    /// Serialize to the on-disk layout.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0] = self.table_length;
        buf[4..8].copy_from_slice(&self.number_of_blocks.to_ne_bytes());
        buf[8..12].copy_from_slice(&self.remaining_bits.to_ne_bytes());
        buf
    }

    /// Parse the on-disk layout.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Self {
        Self {
            table_length: buf[0],
            number_of_blocks: u32::from_ne_bytes([buf[4], buf[5], buf[6], buf[7]]),
            remaining_bits: u32::from_ne_bytes([buf[8], buf[9], buf[10], buf[11]]),
        }
    }

    /// Write the header.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Read the header. A short read is `TruncatedHeader`.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        let n = read_full(reader, &mut buf)?;
        if n < HEADER_SIZE {
            return Err(QhuffError::truncated_header(HEADER_SIZE, n));
        }
        Ok(Self::from_bytes(&buf))
    }
}

impl CodeEntry {
    /// Serialize to the on-disk layout.
    pub fn to_bytes(&self) -> [u8; CODE_ENTRY_SIZE] {
        let mut buf = [0u8; CODE_ENTRY_SIZE];
        buf[0] = self.symbol;
        buf[1] = self.length;
        buf[4..8].copy_from_slice(&self.code.to_ne_bytes());
        buf
    }

    /// Parse the on-disk layout.
    pub fn from_bytes(buf: &[u8; CODE_ENTRY_SIZE]) -> Self {
        Self {
            symbol: buf[0],
            length: buf[1],
            code: u32::from_ne_bytes([buf[4], buf[5], buf[6], buf[7]]),
        }
    }
}

/// Write code entries as a flat array of records.
pub fn write_code_table<W: Write>(
    writer: &mut W,
    entries: impl IntoIterator<Item = CodeEntry>,
) -> Result<()> {
    let mut buf = Vec::new();
    for entry in entries {
        buf.extend_from_slice(&entry.to_bytes());
    }
    writer.write_all(&buf)?;
    Ok(())
}

/// Read exactly `count` code entries. A short read is `TruncatedCodeTable`.
pub fn read_code_table<R: Read>(reader: &mut R, count: usize) -> Result<Vec<CodeEntry>> {
    let mut entries = Vec::with_capacity(count);
    let mut record = [0u8; CODE_ENTRY_SIZE];
    for found in 0..count {
        if read_full(reader, &mut record)? < CODE_ENTRY_SIZE {
            return Err(QhuffError::truncated_code_table(count, found));
        }
        entries.push(CodeEntry::from_bytes(&record));
    }
    Ok(entries)
}

/// Fill `buf` from `reader`, stopping early only at end of input.
/// Returns the number of bytes read.
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_layout() {
        let header = ArchiveHeader::new(5, 3, 100);
        let bytes = header.to_bytes();
        assert_eq!(bytes[0], 5);
        assert_eq!(&bytes[1..4], &[0, 0, 0]);
        assert_eq!(&bytes[4..8], &3u32.to_ne_bytes());
        assert_eq!(&bytes[8..12], &100u32.to_ne_bytes());
        assert_eq!(ArchiveHeader::from_bytes(&bytes), header);
    }

    #[test]
    fn test_full_table_length_wraps() {
        let header = ArchiveHeader::new(256, 1, 1);
        assert_eq!(header.table_length, 0);
        assert_eq!(header.entry_count(), 256);
    }

    #[test]
    fn test_truncated_header() {
        let err = ArchiveHeader::read(&mut Cursor::new(vec![1u8, 0, 0, 0, 2])).unwrap_err();
        assert!(matches!(
            err,
            QhuffError::TruncatedHeader {
                expected: 12,
                found: 5
            }
        ));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "expected 1..=256")]
    fn test_oversized_table_length_is_rejected() {
        ArchiveHeader::new(257, 1, 1);
    }

    #[test]
    fn test_code_entry_layout() {
        let entry = CodeEntry::new(b'q', 7, 0x55);
        let bytes = entry.to_bytes();
        assert_eq!(bytes[0], b'q');
        assert_eq!(bytes[1], 7);
        assert_eq!(&bytes[2..4], &[0, 0]);
        assert_eq!(&bytes[4..], &0x55u32.to_ne_bytes());
        assert_eq!(CodeEntry::from_bytes(&bytes), entry);
    }

    #[test]
    fn test_code_entry_ignores_padding() {
        let mut bytes = CodeEntry::new(b'z', 3, 0b101).to_bytes();
        bytes[2] = 0xAA;
        bytes[3] = 0x55;
        assert_eq!(CodeEntry::from_bytes(&bytes), CodeEntry::new(b'z', 3, 0b101));
    }

    #[test]
    fn test_truncated_code_table() {
        let mut buf = Vec::new();
        write_code_table(
            &mut buf,
            [CodeEntry::new(b'a', 1, 0), CodeEntry::new(b'b', 1, 1)],
        )
        .unwrap();
        buf.truncate(CODE_ENTRY_SIZE + 3);

        let err = read_code_table(&mut Cursor::new(buf), 2).unwrap_err();
        assert!(matches!(
            err,
            QhuffError::TruncatedCodeTable {
                expected: 2,
                found: 1
            }
        ));
    }
}
