//! Error types for qhuff operations.
//!
//! Every failure of a compress or decompress call is terminal: the codec
//! never retries and never skips over corrupt sections.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for qhuff operations.
#[derive(Debug, Error)]
pub enum QhuffError {
    /// I/O error from the underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source file could not be opened.
    #[error("Cannot open source {}: {source}", path.display())]
    SourceOpenFailed {
        /// Path that was being opened.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The destination file could not be created.
    #[error("Cannot open destination {}: {source}", path.display())]
    DestOpenFailed {
        /// Path that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The archive is shorter than its fixed-size header.
    #[error("Truncated archive header: expected {expected} bytes, found {found}")]
    TruncatedHeader {
        /// Header size in bytes.
        expected: usize,
        /// Bytes actually available.
        found: usize,
    },

    /// The archive holds fewer code records than the header announces.
    #[error("Truncated code table: expected {expected} entries, found {found}")]
    TruncatedCodeTable {
        /// Entries announced by the header.
        expected: usize,
        /// Complete entries actually read.
        found: usize,
    },

    /// The payload ends before the bits promised by the header.
    #[error("Truncated payload in block {block} of {expected_blocks}")]
    TruncatedPayload {
        /// Block (1-based) in which the data ran out.
        block: u32,
        /// Blocks announced by the header.
        expected_blocks: u32,
    },

    /// The decoder followed a bit to a child that does not exist.
    #[error("Corrupt tree path at block {block}, word {word}, bit {bit}")]
    CorruptTreePath {
        /// Block (1-based) being decoded.
        block: u32,
        /// Word index inside the block.
        word: usize,
        /// Bit index inside the word (0 = least significant).
        bit: u32,
    },

    /// A stored code record cannot be placed in the rebuilt tree.
    #[error("Invalid code table entry for symbol {symbol:#04x}: {message}")]
    InvalidCodeTable {
        /// Symbol of the offending record.
        symbol: u8,
        /// Description of the conflict.
        message: String,
    },

    /// A leaf sits deeper than the 32-bit code storage allows.
    #[error("Code for symbol {symbol:#04x} needs {depth} bits, maximum is {max}")]
    CodeLengthOverflow {
        /// Symbol whose leaf is too deep.
        symbol: u8,
        /// Depth of that leaf.
        depth: usize,
        /// Maximum representable code length.
        max: usize,
    },

    /// The source contains no bytes, so no tree can be built.
    #[error("Source is empty: no symbols to encode")]
    EmptySource,
}

/// Result type alias for qhuff operations.
pub type Result<T> = std::result::Result<T, QhuffError>;

impl QhuffError {
    /// Create a source-open error.
    pub fn source_open(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::SourceOpenFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a destination-open error.
    pub fn dest_open(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::DestOpenFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a truncated header error.
    pub fn truncated_header(expected: usize, found: usize) -> Self {
        Self::TruncatedHeader { expected, found }
    }

    /// Create a truncated code table error.
    pub fn truncated_code_table(expected: usize, found: usize) -> Self {
        Self::TruncatedCodeTable { expected, found }
    }

    /// Create a truncated payload error.
    pub fn truncated_payload(block: u32, expected_blocks: u32) -> Self {
        Self::TruncatedPayload {
            block,
            expected_blocks,
        }
    }

    /// Create a corrupt tree path error.
    pub fn corrupt_tree_path(block: u32, word: usize, bit: u32) -> Self {
        Self::CorruptTreePath { block, word, bit }
    }

    /// Create an invalid code table error.
    pub fn invalid_code_table(symbol: u8, message: impl Into<String>) -> Self {
        Self::InvalidCodeTable {
            symbol,
            message: message.into(),
        }
    }

    /// Create a code length overflow error.
    pub fn code_length_overflow(symbol: u8, depth: usize, max: usize) -> Self {
        Self::CodeLengthOverflow { symbol, depth, max }
    }

    /// Whether the error came from damaged archive contents rather than
    /// from the environment.
    pub fn is_corrupt_archive(&self) -> bool {
        matches!(
            self,
            Self::TruncatedHeader { .. }
                | Self::TruncatedCodeTable { .. }
                | Self::TruncatedPayload { .. }
                | Self::CorruptTreePath { .. }
                | Self::InvalidCodeTable { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QhuffError::corrupt_tree_path(2, 17, 5);
        assert!(err.to_string().contains("Corrupt tree path"));
        assert!(err.to_string().contains("word 17"));

        let err = QhuffError::code_length_overflow(b'z', 33, 32);
        assert!(err.to_string().contains("33 bits"));

        let err = QhuffError::source_open("missing.txt", io::ErrorKind::NotFound.into());
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err: QhuffError = io_err.into();
        assert!(matches!(err, QhuffError::Io(_)));
    }

    #[test]
    fn test_corrupt_archive_classification() {
        assert!(QhuffError::truncated_header(12, 3).is_corrupt_archive());
        assert!(QhuffError::truncated_payload(1, 2).is_corrupt_archive());
        assert!(!QhuffError::EmptySource.is_corrupt_archive());
        assert!(!QhuffError::code_length_overflow(1, 40, 32).is_corrupt_archive());
    }
}
