//! # qhuff
//!
//! A static Huffman file compressor.
//!
//! Compression scans the whole source once to count byte frequencies,
//! builds a Huffman tree from a weight-ordered worklist, derives a code
//! table from the tree and packs the source into blocks of 32-bit words.
//! Decompression rebuilds the same tree from the stored code table alone
//! and walks it bit by bit.
//!
//! ## Pipeline
//!
//! ```text
//! compress:   FrequencyTable -> Worklist -> HuffmanTree -> CodeTable -> BlockPacker
//! decompress: ArchiveHeader -> CodeTable -> HuffmanTree::rebuild -> PayloadDecoder
//! ```
//!
//! ## Archive layout
//!
//! ```text
//! [ArchiveHeader, 12 bytes][table_length x CodeEntry, 8 bytes each][payload blocks]
//! ```
//!
//! All integers are stored in native byte order, so archives are only
//! portable between machines of the same endianness.
//!
//! ## Example
//!
//! ```rust
//! use qhuff::{decode, encode};
//! use qhuff_core::NoProgress;
//! use std::io::Cursor;
//!
//! let original = b"abracadabra".to_vec();
//!
//! let mut archive = Cursor::new(Vec::new());
//! encode(&mut Cursor::new(&original), &mut archive, &mut NoProgress).unwrap();
//!
//! let mut restored = Vec::new();
//! decode(&mut Cursor::new(archive.into_inner()), &mut restored, &mut NoProgress).unwrap();
//! assert_eq!(restored, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod codes;
pub mod decode;
pub mod encode;
pub mod format;
pub mod frequency;
pub mod tree;
pub mod worklist;

/// Chunk size for source reads and for the decoder's output buffer.
pub const BUFFER_SIZE: usize = 1024;

/// Number of 32-bit words in one payload block.
pub const BLOCK_WORDS: usize = 1024;

/// Bits in one payload word.
pub const WORD_BITS: u32 = 32;

/// Bits in one full payload block.
pub const BLOCK_BITS: u32 = BLOCK_WORDS as u32 * WORD_BITS;

/// Longest code the archive format can store.
pub const MAX_CODE_LENGTH: usize = 32;

// Re-exports
pub use codec::{ArchiveInfo, HuffmanCodec, compress, decompress, inspect};
pub use codes::{CodeEntry, CodeTable};
pub use decode::{DecoderPhase, PayloadDecoder, decode};
pub use encode::{BlockPacker, Encoder, encode};
pub use format::ArchiveHeader;
pub use frequency::{FrequencyEntry, FrequencyTable};
pub use tree::{HuffmanTree, Node, NodeId};
pub use worklist::Worklist;
