//! Archive reader and payload decoder.
//!
//! The decoder never sees frequencies. It rebuilds the tree from the
//! stored code table and walks it one payload bit at a time, least
//! significant bit of each word first. In the final block it stops after
//! the header's `remaining_bits`, so padding never turns into symbols.

use crate::codes::CodeEntry;
use crate::format::{ArchiveHeader, read_code_table, read_full};
use crate::tree::{HuffmanTree, Node, NodeId};
use crate::{BLOCK_BITS, BLOCK_WORDS, BUFFER_SIZE, WORD_BITS};
use log::{debug, trace, warn};
use qhuff_core::error::{QhuffError, Result};
use qhuff_core::progress::Progress;
use std::io::{Read, Write};

/// Phase of the payload decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderPhase {
    /// Loading the next block of words.
    ReadingBlock,
    /// Following payload bits down the tree.
    WalkingTree,
    /// A leaf was reached; its symbol goes to the output buffer.
    Emitting,
    /// All significant bits were consumed.
    Finished,
}

/// Read the header and the code table that follows it.
pub fn read_preamble<R: Read>(reader: &mut R) -> Result<(ArchiveHeader, Vec<CodeEntry>)> {
    let header = ArchiveHeader::read(reader)?;
    let entries = read_code_table(reader, header.entry_count())?;
    debug!(
        "archive: {} codes, {} blocks, {} significant bits in the last",
        entries.len(),
        header.number_of_blocks,
        header.remaining_bits
    );
    Ok((header, entries))
}

/// Decodes the block payload of one archive.
#[derive(Debug)]
pub struct PayloadDecoder<'t> {
    tree: &'t HuffmanTree,
    header: ArchiveHeader,
    phase: DecoderPhase,
    /// Tree position; survives word and block boundaries.
    cursor: NodeId,
    /// Symbol waiting in the `Emitting` phase.
    pending: u8,

    /// Blocks loaded so far; the current block's 1-based number.
    block: u32,
    words: Vec<u32>,
    bytes: Vec<u8>,
    word: usize,
    bit: u32,
    /// Significant bits left in the current block.
    budget: u64,
    /// The current block holds fewer bits than the header promises.
    truncated: bool,

    out: [u8; BUFFER_SIZE],
    out_len: usize,
    written: u64,
}

impl<'t> PayloadDecoder<'t> {
    /// Create a decoder for the payload described by `header`.
    pub fn new(tree: &'t HuffmanTree, header: ArchiveHeader) -> Self {
        Self {
            tree,
            header,
            phase: DecoderPhase::ReadingBlock,
            cursor: tree.root(),
            pending: 0,
            block: 0,
            words: vec![0; BLOCK_WORDS],
            bytes: vec![0; BLOCK_WORDS * 4],
            word: 0,
            bit: 0,
            budget: 0,
            truncated: false,
            out: [0; BUFFER_SIZE],
            out_len: 0,
            written: 0,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> DecoderPhase {
        self.phase
    }

    /// Bytes handed to the writer so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Decode the payload from `reader` into `writer`.
    ///
    /// On error, symbols decoded before the failure are still written.
    /// Returns the number of decoded bytes.
    pub fn run<R, W, P>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
        progress: &mut P,
    ) -> Result<u64>
    where
        R: Read,
        W: Write,
        P: Progress + ?Sized,
    {
        let result = self.drive(reader, writer, progress);
        let flushed = self.flush_output(writer);

        match result {
            Ok(()) => {
                flushed?;
                progress.report(1.0);
                Ok(self.written)
            }
            Err(err) => {
                if let Err(flush_err) = flushed {
                    warn!("could not flush partial output: {}", flush_err);
                }
                warn!(
                    "decoding stopped after {} bytes: {}",
                    self.written + self.out_len as u64,
                    err
                );
                Err(err)
            }
        }
    }

    fn drive<R, W, P>(&mut self, reader: &mut R, writer: &mut W, progress: &mut P) -> Result<()>
    where
        R: Read,
        W: Write,
        P: Progress + ?Sized,
    {
        let total_blocks = self.header.number_of_blocks;

        loop {
            match self.phase {
                DecoderPhase::ReadingBlock => {
                    if self.block == total_blocks {
                        if self.cursor != self.tree.root() {
                            // significant bits ended inside a code
                            return Err(QhuffError::truncated_payload(self.block, total_blocks));
                        }
                        self.phase = DecoderPhase::Finished;
                        continue;
                    }
                    if self.block > 0 {
                        progress.report(self.block as f32 / total_blocks as f32);
                    }
                    self.load_block(reader)?;
                    self.phase = DecoderPhase::WalkingTree;
                }
                DecoderPhase::WalkingTree => {
                    if self.budget == 0 {
                        if self.truncated {
                            return Err(QhuffError::truncated_payload(self.block, total_blocks));
                        }
                        self.phase = DecoderPhase::ReadingBlock;
                        continue;
                    }

                    let (word, bit) = (self.word, self.bit);
                    let set = (self.words[word] >> bit) & 1 == 1;
                    self.budget -= 1;
                    self.bit += 1;
                    if self.bit == WORD_BITS {
                        self.bit = 0;
                        self.word += 1;
                    }

                    let next = self
                        .tree
                        .child(self.cursor, set)
                        .ok_or_else(|| QhuffError::corrupt_tree_path(self.block, word, bit))?;

                    match *self.tree.node(next) {
                        Node::Leaf { symbol, .. } => {
                            self.pending = symbol;
                            self.phase = DecoderPhase::Emitting;
                        }
                        Node::Internal { .. } => self.cursor = next,
                    }
                }
                DecoderPhase::Emitting => {
                    self.emit(self.pending, writer)?;
                    self.cursor = self.tree.root();
                    self.phase = DecoderPhase::WalkingTree;
                }
                DecoderPhase::Finished => return Ok(()),
            }
        }
    }

    fn load_block<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        let n = read_full(reader, &mut self.bytes)?;
        self.block += 1;

        let complete = n / 4;
        let chunks = self.bytes[..complete * 4].chunks_exact(4);
        for (word, chunk) in self.words.iter_mut().zip(chunks) {
            *word = u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        let expected = if self.block == self.header.number_of_blocks {
            u64::from(self.header.remaining_bits)
        } else {
            u64::from(BLOCK_BITS)
        };
        let available = complete as u64 * u64::from(WORD_BITS);

        self.truncated = available < expected;
        self.budget = expected.min(available);
        self.word = 0;
        self.bit = 0;
        trace!(
            "block {}: {} words, {} significant bits",
            self.block, complete, self.budget
        );
        Ok(())
    }

    fn emit<W: Write>(&mut self, symbol: u8, writer: &mut W) -> Result<()> {
        self.out[self.out_len] = symbol;
        self.out_len += 1;
        if self.out_len == BUFFER_SIZE {
            self.flush_output(writer)?;
        }
        Ok(())
    }

    fn flush_output<W: Write>(&mut self, writer: &mut W) -> Result<()> {
        if self.out_len > 0 {
            writer.write_all(&self.out[..self.out_len])?;
            self.written += self.out_len as u64;
            self.out_len = 0;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Decompress a whole archive from `source` into `dest`.
///
/// Returns the number of decoded bytes.
pub fn decode<R, W, P>(source: &mut R, dest: &mut W, progress: &mut P) -> Result<u64>
where
    R: Read,
    W: Write,
    P: Progress + ?Sized,
{
    let (header, entries) = read_preamble(source)?;
    let tree = HuffmanTree::rebuild(&entries)?;
    PayloadDecoder::new(&tree, header).run(source, dest, progress)
}
