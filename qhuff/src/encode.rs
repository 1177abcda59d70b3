//! Archive writer.
//!
//! Compression needs two passes over the source: one to count
//! frequencies, one to pack. The header goes out as a placeholder first
//! and is rewritten in place once the block count and the number of
//! significant bits are known.

use crate::codes::{CodeEntry, CodeTable};
use crate::format::{ArchiveHeader, write_code_table};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;
use crate::{BLOCK_BITS, BLOCK_WORDS, BUFFER_SIZE, WORD_BITS};
use log::{debug, trace};
use qhuff_core::error::{QhuffError, Result};
use qhuff_core::progress::Progress;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

/// Packs codes into blocks of [`BLOCK_WORDS`] 32-bit words.
///
/// Codes are placed least significant bit first. A code that does not
/// fit into the free bits of the current word is split: its low part
/// fills the current word and its high part starts the next one.
#[derive(Debug)]
pub struct BlockPacker {
    /// Words of the block being filled.
    words: Vec<u32>,
    /// Native-endian staging buffer for block writes.
    bytes: Vec<u8>,
    /// Index of the word currently open.
    word: usize,
    /// Free bits left in the open word (1-32).
    free_bits: u32,
    /// Blocks written so far.
    blocks: u32,
    /// Total code bits packed.
    bits_packed: u64,
}

impl Default for BlockPacker {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockPacker {
    /// Create an empty packer.
    pub fn new() -> Self {
        Self {
            words: vec![0; BLOCK_WORDS],
            bytes: Vec::with_capacity(BLOCK_WORDS * 4),
            word: 0,
            free_bits: WORD_BITS,
            blocks: 0,
            bits_packed: 0,
        }
    }

    /// Append one code. Returns `true` when a full block was flushed.
    #[inline]
    pub fn push<W: Write>(&mut self, entry: CodeEntry, writer: &mut W) -> Result<bool> {
        let length = u32::from(entry.length);
        let code = entry.code;
        self.bits_packed += u64::from(length);

        if length < self.free_bits {
            self.words[self.word] |= code << (WORD_BITS - self.free_bits);
            self.free_bits -= length;
            return Ok(false);
        }

        let free = self.free_bits;
        self.words[self.word] |= code << (WORD_BITS - free);
        let flushed = self.advance(writer)?;

        let carried = length - free;
        if carried > 0 {
            self.words[self.word] |= code >> free;
            self.free_bits = WORD_BITS - carried;
        }
        Ok(flushed)
    }

    fn advance<W: Write>(&mut self, writer: &mut W) -> Result<bool> {
        self.word += 1;
        self.free_bits = WORD_BITS;
        if self.word < BLOCK_WORDS {
            return Ok(false);
        }
        self.flush_words(BLOCK_WORDS, writer)?;
        self.word = 0;
        Ok(true)
    }

    fn flush_words<W: Write>(&mut self, count: usize, writer: &mut W) -> Result<()> {
        self.bytes.clear();
        for word in &self.words[..count] {
            self.bytes.extend_from_slice(&word.to_ne_bytes());
        }
        writer.write_all(&self.bytes)?;
        self.words.fill(0);
        self.blocks += 1;
        trace!("flushed block {} ({} words)", self.blocks, count);
        Ok(())
    }

    /// Flush the partially filled block, if any.
    ///
    /// Returns `(number_of_blocks, remaining_bits)` where `remaining_bits`
    /// counts the significant bits of the last block written.
    pub fn finish<W: Write>(mut self, writer: &mut W) -> Result<(u32, u32)> {
        let used = WORD_BITS - self.free_bits;
        let touched = self.word + usize::from(used > 0);

        if touched > 0 {
            let remaining = self.word as u32 * WORD_BITS + used;
            self.flush_words(touched, writer)?;
            Ok((self.blocks, remaining))
        } else if self.blocks > 0 {
            // the last full block is the final one
            Ok((self.blocks, BLOCK_BITS))
        } else {
            Ok((0, 0))
        }
    }

    /// Total code bits pushed so far.
    pub fn bits_packed(&self) -> u64 {
        self.bits_packed
    }
}

/// Compression plan for one source: its code table and size.
#[derive(Debug, Clone)]
pub struct Encoder {
    codes: CodeTable,
    source_len: u64,
}

impl Encoder {
    /// Count the source, build the tree and derive the code table.
    ///
    /// Nothing is written; errors like `EmptySource` or
    /// `CodeLengthOverflow` surface before any destination exists.
    pub fn prepare<R: Read>(source: &mut R) -> Result<Self> {
        let frequencies = FrequencyTable::count(source)?;
        Self::from_frequencies(&frequencies)
    }

    /// Build the plan from an existing frequency table.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        let tree = HuffmanTree::build(frequencies)?;
        let codes = CodeTable::generate(&tree)?;
        debug!(
            "{} bytes, {} distinct symbols, longest code {} bits",
            frequencies.total(),
            codes.len(),
            codes.max_length()
        );
        Ok(Self {
            codes,
            source_len: frequencies.total(),
        })
    }

    /// The derived code table.
    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    /// Number of bytes the plan was made for.
    pub fn source_len(&self) -> u64 {
        self.source_len
    }

    /// Write the archive for `source` (read from its start) to `dest`.
    ///
    /// `dest` must be positioned where the archive begins; on return it
    /// is positioned at the end of the payload.
    pub fn write<R, W, P>(
        &self,
        source: &mut R,
        dest: &mut W,
        progress: &mut P,
    ) -> Result<ArchiveHeader>
    where
        R: Read + Seek,
        W: Write + Seek,
        P: Progress + ?Sized,
    {
        let start = dest.stream_position()?;
        ArchiveHeader::default().write(dest)?;
        write_code_table(dest, self.codes.iter())?;

        source.seek(SeekFrom::Start(0))?;
        let mut packer = BlockPacker::new();
        let mut buf = [0u8; BUFFER_SIZE];
        let mut consumed = 0u64;

        loop {
            let n = match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            let mut flushed = false;
            for &byte in &buf[..n] {
                let entry = self.codes.get(byte).ok_or_else(|| {
                    QhuffError::invalid_code_table(byte, "symbol not counted; source changed")
                })?;
                flushed |= packer.push(entry, dest)?;
            }

            consumed += n as u64;
            if flushed && self.source_len > 0 {
                progress.report((consumed as f64 / self.source_len as f64).min(1.0) as f32);
            }
        }

        let bits_packed = packer.bits_packed();
        let (number_of_blocks, remaining_bits) = packer.finish(dest)?;
        let header = ArchiveHeader::new(self.codes.len(), number_of_blocks, remaining_bits);
        debug!(
            "packed {} bits into {} blocks, {} significant bits in the last",
            bits_packed, number_of_blocks, remaining_bits
        );

        let end = dest.stream_position()?;
        dest.seek(SeekFrom::Start(start))?;
        header.write(dest)?;
        dest.seek(SeekFrom::Start(end))?;
        dest.flush()?;

        progress.report(1.0);
        Ok(header)
    }
}

/// Compress `source` into `dest` in one call.
pub fn encode<R, W, P>(source: &mut R, dest: &mut W, progress: &mut P) -> Result<ArchiveHeader>
where
    R: Read + Seek,
    W: Write + Seek,
    P: Progress + ?Sized,
{
    source.seek(SeekFrom::Start(0))?;
    let encoder = Encoder::prepare(source)?;
    encoder.write(source, dest, progress)
}
