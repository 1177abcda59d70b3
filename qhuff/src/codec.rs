//! File-level compress and decompress operations.

use crate::codes::CodeTable;
use crate::decode::{PayloadDecoder, read_preamble};
use crate::encode::Encoder;
use crate::format::{ArchiveHeader, CODE_ENTRY_SIZE, HEADER_SIZE};
use crate::tree::HuffmanTree;
use log::info;
use qhuff_core::error::{QhuffError, Result};
use qhuff_core::progress::{Monotonic, NoProgress, Progress};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// I/O buffer size for file readers and writers.
const FILE_BUFFER: usize = 64 * 1024;

/// Huffman codec with an optional progress sink.
///
/// ```rust,no_run
/// use qhuff::HuffmanCodec;
///
/// let mut codec = HuffmanCodec::new().with_progress(|f: f32| eprint!("\r{:3.0}%", f * 100.0));
/// codec.compress("notes.txt", "notes.txt.huff")?;
/// codec.decompress("notes.txt.huff", "notes.out")?;
/// # Ok::<(), qhuff_core::QhuffError>(())
/// ```
#[derive(Debug, Default)]
pub struct HuffmanCodec<P = NoProgress> {
    progress: P,
}

impl HuffmanCodec {
    /// Create a codec without progress reporting.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: Progress> HuffmanCodec<P> {
    /// Report progress fractions to `progress`.
    pub fn with_progress<Q: Progress>(self, progress: Q) -> HuffmanCodec<Q> {
        HuffmanCodec { progress }
    }

    /// Compress the file at `source` into a new archive at `dest`.
    ///
    /// The destination is only created once the code table exists, so an
    /// empty source leaves no file behind. A failure while writing leaves
    /// the partial archive in place.
    pub fn compress(
        &mut self,
        source: impl AsRef<Path>,
        dest: impl AsRef<Path>,
    ) -> Result<ArchiveHeader> {
        let (source, dest) = (source.as_ref(), dest.as_ref());

        let file = File::open(source).map_err(|e| QhuffError::source_open(source, e))?;
        let mut reader = BufReader::with_capacity(FILE_BUFFER, file);
        let encoder = Encoder::prepare(&mut reader)?;

        let file = File::create(dest).map_err(|e| QhuffError::dest_open(dest, e))?;
        let mut writer = BufWriter::with_capacity(FILE_BUFFER, file);
        let mut progress = Monotonic::new(&mut self.progress);
        let header = encoder.write(&mut reader, &mut writer, &mut progress)?;

        info!(
            "compressed {} ({} bytes) into {} ({} blocks)",
            source.display(),
            encoder.source_len(),
            dest.display(),
            header.number_of_blocks
        );
        Ok(header)
    }

    /// Decompress the archive at `source` into `dest`.
    ///
    /// The header and code table are validated before `dest` is created.
    /// If the payload turns out to be corrupt, the bytes decoded before
    /// the damage are still written to `dest`. Returns the number of
    /// decoded bytes.
    pub fn decompress(&mut self, source: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<u64> {
        let (source, dest) = (source.as_ref(), dest.as_ref());

        let file = File::open(source).map_err(|e| QhuffError::source_open(source, e))?;
        let mut reader = BufReader::with_capacity(FILE_BUFFER, file);
        let (header, entries) = read_preamble(&mut reader)?;
        let tree = HuffmanTree::rebuild(&entries)?;

        let file = File::create(dest).map_err(|e| QhuffError::dest_open(dest, e))?;
        let mut writer = BufWriter::with_capacity(FILE_BUFFER, file);
        let mut progress = Monotonic::new(&mut self.progress);
        let mut decoder = PayloadDecoder::new(&tree, header);
        let written = decoder.run(&mut reader, &mut writer, &mut progress)?;

        info!(
            "decompressed {} into {} ({} bytes)",
            source.display(),
            dest.display(),
            written
        );
        Ok(written)
    }
}

/// Compress the file at `source` into `dest`.
pub fn compress(source: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    HuffmanCodec::new().compress(source, dest).map(|_| ())
}

/// Decompress the archive at `source` into `dest`.
pub fn decompress(source: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    HuffmanCodec::new().decompress(source, dest).map(|_| ())
}

/// Header and code table of an archive, read without decoding the payload.
#[derive(Debug, Clone)]
pub struct ArchiveInfo {
    /// The archive header.
    pub header: ArchiveHeader,
    /// The stored code table.
    pub codes: CodeTable,
    /// Size of the archive file in bytes.
    pub archive_len: u64,
}

impl ArchiveInfo {
    /// Offset of the first payload block.
    pub fn payload_offset(&self) -> u64 {
        (HEADER_SIZE + self.codes.len() * CODE_ENTRY_SIZE) as u64
    }

    /// Payload bytes present in the file.
    pub fn payload_len(&self) -> u64 {
        self.archive_len.saturating_sub(self.payload_offset())
    }
}

/// Read the header and code table of the archive at `path`.
///
/// The code table is checked by rebuilding the tree, so a table that
/// would fail to decode fails here too.
pub fn inspect(path: impl AsRef<Path>) -> Result<ArchiveInfo> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| QhuffError::source_open(path, e))?;
    let archive_len = file.metadata()?.len();

    let mut reader = BufReader::new(file);
    let (header, entries) = read_preamble(&mut reader)?;
    HuffmanTree::rebuild(&entries)?;

    Ok(ArchiveInfo {
        header,
        codes: CodeTable::from_entries(&entries),
        archive_len,
    })
}
