//! Info command implementation.

use crate::utils::space_saving;
use qhuff::{ArchiveInfo, BLOCK_BITS, CodeEntry, inspect};
use serde::Serialize;
use std::path::Path;

/// JSON serializable code table entry.
#[derive(Debug, Serialize)]
struct CodeJson {
    symbol: u8,
    length: u8,
    code: String,
}

impl CodeJson {
    fn from_entry(entry: &CodeEntry) -> Self {
        Self {
            symbol: entry.symbol,
            length: entry.length,
            code: entry.bit_string(),
        }
    }
}

/// JSON output for archive information.
#[derive(Debug, Serialize)]
struct ArchiveInfoJson {
    archive: String,
    size: u64,
    table_length: usize,
    number_of_blocks: u32,
    remaining_bits: u32,
    payload_offset: u64,
    payload_size: u64,
    significant_bits: u64,
    max_code_length: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    codes: Option<Vec<CodeJson>>,
}

pub fn cmd_info(archive: &Path, codes: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let info = inspect(archive)?;

    if json {
        let output = ArchiveInfoJson {
            archive: archive.display().to_string(),
            size: info.archive_len,
            table_length: info.header.entry_count(),
            number_of_blocks: info.header.number_of_blocks,
            remaining_bits: info.header.remaining_bits,
            payload_offset: info.payload_offset(),
            payload_size: info.payload_len(),
            significant_bits: significant_bits(&info),
            max_code_length: info.codes.max_length(),
            codes: codes.then(|| info.codes.iter().map(|e| CodeJson::from_entry(&e)).collect()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let header = &info.header;

    println!("Archive Information");
    println!("===================");
    println!("File: {}", archive.display());
    println!("Size: {} bytes", info.archive_len);

    println!();
    println!("Header:");
    println!(
        "  Table length: {} (stored as {})",
        header.entry_count(),
        header.table_length
    );
    println!("  Blocks: {}", header.number_of_blocks);
    println!("  Remaining bits: {}", header.remaining_bits);

    println!();
    println!("Payload:");
    println!("  Offset: {} bytes", info.payload_offset());
    println!("  Stored: {} bytes", info.payload_len());
    println!("  Significant bits: {}", significant_bits(&info));

    let total_length: u64 = info.codes.iter().map(|e| u64::from(e.length)).sum();

    println!();
    println!("Code table:");
    println!("  Symbols: {}", info.codes.len());
    println!("  Longest code: {} bits", info.codes.max_length());
    if !info.codes.is_empty() {
        println!(
            "  Mean code length: {:.2} bits ({:.1}% below 8-bit)",
            total_length as f64 / info.codes.len() as f64,
            space_saving(8 * info.codes.len() as u64, total_length),
        );
    }

    if codes {
        println!();
        println!("{:>6} {:>6}  Code", "Symbol", "Length");
        println!("{}", "-".repeat(48));
        for entry in info.codes.iter() {
            println!(
                "{:>6} {:>6}  {}",
                display_symbol(entry.symbol),
                entry.length,
                entry.bit_string()
            );
        }
    }

    Ok(())
}

/// Payload bits the header declares meaningful.
fn significant_bits(info: &ArchiveInfo) -> u64 {
    u64::from(info.header.number_of_blocks.saturating_sub(1)) * u64::from(BLOCK_BITS)
        + u64::from(info.header.remaining_bits)
}

fn display_symbol(symbol: u8) -> String {
    if symbol.is_ascii_graphic() {
        format!("'{}'", symbol as char)
    } else {
        format!("0x{:02x}", symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_symbol() {
        assert_eq!(display_symbol(b'a'), "'a'");
        assert_eq!(display_symbol(b' '), "0x20");
        assert_eq!(display_symbol(0), "0x00");
        assert_eq!(display_symbol(0xff), "0xff");
    }

    #[test]
    fn test_code_json() {
        let entry = CodeEntry::new(b'a', 3, 0b011);
        let json = serde_json::to_value(CodeJson::from_entry(&entry)).unwrap();
        assert_eq!(json["symbol"], 97);
        assert_eq!(json["length"], 3);
        assert_eq!(json["code"], "110");
    }
}
