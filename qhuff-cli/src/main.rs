//! qhuff CLI - static Huffman file compressor
//!
//! Compresses single files into `.huff` archives and restores them.

mod commands;
mod utils;

use clap::{ArgAction, Parser, Subcommand};
use commands::{cmd_compress, cmd_decompress, cmd_info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qhuff")]
#[command(author, version, about = "Static Huffman file compressor")]
#[command(long_about = "
qhuff compresses a single file with a static Huffman code built from the
file's own byte frequencies. The code table is stored in the archive.

Examples:
  qhuff compress notes.txt
  qhuff compress notes.txt -o notes.qh --progress
  qhuff decompress notes.txt.huff
  qhuff decompress notes.qh -o restored.txt
  qhuff info notes.txt.huff --codes
  qhuff info notes.txt.huff --json
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    #[command(alias = "c")]
    Compress {
        /// File to compress
        input: PathBuf,

        /// Output archive (defaults to INPUT.huff)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Decompress an archive
    #[command(alias = "d")]
    Decompress {
        /// Archive to decompress
        archive: PathBuf,

        /// Output file (defaults to ARCHIVE without .huff, or ARCHIVE.out)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Show header and code table of an archive
    #[command(alias = "i")]
    Info {
        /// Archive to inspect
        archive: PathBuf,

        /// Print every code in the table
        #[arg(long)]
        codes: bool,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            progress,
        } => cmd_compress(&input, output, progress),
        Commands::Decompress {
            archive,
            output,
            progress,
        } => cmd_decompress(&archive, output, progress),
        Commands::Info {
            archive,
            codes,
            json,
        } => cmd_info(&archive, codes, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
