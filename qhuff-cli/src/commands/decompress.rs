//! Decompress command implementation.

use crate::utils::{PROGRESS_STEPS, create_progress_bar, default_restore_path, fraction_to_steps};
use log::debug;
use qhuff::HuffmanCodec;
use qhuff_core::QhuffError;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub fn cmd_decompress(
    archive: &Path,
    output: Option<PathBuf>,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output.unwrap_or_else(|| default_restore_path(archive));
    debug!("decompressing {} -> {}", archive.display(), output.display());

    let pb = create_progress_bar(PROGRESS_STEPS, progress);
    let sink = pb.clone();
    let mut codec =
        HuffmanCodec::new().with_progress(move |f: f32| sink.set_position(fraction_to_steps(f)));

    let started = Instant::now();
    let result = codec.decompress(archive, &output);
    let elapsed = started.elapsed();
    pb.finish_and_clear();

    let written = match result {
        Ok(written) => written,
        Err(e @ (QhuffError::TruncatedPayload { .. } | QhuffError::CorruptTreePath { .. })) => {
            eprintln!("Partial output kept in {}", output.display());
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Decoding completed in {:.5} sec", elapsed.as_secs_f64());
    println!(
        "{} -> {} ({} bytes)",
        archive.display(),
        output.display(),
        written
    );

    Ok(())
}
