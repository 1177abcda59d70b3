//! Compress command implementation.

use crate::utils::{
    PROGRESS_STEPS, create_progress_bar, default_archive_path, fraction_to_steps, space_saving,
};
use log::debug;
use qhuff::HuffmanCodec;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub fn cmd_compress(
    input: &Path,
    output: Option<PathBuf>,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output.unwrap_or_else(|| default_archive_path(input));
    debug!("compressing {} -> {}", input.display(), output.display());

    let pb = create_progress_bar(PROGRESS_STEPS, progress);
    let sink = pb.clone();
    let mut codec =
        HuffmanCodec::new().with_progress(move |f: f32| sink.set_position(fraction_to_steps(f)));

    let started = Instant::now();
    let result = codec.compress(input, &output);
    let elapsed = started.elapsed();
    pb.finish_and_clear();
    let header = result?;

    println!("Encoding completed in {:.5} sec", elapsed.as_secs_f64());

    let original = std::fs::metadata(input)?.len();
    let compressed = std::fs::metadata(&output)?.len();
    println!(
        "{} -> {} ({} -> {} bytes, {:.1}% saved, {} block{})",
        input.display(),
        output.display(),
        original,
        compressed,
        space_saving(original, compressed),
        header.number_of_blocks,
        if header.number_of_blocks == 1 { "" } else { "s" },
    );

    Ok(())
}
