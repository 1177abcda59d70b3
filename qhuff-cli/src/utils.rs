//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension appended to compressed files.
pub const ARCHIVE_EXTENSION: &str = "huff";

/// Extension used when the archive name carries no `.huff` to strip.
pub const FALLBACK_EXTENSION: &str = "out";

/// Number of steps the progress bar is divided into.
pub const PROGRESS_STEPS: u64 = 1000;

/// Install the terminal logger. Logs go to stderr so they never mix with
/// command output.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    // A logger may already be installed when embedded; keep the existing one.
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {percent:>3}% {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░ "));
    }
    pb
}

/// Map a progress fraction in `0.0..=1.0` onto the bar's step count.
pub fn fraction_to_steps(fraction: f32) -> u64 {
    let clamped = fraction.clamp(0.0, 1.0);
    (f64::from(clamped) * PROGRESS_STEPS as f64).round() as u64
}

/// Default archive path for `input`: the same path with `.huff` appended.
pub fn default_archive_path(input: &Path) -> PathBuf {
    append_extension(input, ARCHIVE_EXTENSION)
}

/// Default output path for `archive`: `.huff` stripped when present,
/// otherwise `.out` appended.
pub fn default_restore_path(archive: &Path) -> PathBuf {
    let has_archive_ext = archive
        .extension()
        .is_some_and(|ext| ext == ARCHIVE_EXTENSION);
    let has_stem = archive.file_stem().is_some_and(|stem| !stem.is_empty());

    if has_archive_ext && has_stem {
        archive.with_extension("")
    } else {
        append_extension(archive, FALLBACK_EXTENSION)
    }
}

fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Percentage of space saved going from `original` to `compressed` bytes.
pub fn space_saving(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - compressed as f64 / original as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_archive_path() {
        assert_eq!(
            default_archive_path(Path::new("notes.txt")),
            PathBuf::from("notes.txt.huff")
        );
        assert_eq!(
            default_archive_path(Path::new("dir/data")),
            PathBuf::from("dir/data.huff")
        );
    }

    #[test]
    fn test_default_restore_path_strips_extension() {
        assert_eq!(
            default_restore_path(Path::new("notes.txt.huff")),
            PathBuf::from("notes.txt")
        );
        assert_eq!(
            default_restore_path(Path::new("dir/data.huff")),
            PathBuf::from("dir/data")
        );
    }

    #[test]
    fn test_default_restore_path_fallback() {
        assert_eq!(
            default_restore_path(Path::new("notes.qh")),
            PathBuf::from("notes.qh.out")
        );
        assert_eq!(
            default_restore_path(Path::new("archive")),
            PathBuf::from("archive.out")
        );
        assert_eq!(
            default_restore_path(Path::new(".huff")),
            PathBuf::from(".huff.out")
        );
    }

    #[test]
    fn test_fraction_to_steps() {
        assert_eq!(fraction_to_steps(0.0), 0);
        assert_eq!(fraction_to_steps(0.5), 500);
        assert_eq!(fraction_to_steps(1.0), PROGRESS_STEPS);
        assert_eq!(fraction_to_steps(1.5), PROGRESS_STEPS);
        assert_eq!(fraction_to_steps(-0.2), 0);
    }

    #[test]
    fn test_space_saving() {
        assert_eq!(space_saving(0, 10), 0.0);
        assert!((space_saving(100, 25) - 75.0).abs() < 1e-9);
        assert!(space_saving(10, 20) < 0.0);
    }
}
