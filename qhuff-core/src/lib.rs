//! # qhuff Core
//!
//! Core components shared by the qhuff codec and its command-line front end.
//!
//! - [`error`]: Error types and the crate-wide `Result` alias
//! - [`progress`]: Progress sinks the codec reports into
//!
//! ## Example
//!
//! ```rust
//! use qhuff_core::progress::Progress;
//! use std::sync::mpsc;
//!
//! let (tx, rx) = mpsc::channel();
//! let mut sink = tx;
//! sink.report(0.5);
//! assert_eq!(rx.recv().unwrap(), 0.5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod progress;

// Re-exports for convenience
pub use error::{QhuffError, Result};
pub use progress::{Monotonic, NoProgress, Progress};
