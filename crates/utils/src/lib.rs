//! Shared utilities for cairn
//!
//! Logging setup, XDG directory resolution and atomic file writes used by
//! the configuration loader, the file-backed substrate and the CLI.

pub mod atomic_file;
pub mod tracing;
pub mod xdg;

pub use atomic_file::*;
pub use xdg::*;
