//! Error types for cairn operations

mod builders;
mod conversions;
mod types;

pub use types::{Error, Result};
