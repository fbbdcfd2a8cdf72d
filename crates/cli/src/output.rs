//! Command output on stdout

use cairn_core::Result;
use serde::Serialize;

/// Print `value` as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
