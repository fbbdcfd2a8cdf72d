//! Atomic file writes so a crash never leaves a half-written store document

use cairn_core::{Error, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

/// Write data to a file atomically by writing to a temporary file and renaming
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::configuration("Invalid file path: no parent directory"))?;

    fs::create_dir_all(parent)
        .map_err(|e| Error::file_system(parent, "create parent directory", e))?;

    // Same directory as the target so the rename stays on one file system
    let temp_path = parent.join(format!(".{}.tmp", Uuid::new_v4()));

    let result = (|| -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| Error::file_system(&temp_path, "create temporary file", e))?;

        file.write_all(content)
            .map_err(|e| Error::file_system(&temp_path, "write to temporary file", e))?;

        file.sync_all()
            .map_err(|e| Error::file_system(&temp_path, "sync temporary file", e))?;

        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
        return result;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::file_system(path, "atomic rename", e)
    })?;

    Ok(())
}
