use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {path}: {message}")]
    OutputDir { path: String, message: String },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
}

/// Ensure a directory exists; create it (and parents) if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    let dir_error = |message: String| PersistError::OutputDir {
        path: dir.display().to_string(),
        message,
    };

    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| dir_error(e.to_string()))?;
        if !meta.is_dir() {
            return Err(dir_error("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| dir_error(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write `bytes` to `{dir}/{filename}`.
///
/// The content goes to a temp file in the same directory, is synced, and is then
/// renamed over the target. A reader sees either the old file, the new file, or
/// no file; never a truncated one.
pub fn write_atomic(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
    ensure_dir(dir)?;

    let target = dir.join(filename);
    let write_error = |source: io::Error| PersistError::Write {
        path: target.display().to_string(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(bytes).map_err(write_error)?;
    tmp.flush().map_err(write_error)?;
    tmp.as_file_mut().sync_all().map_err(write_error)?;

    tmp.persist(&target).map_err(|e| write_error(e.error))?;
    Ok(target)
}
