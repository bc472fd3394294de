//! Atomic save and validated load for group `.json` files.
//!
//! # Save
//! 1. Serialize the [`Group`] as pretty-printed JSON (two-space indent).
//! 2. Write the bytes to `<target>.tmp` (same directory → same filesystem as
//!    the final path) and sync them to disk.
//! 3. Atomically rename the temp file over the target.
//! On any failure the temp file is deleted and the original is left intact.
//!
//! # Load
//! Parse the bytes into a [`Group`]. Anything that is not a JSON object with
//! correctly typed known keys is reported as [`AppError::Corrupt`].

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::Group;

/// Serialize `group` exactly as it is stored on disk.
pub fn encode(group: &Group) -> Result<Vec<u8>, AppError> {
    serde_json::to_vec_pretty(group)
        .map_err(|e| AppError::Io(format!("cannot serialize group: {e}")))
}

/// Parse stored bytes. `filename` is only used in the error message.
pub fn decode(bytes: &[u8], filename: &str) -> Result<Group, AppError> {
    serde_json::from_slice(bytes).map_err(|e| {
        AppError::Corrupt(format!(
            "File \"{filename}\" is not a valid group document: {e}"
        ))
    })
}

/// Path of the temp file used while replacing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    path.with_file_name(format!("{file_name}.tmp"))
}

/// Replace the contents of `path` with `bytes` using an atomic rename.
///
/// On any error the temp file is removed and `path` is left unchanged.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let tmp_path = temp_path(path);

    if let Err(e) = write_temp(&tmp_path, bytes) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        AppError::Io(format!("rename to final path failed: {e}"))
    })
}

/// Write and sync the temp file.
///
/// Separated from [`write_atomic`] so that cleanup on error is handled
/// entirely by the caller.
fn write_temp(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let mut file = std::fs::File::create(path)
        .map_err(|e| AppError::Io(format!("cannot create temp file: {e}")))?;
    file.write_all(bytes)
        .map_err(|e| AppError::Io(format!("cannot write temp file: {e}")))?;
    file.sync_all()
        .map_err(|e| AppError::Io(format!("cannot sync temp file: {e}")))?;
    Ok(())
}
