//! Directory helpers.

use crate::error::{Result, SetupError};
use std::fs;
use std::path::Path;

/// Create `path` and any missing parents.
///
/// An existing directory is not an error. Returns `true` if anything was created.
pub fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path).map_err(|e| SetupError::Directory {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::debug!("Created directory {}", path.display());
    Ok(true)
}
