//! Process environment access.
//!
//! The only environment state the installer touches is a handful of
//! variables it reads (home, temp) and the executable search path it
//! prepends to. Both go through [`Environment`] so the orchestrator can be
//! exercised against [`MemoryEnvironment`] without changing the real `PATH`.
//!
//! # Example
//!
//! ```
//! use modpack_setup::environment::{Environment, MemoryEnvironment};
//! use std::path::Path;
//!
//! let env = MemoryEnvironment::with_path(&["/usr/bin"]);
//! assert!(env.prepend_search_path(Path::new("/opt/jdk/bin")).unwrap());
//! assert!(!env.prepend_search_path(Path::new("/opt/jdk/bin")).unwrap());
//! assert_eq!(env.search_path()[0], Path::new("/opt/jdk/bin"));
//! ```

pub mod memory;

pub use memory::MemoryEnvironment;

use crate::error::{Result, SetupError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Name of the executable search-path variable.
pub const SEARCH_PATH_VAR: &str = "PATH";

/// Read access to the process environment plus search-path prepending.
pub trait Environment {
    /// Value of an environment variable, if set and valid unicode.
    fn var(&self, key: &str) -> Option<String>;

    /// Raw value of an environment variable, whatever its encoding.
    fn var_os(&self, key: &str) -> Option<OsString>;

    /// The user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Per-user application data directory (`%APPDATA%` on Windows).
    fn data_dir(&self) -> Option<PathBuf>;

    /// Directory for downloaded installers and archives.
    fn temp_dir(&self) -> PathBuf;

    /// Replace the executable search path.
    fn set_search_path(&self, entries: &[PathBuf]) -> Result<()>;

    /// Entries of the executable search path, in lookup order.
    ///
    /// Entries that are not valid unicode are kept as they are.
    fn search_path(&self) -> Vec<PathBuf> {
        self.var_os(SEARCH_PATH_VAR)
            .map(|value| std::env::split_paths(&value).collect())
            .unwrap_or_default()
    }

    /// Whether `dir` is already one of the search-path entries.
    fn on_search_path(&self, dir: &Path) -> bool {
        self.search_path()
            .iter()
            .any(|entry| same_search_entry(entry, dir))
    }

    /// Put `dir` at the front of the search path unless it is already on it.
    ///
    /// Returns `true` if the path changed.
    fn prepend_search_path(&self, dir: &Path) -> Result<bool> {
        if self.on_search_path(dir) {
            tracing::debug!("{} is already on {}", dir.display(), SEARCH_PATH_VAR);
            return Ok(false);
        }
        let mut entries = vec![dir.to_path_buf()];
        entries.extend(self.search_path());
        self.set_search_path(&entries)?;
        tracing::info!("Added {} to {} for this session", dir.display(), SEARCH_PATH_VAR);
        Ok(true)
    }
}

/// Join search-path entries with the platform separator.
pub fn join_search_path(entries: &[PathBuf]) -> Result<OsString> {
    std::env::join_paths(entries).map_err(|e| SetupError::Directory {
        path: entries.first().cloned().unwrap_or_default(),
        message: e.to_string(),
    })
}

/// Whether two search-path entries name the same directory.
///
/// Trailing separators are ignored, and on Windows so is case.
pub fn same_search_entry(a: &Path, b: &Path) -> bool {
    if cfg!(windows) {
        let normalize = |p: &Path| {
            p.to_string_lossy()
                .trim_end_matches(['\\', '/'])
                .replace('/', "\\")
                .to_lowercase()
        };
        normalize(a) == normalize(b)
    } else {
        a.components().eq(b.components())
    }
}

/// [`Environment`] backed by the real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn data_dir(&self) -> Option<PathBuf> {
        dirs::data_dir()
    }

    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }

    fn set_search_path(&self, entries: &[PathBuf]) -> Result<()> {
        let joined = join_search_path(entries)?;
        // Single-threaded: nothing else reads the environment concurrently.
        std::env::set_var(SEARCH_PATH_VAR, joined);
        Ok(())
    }
}
