//! In-memory environment for testing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::{join_search_path, Environment, SEARCH_PATH_VAR};

/// [`Environment`] that keeps variables in a map instead of the process.
#[derive(Debug, Clone)]
pub struct MemoryEnvironment {
    vars: RefCell<HashMap<String, OsString>>,
    home: Option<PathBuf>,
    data: Option<PathBuf>,
    temp: PathBuf,
}

impl Default for MemoryEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEnvironment {
    /// Empty environment with no home directory and `/tmp` as temp dir.
    pub fn new() -> Self {
        Self {
            vars: RefCell::new(HashMap::new()),
            home: None,
            data: None,
            temp: PathBuf::from("/tmp"),
        }
    }

    /// Environment whose search path holds `entries`.
    pub fn with_path<P: AsRef<Path>>(entries: &[P]) -> Self {
        let env = Self::new();
        let entries: Vec<PathBuf> = entries.iter().map(|p| p.as_ref().to_path_buf()).collect();
        if let Ok(joined) = join_search_path(&entries) {
            env.set_var_os(SEARCH_PATH_VAR, joined);
        }
        env
    }

    /// Set the home directory.
    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Set the application data directory.
    pub fn data(mut self, data: impl Into<PathBuf>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the temp directory.
    pub fn temp(mut self, temp: impl Into<PathBuf>) -> Self {
        self.temp = temp.into();
        self
    }

    /// Set a variable.
    pub fn set_var(&self, key: &str, value: &str) {
        self.set_var_os(key, value);
    }

    /// Set a variable to a value that need not be unicode.
    pub fn set_var_os(&self, key: &str, value: impl Into<OsString>) {
        self.vars.borrow_mut().insert(key.to_string(), value.into());
    }
}

impl Environment for MemoryEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.var_os(key)?.into_string().ok()
    }

    fn var_os(&self, key: &str) -> Option<OsString> {
        self.vars.borrow().get(key).cloned()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn data_dir(&self) -> Option<PathBuf> {
        self.data.clone()
    }

    fn temp_dir(&self) -> PathBuf {
        self.temp.clone()
    }

    fn set_search_path(&self, entries: &[PathBuf]) -> Result<()> {
        let joined = join_search_path(entries)?;
        self.set_var_os(SEARCH_PATH_VAR, joined);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_back_variables() {
        let env = MemoryEnvironment::new();
        env.set_var("TEMP", "C:\\Temp");
        assert_eq!(env.var("TEMP").as_deref(), Some("C:\\Temp"));
        assert!(env.var("MISSING").is_none());
    }

    #[test]
    fn builder_sets_home_and_temp() {
        let env = MemoryEnvironment::new().home("/home/player").temp("/scratch");
        assert_eq!(env.home_dir(), Some(PathBuf::from("/home/player")));
        assert_eq!(env.temp_dir(), PathBuf::from("/scratch"));
    }

    #[test]
    fn with_path_splits_entries() {
        let env = MemoryEnvironment::with_path(&["/usr/local/bin", "/usr/bin"]);
        assert_eq!(
            env.search_path(),
            vec![PathBuf::from("/usr/local/bin"), PathBuf::from("/usr/bin")]
        );
    }
}
