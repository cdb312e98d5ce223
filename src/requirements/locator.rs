//! Candidate discovery for executables.
//!
//! Two places are searched: the process search path, and a fixed ordered
//! list of installation roots where each immediate subdirectory is one
//! installed copy laid out as `<copy>/bin/<executable>`.

use crate::environment::Environment;
use crate::requirements::probe::{executable_file_name, probe_version, resolve_tool_path};
use crate::requirements::status::Candidate;
use crate::requirements::version::Version;
use crate::shell::ProcessRunner;
use std::fs;
use std::path::{Path, PathBuf};

/// Finds installed copies of an executable and the versions they report.
pub struct CandidateLocator<'a> {
    runner: &'a dyn ProcessRunner,
    env: &'a dyn Environment,
}

impl<'a> CandidateLocator<'a> {
    /// Create a locator probing through `runner` and searching `env`'s path.
    pub fn new(runner: &'a dyn ProcessRunner, env: &'a dyn Environment) -> Self {
        Self { runner, env }
    }

    /// Look the executable up by bare name on the search path.
    ///
    /// Returns the first match with whatever version it reports; the
    /// caller decides whether that version is good enough.
    pub fn find_on_search_path(&self, executable: &str) -> Option<Candidate> {
        let path = resolve_tool_path(executable, &self.env.search_path())?;
        let version = probe_version(self.runner, &path);
        tracing::debug!(
            "Found {} on search path (version {})",
            path.display(),
            version
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unknown".to_string())
        );
        Some(Candidate::new(path, version))
    }

    /// First installed copy under `roots` whose version is at least `min_version`.
    ///
    /// Roots are searched in order and subdirectories in directory-listing
    /// order. A later, newer copy is never preferred over an earlier one
    /// that is sufficient.
    pub fn find_in_known_roots(
        &self,
        roots: &[PathBuf],
        executable: &str,
        min_version: &Version,
    ) -> Option<Candidate> {
        let file_name = executable_file_name(executable);

        for root in roots {
            for copy in installed_copies(root) {
                let path = copy.join("bin").join(&file_name);
                if !path.is_file() {
                    continue;
                }

                let candidate = Candidate::new(&path, probe_version(self.runner, &path));
                if candidate.satisfies(min_version) {
                    tracing::info!(
                        "Found {} {} at {}",
                        executable,
                        candidate.version_label(),
                        path.display()
                    );
                    return Some(candidate);
                }
                tracing::debug!(
                    "Skipping {} (version {}, need {})",
                    path.display(),
                    candidate.version_label(),
                    min_version
                );
            }
        }

        None
    }

    /// Search-path copy if it satisfies `min_version`, otherwise the first
    /// sufficient copy under `roots`.
    ///
    /// Any search-path result that does not satisfy the requirement, for
    /// whatever reason, falls through to the root scan.
    pub fn find_sufficient(
        &self,
        executable: &str,
        roots: &[PathBuf],
        min_version: &Version,
    ) -> Option<Candidate> {
        self.find_on_search_path(executable)
            .filter(|candidate| candidate.satisfies(min_version))
            .or_else(|| self.find_in_known_roots(roots, executable, min_version))
    }
}

/// Immediate subdirectories of `root`, in listing order. Unreadable roots yield nothing.
fn installed_copies(root: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Skipping {}: {}", root.display(), e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect()
}
