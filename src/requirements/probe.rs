//! Executable lookup and version probing.
//!
//! A runtime reports its version as the first quoted token on the first
//! line of `<executable> -version`, e.g.
//!
//! ```text
//! openjdk version "21.0.3" 2024-04-16 LTS
//! ```
//!
//! Anything else (no quotes, a non-numeric token like `"1.8.0_292"`, a
//! failed spawn) means the version is unknown, which never satisfies a
//! requirement but is not an error either.

use crate::requirements::version::Version;
use crate::shell::ProcessRunner;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Flag that makes the runtime print its version.
pub const VERSION_FLAG: &str = "-version";

/// First double-quoted token.
static QUOTED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("QUOTED_REGEX must compile"));

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// File name of an executable on this platform (`java` → `java.exe` on Windows).
pub fn executable_file_name(name: &str) -> String {
    let suffix = std::env::consts::EXE_SUFFIX;
    if suffix.is_empty() || Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

/// Resolve a tool's binary path by iterating over search-path entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let file_name = executable_file_name(tool);
    for dir in path_entries {
        let candidate = dir.join(&file_name);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Text between the first two `"` on the first line of `output`.
pub fn extract_quoted_version(output: &str) -> Option<&str> {
    let first_line = output.lines().next()?;
    QUOTED_REGEX
        .captures(first_line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse the version out of `-version` output.
pub fn parse_version_output(output: &str) -> Option<Version> {
    let Some(token) = extract_quoted_version(output) else {
        tracing::debug!("No quoted version in output: {:?}", output.lines().next());
        return None;
    };
    match Version::parse(token) {
        Ok(version) => Some(version),
        Err(e) => {
            tracing::debug!("Ignoring unparseable version: {}", e);
            None
        }
    }
}

/// Run `<executable> -version` and parse what it prints.
pub fn probe_version(runner: &dyn ProcessRunner, executable: &Path) -> Option<Version> {
    let argv = vec![
        executable.to_string_lossy().to_string(),
        VERSION_FLAG.to_string(),
    ];
    match runner.capture(&argv) {
        Ok(result) => parse_version_output(&result.combined_output()),
        Err(e) => {
            tracing::debug!("Could not probe {}: {}", executable.display(), e);
            None
        }
    }
}
