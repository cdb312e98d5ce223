//! Result types for dependency detection and validation.
//!
//! Detection produces a [`Candidate`]; a validation run ends in a
//! [`ValidationOutcome`]. Resolved candidates are collected in [`Resolved`]
//! so later dependencies can use earlier ones.

use crate::error::SetupError;
use crate::requirements::version::Version;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One discovered installation of a dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Executable path (runtimes) or installation directory (loaders).
    pub location: PathBuf,
    /// Reported version, `None` if probing could not determine one.
    pub version: Option<Version>,
}

impl Candidate {
    /// Create a candidate.
    pub fn new(location: impl Into<PathBuf>, version: Option<Version>) -> Self {
        Self {
            location: location.into(),
            version,
        }
    }

    /// Whether the reported version meets `required`. Unknown versions never do.
    pub fn satisfies(&self, required: &Version) -> bool {
        self.version
            .as_ref()
            .is_some_and(|version| version.is_at_least(required))
    }

    /// Directory holding the candidate's executable.
    pub fn bin_dir(&self) -> Option<&Path> {
        self.location.parent()
    }

    /// Version for display, `"unknown"` when not detected.
    pub fn version_label(&self) -> String {
        self.version
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Why a detection did not satisfy the requirement. Both cases trigger an install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionGap {
    /// No installation anywhere.
    NotFound,
    /// Found, but the version is too low or unknown.
    Insufficient { found: Candidate },
}

impl fmt::Display for DetectionGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionGap::NotFound => write!(f, "not found"),
            DetectionGap::Insufficient { found } => write!(
                f,
                "found version {} at {}, which is too old",
                found.version_label(),
                found.location.display()
            ),
        }
    }
}

/// Error reported by a dependency's install procedure.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The installer process exited unsuccessfully.
    #[error("'{command}' exited with code {code:?}")]
    ExitStatus { command: String, code: Option<i32> },

    /// Another dependency this installer needs has not been resolved.
    #[error("requires {dependency}, which has not been resolved")]
    MissingPrerequisite { dependency: String },

    /// Download, spawn or filesystem failure while installing.
    #[error(transparent)]
    Setup(#[from] SetupError),
}

/// Why a validation run failed. Both variants are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The install procedure failed; it is not retried.
    InstallExecution { message: String },
    /// Installed, but detection never confirmed it.
    VerificationExhausted { attempts: u32 },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::InstallExecution { message } => write!(f, "{}", message),
            FailureReason::VerificationExhausted { attempts } => {
                write!(f, "not detected after {} verification attempts", attempts)
            }
        }
    }
}

/// Terminal result of validating one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Present at a sufficient version before anything was installed.
    AlreadySatisfied(Candidate),
    /// Installed during this run and confirmed by re-detection.
    InstalledAndVerified(Candidate),
    /// Could not be satisfied.
    Failed(FailureReason),
}

impl ValidationOutcome {
    /// The resolved candidate, if the dependency is satisfied.
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            ValidationOutcome::AlreadySatisfied(c) | ValidationOutcome::InstalledAndVerified(c) => {
                Some(c)
            }
            ValidationOutcome::Failed(_) => None,
        }
    }

    /// Whether the dependency ended up satisfied.
    pub fn is_satisfied(&self) -> bool {
        self.candidate().is_some()
    }
}

/// Dependencies resolved so far, by name.
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    candidates: BTreeMap<String, Candidate>,
}

impl Resolved {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the candidate for `name`.
    pub fn insert(&mut self, name: impl Into<String>, candidate: Candidate) {
        self.candidates.insert(name.into(), candidate);
    }

    /// Candidate resolved for `name`.
    pub fn get(&self, name: &str) -> Option<&Candidate> {
        self.candidates.get(name)
    }

    /// Number of resolved dependencies.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether nothing is resolved yet.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Iterate name/candidate pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Candidate)> {
        self.candidates.iter()
    }
}
