//! Error types for provisioning operations.
//!
//! This module defines [`SetupError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `SetupError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `SetupError::Other`) for unexpected errors
//! - Every fatal error carries an actionable remediation hint, see [`SetupError::hint`]

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for provisioning operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A configured version string could not be parsed.
    #[error("Malformed version '{input}': {reason}")]
    MalformedVersion { input: String, reason: String },

    /// Failed to parse the configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidation { message: String },

    /// An installer ran but reported failure, or could not be started.
    #[error("Installing {dependency} failed: {message}")]
    InstallExecution {
        dependency: String,
        message: String,
        hint: String,
    },

    /// The installer reported success but the dependency never showed up.
    #[error("{dependency} was installed but could not be verified after {attempts} attempts")]
    VerificationExhausted {
        dependency: String,
        attempts: u32,
        hint: String,
    },

    /// External command could not be started.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A download could not be completed.
    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    /// The launcher profile document could not be read or written.
    #[error("Could not register launcher profile in {path}: {message}")]
    ProfileRegistration { path: PathBuf, message: String },

    /// The modpack archive could not be unpacked.
    #[error("Failed to extract {archive} into {destination}: {message}")]
    Extraction {
        archive: PathBuf,
        destination: PathBuf,
        message: String,
    },

    /// A required directory could not be resolved or created.
    #[error("Directory error at {path}: {message}")]
    Directory { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SetupError {
    /// Remediation text to show after the error message, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            SetupError::InstallExecution { hint, .. } => {
                Some(format!("Install it manually from {}", hint))
            }
            SetupError::VerificationExhausted { hint, .. } => Some(format!(
                "The installer may need a restart or administrator rights. \
                 Restart your computer and run this again, or install manually from {}",
                hint
            )),
            SetupError::MalformedVersion { .. }
            | SetupError::ConfigParse { .. }
            | SetupError::ConfigValidation { .. } => {
                Some("Fix the settings in ~/.modpack-setup/config.yml".to_string())
            }
            SetupError::ProfileRegistration { .. } => Some(
                "Start the Minecraft launcher once so it creates launcher_profiles.json, then run this again"
                    .to_string(),
            ),
            SetupError::Extraction { .. } => Some("Unzip the modpack manually".to_string()),
            SetupError::Download { .. } => {
                Some("Check your internet connection and run this again".to_string())
            }
            SetupError::CommandFailed { .. }
            | SetupError::Directory { .. }
            | SetupError::Io(_)
            | SetupError::Other(_) => None,
        }
    }
}

/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, SetupError>;
