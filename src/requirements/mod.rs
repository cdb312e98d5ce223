//! Dependency detection, installation and verification.
//!
//! This module decides whether a required dependency (a runtime, a mod
//! loader) is already installed at a sufficient version, installs it when
//! it is not, and re-verifies the result with a bounded number of attempts.
//!
//! # Modules
//!
//! - [`version`] - Dotted version parsing and zero-padded comparison
//! - [`probe`] - Executable lookup and `-version` probing
//! - [`locator`] - Candidate discovery on the search path and in known roots
//! - [`status`] - Candidates, outcomes and failure reasons
//! - [`validator`] - The detect → install → re-verify state machine
//! - [`orchestrator`] - Ordered validation of several dependencies

pub mod locator;
pub mod orchestrator;
pub mod probe;
pub mod status;
pub mod validator;
pub mod version;

pub use locator::CandidateLocator;
pub use orchestrator::InstallOrchestrator;
pub use status::{
    Candidate, DetectionGap, FailureReason, InstallError, Resolved, ValidationOutcome,
};
pub use validator::{DependencySpec, DependencyValidator, RetryPolicy, ValidationState};
pub use version::{compare_at_least, Version};
