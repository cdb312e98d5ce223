//! Detect → install → re-verify cycle for a single dependency.
//!
//! A [`DependencyValidator`] drives one [`DependencySpec`] through
//! [`ValidationState`] until it is satisfied or has failed:
//!
//! ```text
//! Unchecked ──detect ok──────────────────────────────▶ Satisfied
//!     │ not found / too old
//!     ▼
//! Installing ──install failed────────────────────────▶ Failed(InstallExecution)
//!     │ ok
//!     ▼
//! Reverifying(1) ─▶ … ─▶ Reverifying(max) ──still missing──▶ Failed(VerificationExhausted)
//!     └──────── detect ok at any attempt ────────────▶ Satisfied
//! ```
//!
//! Only detection is retried. A failed install is never run again.

use crate::requirements::status::{
    Candidate, DetectionGap, FailureReason, InstallError, Resolved, ValidationOutcome,
};
use crate::requirements::version::Version;
use std::fmt;
use std::time::Duration;

/// Detection procedure for a dependency.
pub type DetectFn<'a> = Box<dyn Fn(&Resolved) -> Option<Candidate> + 'a>;

/// Install procedure for a dependency.
pub type InstallFn<'a> = Box<dyn Fn(&Resolved) -> Result<(), InstallError> + 'a>;

/// How re-verification after an install is paced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of detection attempts after a successful install.
    pub max_attempts: u32,
    /// Wait between a successful install and the first attempt.
    pub settle_delay: Duration,
    /// Wait between consecutive attempts.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            settle_delay: Duration::from_secs(2),
            retry_delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_attempts` and no waiting.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            settle_delay: Duration::ZERO,
            retry_delay: Duration::ZERO,
        }
    }
}

/// A dependency to ensure: what version is needed, how to find it, how to install it.
pub struct DependencySpec<'a> {
    name: String,
    required_version: Version,
    manual_install_hint: String,
    exposes_executable: bool,
    detect: DetectFn<'a>,
    install: InstallFn<'a>,
}

impl<'a> DependencySpec<'a> {
    /// Create a spec from its detect and install procedures.
    pub fn new<D, I>(name: impl Into<String>, required_version: Version, detect: D, install: I) -> Self
    where
        D: Fn(&Resolved) -> Option<Candidate> + 'a,
        I: Fn(&Resolved) -> Result<(), InstallError> + 'a,
    {
        Self {
            name: name.into(),
            required_version,
            manual_install_hint: String::new(),
            exposes_executable: false,
            detect: Box::new(detect),
            install: Box::new(install),
        }
    }

    /// Where to get the dependency by hand if automatic install fails.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.manual_install_hint = hint.into();
        self
    }

    /// Mark the candidate's location as an executable whose directory
    /// should be put on the search path once resolved.
    pub fn with_executable(mut self) -> Self {
        self.exposes_executable = true;
        self
    }

    /// Dependency name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimum acceptable version.
    pub fn required_version(&self) -> &Version {
        &self.required_version
    }

    /// Manual install location.
    pub fn manual_install_hint(&self) -> &str {
        &self.manual_install_hint
    }

    /// Whether the resolved candidate is an executable.
    pub fn exposes_executable(&self) -> bool {
        self.exposes_executable
    }

    /// Run detection.
    pub fn detect(&self, resolved: &Resolved) -> Option<Candidate> {
        (self.detect)(resolved)
    }

    /// Run the install procedure.
    pub fn install(&self, resolved: &Resolved) -> Result<(), InstallError> {
        (self.install)(resolved)
    }
}

impl fmt::Debug for DependencySpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencySpec")
            .field("name", &self.name)
            .field("required_version", &self.required_version)
            .field("manual_install_hint", &self.manual_install_hint)
            .field("exposes_executable", &self.exposes_executable)
            .finish_non_exhaustive()
    }
}

/// Where a validation run currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationState {
    /// Nothing checked yet.
    Unchecked,
    /// Detection came up short; the install procedure runs next.
    Installing,
    /// Install succeeded; this is re-detection attempt `n` (1-based).
    Reverifying(u32),
    /// A sufficient candidate was found.
    Satisfied { candidate: Candidate, installed: bool },
    /// Terminal failure.
    Failed(FailureReason),
}

impl ValidationState {
    /// Whether no further transitions happen from here.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ValidationState::Satisfied { .. } | ValidationState::Failed(_)
        )
    }
}

/// Runs the detect → install → re-verify cycle.
#[derive(Debug, Clone, Default)]
pub struct DependencyValidator {
    policy: RetryPolicy,
}

impl DependencyValidator {
    /// Create a validator with the given re-verification policy.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// The re-verification policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Drive `spec` to a terminal state.
    pub fn validate(&self, spec: &DependencySpec<'_>, resolved: &Resolved) -> ValidationOutcome {
        let mut state = ValidationState::Unchecked;
        loop {
            state = match self.step(spec, resolved, state) {
                ValidationState::Satisfied {
                    candidate,
                    installed: false,
                } => return ValidationOutcome::AlreadySatisfied(candidate),
                ValidationState::Satisfied {
                    candidate,
                    installed: true,
                } => return ValidationOutcome::InstalledAndVerified(candidate),
                ValidationState::Failed(reason) => {
                    tracing::debug!("{}: failed ({})", spec.name(), reason);
                    return ValidationOutcome::Failed(reason);
                }
                next => {
                    tracing::debug!("{}: -> {:?}", spec.name(), next);
                    next
                }
            };
        }
    }

    /// Perform one transition.
    pub fn step(
        &self,
        spec: &DependencySpec<'_>,
        resolved: &Resolved,
        state: ValidationState,
    ) -> ValidationState {
        let required = spec.required_version();
        let max_attempts = self.policy.max_attempts.max(1);

        match state {
            ValidationState::Unchecked => match spec.detect(resolved) {
                Some(candidate) if candidate.satisfies(required) => {
                    tracing::info!(
                        "{} {} is installed and meets the requirement (>= {})",
                        spec.name(),
                        candidate.version_label(),
                        required
                    );
                    ValidationState::Satisfied {
                        candidate,
                        installed: false,
                    }
                }
                found => {
                    let gap = match found {
                        Some(found) => DetectionGap::Insufficient { found },
                        None => DetectionGap::NotFound,
                    };
                    tracing::info!(
                        "{} >= {} {}. Installing...",
                        spec.name(),
                        required,
                        gap
                    );
                    ValidationState::Installing
                }
            },

            ValidationState::Installing => match spec.install(resolved) {
                Ok(()) => {
                    tracing::info!("{} installer completed. Verifying installation...", spec.name());
                    pause(self.policy.settle_delay);
                    ValidationState::Reverifying(1)
                }
                Err(e) => {
                    tracing::warn!("{} installer failed: {}", spec.name(), e);
                    ValidationState::Failed(FailureReason::InstallExecution {
                        message: e.to_string(),
                    })
                }
            },

            ValidationState::Reverifying(attempt) => {
                tracing::info!("Verification attempt {}/{}...", attempt, max_attempts);
                match spec.detect(resolved) {
                    Some(candidate) if candidate.satisfies(required) => {
                        tracing::info!(
                            "{} {} installed successfully at {}",
                            spec.name(),
                            candidate.version_label(),
                            candidate.location.display()
                        );
                        ValidationState::Satisfied {
                            candidate,
                            installed: true,
                        }
                    }
                    _ if attempt < max_attempts => {
                        tracing::info!(
                            "{} not detected yet, waiting {}s before retry...",
                            spec.name(),
                            self.policy.retry_delay.as_secs()
                        );
                        pause(self.policy.retry_delay);
                        ValidationState::Reverifying(attempt + 1)
                    }
                    _ => ValidationState::Failed(FailureReason::VerificationExhausted {
                        attempts: attempt,
                    }),
                }
            }

            terminal @ (ValidationState::Satisfied { .. } | ValidationState::Failed(_)) => terminal,
        }
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}
