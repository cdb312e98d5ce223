//! Ordered validation of several dependencies.
//!
//! Dependencies are ensured one after another. Each one's detect and
//! install procedures see everything resolved before it, and an executable
//! dependency's directory is put on the search path so later installers
//! can invoke it by bare name.

use crate::environment::Environment;
use crate::error::{Result, SetupError};
use crate::requirements::status::{Candidate, FailureReason, Resolved, ValidationOutcome};
use crate::requirements::validator::{DependencySpec, DependencyValidator};

/// Ensures a sequence of dependencies, stopping at the first failure.
pub struct InstallOrchestrator<'a> {
    env: &'a dyn Environment,
    validator: DependencyValidator,
}

impl<'a> InstallOrchestrator<'a> {
    /// Create an orchestrator that amends `env`'s search path.
    pub fn new(env: &'a dyn Environment, validator: DependencyValidator) -> Self {
        Self { env, validator }
    }

    /// Ensure every spec in order.
    ///
    /// Returns the resolved candidates, or the first failure. Specs after a
    /// failed one are not attempted.
    pub fn ensure_all(&self, specs: &[DependencySpec<'_>]) -> Result<Resolved> {
        let mut resolved = Resolved::new();
        for spec in specs {
            self.ensure(spec, &mut resolved)?;
        }
        Ok(resolved)
    }

    /// Ensure one spec and record its candidate in `resolved`.
    pub fn ensure(&self, spec: &DependencySpec<'_>, resolved: &mut Resolved) -> Result<Candidate> {
        tracing::info!("Checking {} (>= {})...", spec.name(), spec.required_version());

        let candidate = match self.validator.validate(spec, resolved) {
            ValidationOutcome::AlreadySatisfied(candidate)
            | ValidationOutcome::InstalledAndVerified(candidate) => candidate,
            ValidationOutcome::Failed(reason) => return Err(failure(spec, reason)),
        };

        if spec.exposes_executable() {
            if let Err(e) = self.expose_on_search_path(&candidate) {
                tracing::warn!(
                    "Could not add {} to the search path: {}",
                    candidate.location.display(),
                    e
                );
            }
        }

        resolved.insert(spec.name(), candidate.clone());
        Ok(candidate)
    }

    /// Prepend the candidate's directory to the search path unless it is already there.
    ///
    /// Returns `true` if the search path changed.
    pub fn expose_on_search_path(&self, candidate: &Candidate) -> Result<bool> {
        match candidate.bin_dir() {
            Some(dir) if !dir.as_os_str().is_empty() => self.env.prepend_search_path(dir),
            _ => Ok(false),
        }
    }
}

fn failure(spec: &DependencySpec<'_>, reason: FailureReason) -> SetupError {
    let dependency = spec.name().to_string();
    let hint = spec.manual_install_hint().to_string();
    match reason {
        FailureReason::InstallExecution { message } => SetupError::InstallExecution {
            dependency,
            message,
            hint,
        },
        FailureReason::VerificationExhausted { attempts } => SetupError::VerificationExhausted {
            dependency,
            attempts,
            hint,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::MemoryEnvironment;
    use crate::requirements::status::InstallError;
    use crate::requirements::validator::RetryPolicy;
    use crate::requirements::version::Version;
    use std::cell::Cell;
    use std::path::{Path, PathBuf};

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn validator() -> DependencyValidator {
        DependencyValidator::new(RetryPolicy::immediate(3))
    }

    fn runtime_spec<'a>(location: &'a str) -> DependencySpec<'a> {
        DependencySpec::new(
            "java",
            v("21"),
            move |_| Some(Candidate::new(location, Some(v("21.0.3")))),
            |_| Ok(()),
        )
        .with_executable()
    }

    #[test]
    fn resolves_in_order_and_exposes_runtime() {
        let env = MemoryEnvironment::with_path(&["/usr/bin"]);
        let orchestrator = InstallOrchestrator::new(&env, validator());

        let loader = DependencySpec::new(
            "fabric",
            v("0.16.14"),
            |resolved| {
                resolved.get("java").map(|_| {
                    Candidate::new(
                        "/mc/versions/fabric-loader-0.16.14-1.20.1",
                        Some(v("0.16.14")),
                    )
                })
            },
            |_| Ok(()),
        );

        let resolved = orchestrator
            .ensure_all(&[runtime_spec("/opt/jdk-21/bin/java"), loader])
            .unwrap();

        assert_eq!(resolved.len(), 2);
        assert_eq!(
            resolved.get("java").unwrap().location,
            PathBuf::from("/opt/jdk-21/bin/java")
        );
        let path = env.search_path();
        assert_eq!(path[0], PathBuf::from("/opt/jdk-21/bin"));
        // The loader's location is not an executable and stays off the path.
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn exposing_same_directory_twice_keeps_one_entry() {
        let env = MemoryEnvironment::with_path(&["/usr/bin"]);
        let orchestrator = InstallOrchestrator::new(&env, validator());
        let candidate = Candidate::new("/opt/jdk/bin/java", Some(v("21")));

        assert!(orchestrator.expose_on_search_path(&candidate).unwrap());
        assert!(!orchestrator.expose_on_search_path(&candidate).unwrap());

        let dir = Path::new("/opt/jdk/bin");
        let count = env
            .search_path()
            .iter()
            .filter(|entry| entry.as_path() == dir)
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn candidate_already_on_path_leaves_path_unchanged() {
        let env = MemoryEnvironment::with_path(&["/usr/bin", "/usr/lib/jvm/bin"]);
        let orchestrator = InstallOrchestrator::new(&env, validator());

        orchestrator
            .ensure_all(&[runtime_spec("/usr/lib/jvm/bin/java")])
            .unwrap();

        assert_eq!(
            env.search_path(),
            vec![PathBuf::from("/usr/bin"), PathBuf::from("/usr/lib/jvm/bin")]
        );
    }

    #[test]
    fn first_failure_stops_the_run() {
        let env = MemoryEnvironment::new();
        let orchestrator = InstallOrchestrator::new(&env, validator());
        let later_detects = Cell::new(0);

        let runtime = DependencySpec::new(
            "java",
            v("21"),
            |_| None,
            |_| {
                Err(InstallError::ExitStatus {
                    command: "msiexec /i jdk.msi /qn".into(),
                    code: Some(1603),
                })
            },
        )
        .with_hint("https://www.oracle.com/java/technologies/downloads/");
        let loader = DependencySpec::new(
            "fabric",
            v("0.16.14"),
            |_| {
                later_detects.set(later_detects.get() + 1);
                None
            },
            |_| Ok(()),
        );

        let err = orchestrator.ensure_all(&[runtime, loader]).unwrap_err();

        match &err {
            SetupError::InstallExecution {
                dependency, hint, ..
            } => {
                assert_eq!(dependency, "java");
                assert!(hint.contains("oracle.com"));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(later_detects.get(), 0);
        assert!(env.search_path().is_empty());
    }

    #[test]
    fn exhausted_verification_names_dependency() {
        let env = MemoryEnvironment::new();
        let orchestrator = InstallOrchestrator::new(&env, validator());
        let spec = DependencySpec::new("fabric", v("0.16.14"), |_| None, |_| Ok(()))
            .with_hint("https://fabricmc.net/use/installer/");

        let err = orchestrator.ensure_all(&[spec]).unwrap_err();

        assert!(matches!(
            err,
            SetupError::VerificationExhausted { ref dependency, attempts: 3, .. } if dependency == "fabric"
        ));
    }

    #[test]
    fn later_install_can_use_exposed_runtime_by_bare_name() {
        let env = MemoryEnvironment::with_path(&["/usr/bin"]);
        let orchestrator = InstallOrchestrator::new(&env, validator());
        let installed = Cell::new(false);

        let loader = DependencySpec::new(
            "fabric",
            v("0.16.14"),
            |_| {
                installed
                    .get()
                    .then(|| Candidate::new("/mc/versions/fabric", Some(v("0.16.14"))))
            },
            |_| {
                if env.on_search_path(Path::new("/opt/jdk/bin")) {
                    installed.set(true);
                    Ok(())
                } else {
                    Err(InstallError::MissingPrerequisite {
                        dependency: "java".into(),
                    })
                }
            },
        );

        let resolved = orchestrator
            .ensure_all(&[runtime_spec("/opt/jdk/bin/java"), loader])
            .unwrap();
        assert!(resolved.get("fabric").is_some());
    }
}
