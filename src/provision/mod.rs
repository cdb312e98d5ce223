//! The end-to-end provisioning run.
//!
//! A run creates the modded game directory, ensures the Java runtime and
//! the Fabric loader (in that order), registers a launcher profile and
//! unpacks the mod bundle. The first fatal error stops the run. A launcher
//! profile that cannot be written is reported but does not stop the
//! modpack from being installed.
//!
//! # Modules
//!
//! - [`runtime`] - Java runtime detection and installation
//! - [`loader`] - Fabric loader detection and installation
//! - [`modpack`] - Mod bundle download and extraction

pub mod loader;
pub mod modpack;
pub mod runtime;

use crate::config::{resolve_argv, InterpolationContext, SetupConfig};
use crate::environment::Environment;
use crate::error::{Result, SetupError};
use crate::fetch::{file_name_from_url, Downloader};
use crate::fs::ensure_dir;
use crate::launcher::{register_profile, LauncherProfile};
use crate::requirements::{
    CandidateLocator, DependencyValidator, InstallError, InstallOrchestrator, Resolved,
};
use crate::shell::{display_command, ProcessRunner};
use std::path::{Path, PathBuf};

/// What a completed run did.
#[derive(Debug)]
pub struct ProvisionOutcome {
    /// Runtime and loader candidates in use.
    pub resolved: Resolved,
    /// Why the launcher profile was not registered, if it was not.
    pub profile_error: Option<SetupError>,
    /// Directory the mod bundle was unpacked into.
    pub mods_dir: PathBuf,
}

/// Everything a provisioning run talks to.
pub struct Provisioner<'a> {
    config: &'a SetupConfig,
    runner: &'a dyn ProcessRunner,
    env: &'a dyn Environment,
    downloader: &'a dyn Downloader,
    minecraft_dir: PathBuf,
    modded_install_dir: PathBuf,
}

impl<'a> Provisioner<'a> {
    /// Resolve the game directories for `config` and build a provisioner.
    pub fn new(
        config: &'a SetupConfig,
        runner: &'a dyn ProcessRunner,
        env: &'a dyn Environment,
        downloader: &'a dyn Downloader,
    ) -> Result<Self> {
        Ok(Self {
            minecraft_dir: config.minecraft_dir(env)?,
            modded_install_dir: config.modded_install_dir(env)?,
            config,
            runner,
            env,
            downloader,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &SetupConfig {
        self.config
    }

    /// Launcher data directory.
    pub fn minecraft_dir(&self) -> &Path {
        &self.minecraft_dir
    }

    /// Game directory of the modded profile.
    pub fn modded_install_dir(&self) -> &Path {
        &self.modded_install_dir
    }

    /// Run every provisioning step.
    pub fn run(&self) -> Result<ProvisionOutcome> {
        ensure_dir(&self.modded_install_dir)?;

        let specs = vec![runtime::spec(self)?, loader::spec(self)?];
        let validator = DependencyValidator::new(self.config.retry.policy());
        let resolved = InstallOrchestrator::new(self.env, validator).ensure_all(&specs)?;

        let profile_error = match self.register_launcher_profile() {
            Ok(()) => None,
            Err(e @ SetupError::ProfileRegistration { .. }) => {
                tracing::warn!("{}", e);
                if let Some(hint) = e.hint() {
                    tracing::warn!("{}", hint);
                }
                Some(e)
            }
            Err(e) => return Err(e),
        };
        let mods_dir = modpack::install(self)?;

        tracing::info!("Setup completed");
        Ok(ProvisionOutcome {
            resolved,
            profile_error,
            mods_dir,
        })
    }

    /// Write the modded profile into the launcher's profiles document.
    pub fn register_launcher_profile(&self) -> Result<()> {
        let profile = LauncherProfile {
            name: self.config.profile.name.clone(),
            last_version_id: LauncherProfile::fabric_version_id(
                &self.config.loader.version,
                &self.config.game.minecraft_version,
            ),
            game_dir: self.modded_install_dir.clone(),
            icon: self.config.profile.icon.clone(),
            java_args: self.config.profile.java_args.clone(),
            java_dir: self.gui_runtime()?,
        };
        register_profile(&self.minecraft_dir, &self.config.profile_id(), &profile)
    }

    /// Windowed runtime executable for the launcher, located like the runtime itself.
    fn gui_runtime(&self) -> Result<Option<PathBuf>> {
        let required = self.config.required_runtime_version()?;
        let found = self.locator().find_sufficient(
            &self.config.runtime.gui_executable,
            &self.config.runtime.search_roots,
            &required,
        );
        if found.is_none() {
            tracing::warn!(
                "No {} found; the launcher will use its bundled runtime",
                self.config.runtime.gui_executable
            );
        }
        Ok(found.map(|candidate| candidate.location))
    }

    fn locator(&self) -> CandidateLocator<'a> {
        CandidateLocator::new(self.runner, self.env)
    }

    /// Download `url` into the temp directory, named after its last path segment.
    fn download_to_temp(&self, url: &str) -> Result<PathBuf> {
        let dir = self.env.temp_dir();
        ensure_dir(&dir)?;
        let dest = dir.join(file_name_from_url(url));
        self.downloader.download(url, &dest)?;
        Ok(dest)
    }

    /// Run an installer argv template to completion.
    fn run_installer(
        &self,
        template: &[String],
        context: &InterpolationContext,
    ) -> std::result::Result<(), InstallError> {
        let argv = resolve_argv(template, context)?;
        tracing::info!("Running {}", display_command(&argv));
        let result = self.runner.status(&argv)?;
        if result.success {
            Ok(())
        } else {
            Err(InstallError::ExitStatus {
                command: display_command(&argv),
                code: result.exit_code,
            })
        }
    }
}
