//! Fabric loader dependency.
//!
//! The loader installer creates `<minecraft_dir>/versions/fabric-loader-<v>-<mc>`.
//! That directory is what detection looks for.

use super::runtime::RUNTIME;
use super::Provisioner;
use crate::config::InterpolationContext;
use crate::error::Result;
use crate::requirements::{Candidate, DependencySpec, InstallError, Version};
use std::fs;
use std::path::Path;

/// Dependency name.
pub const LOADER: &str = "fabric";

const VERSION_DIR_PREFIX: &str = "fabric-loader-";

/// Build the loader spec. Installing it needs the runtime resolved first.
pub fn spec<'a>(provisioner: &'a Provisioner<'a>) -> Result<DependencySpec<'a>> {
    let config = provisioner.config();
    let required = config.required_loader_version()?;
    let min_version = required.clone();

    let spec = DependencySpec::new(
        LOADER,
        required,
        move |_| {
            find_installed(
                &provisioner.minecraft_dir().join("versions"),
                &provisioner.config().game.minecraft_version,
                &min_version,
            )
        },
        move |resolved| {
            if resolved.get(RUNTIME).is_none() {
                return Err(InstallError::MissingPrerequisite {
                    dependency: RUNTIME.to_string(),
                });
            }
            install(provisioner)
        },
    )
    .with_hint(config.loader.manual_install_hint.clone());

    Ok(spec)
}

/// First `fabric-loader-<v>-<mc_version>` directory whose `<v>` is at least `min_version`.
///
/// When only older loaders are installed, the first of them is returned so
/// the caller can report what it found.
pub fn find_installed(versions_dir: &Path, mc_version: &str, min_version: &Version) -> Option<Candidate> {
    let entries = match fs::read_dir(versions_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Cannot read {}: {}", versions_dir.display(), e);
            return None;
        }
    };

    let suffix = format!("-{}", mc_version);
    let mut fallback = None;

    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let Some(version) = loader_version_of(&name, &suffix) else {
            continue;
        };

        let candidate = Candidate::new(path, Some(version));
        if candidate.satisfies(min_version) {
            return Some(candidate);
        }
        fallback.get_or_insert(candidate);
    }

    fallback
}

fn loader_version_of(dir_name: &str, suffix: &str) -> Option<Version> {
    let raw = dir_name
        .strip_prefix(VERSION_DIR_PREFIX)?
        .strip_suffix(suffix)?;
    Version::parse(raw).ok()
}

fn install(provisioner: &Provisioner<'_>) -> std::result::Result<(), InstallError> {
    let config = provisioner.config();
    let installer = provisioner.download_to_temp(&config.loader.installer_url)?;
    let context = InterpolationContext::new()
        .with_path("installer", &installer)
        .with_path("minecraft_dir", provisioner.minecraft_dir())
        .with("mc_version", config.game.minecraft_version.clone())
        .with("loader_version", config.loader.version.clone());
    provisioner.run_installer(&config.loader.install_command, &context)
}
