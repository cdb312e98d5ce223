//! Mod bundle download and extraction.

use super::Provisioner;
use crate::archive::extract_zip;
use crate::error::Result;
use crate::fs::ensure_dir;
use std::path::PathBuf;

/// Fetch the bundle (unless cached) and unpack it into `<modded_install_dir>/mods`.
///
/// Returns the mods directory.
pub fn install(provisioner: &Provisioner<'_>) -> Result<PathBuf> {
    let config = &provisioner.config().modpack;
    let temp = provisioner.env.temp_dir();
    ensure_dir(&temp)?;

    let archive = temp.join(&config.file_name);
    if archive.is_file() {
        tracing::info!("Using cached modpack at {}", archive.display());
    } else {
        tracing::info!("Downloading modpack...");
        provisioner.downloader.download(&config.url, &archive)?;
    }

    let mods = provisioner.modded_install_dir().join("mods");
    extract_zip(&archive, &mods)?;
    tracing::info!("Modpack installed to {}", mods.display());
    Ok(mods)
}
