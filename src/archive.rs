//! Zip extraction for the mod bundle.

use crate::error::{Result, SetupError};
use anyhow::Context;
use std::fs::{self, File};
use std::path::Path;
use zip::ZipArchive;

/// Extract every entry of `archive` into `destination`.
///
/// Existing files are overwritten. Entries whose paths would escape
/// `destination` are skipped. Returns the number of files written.
pub fn extract_zip(archive: &Path, destination: &Path) -> Result<usize> {
    extract_impl(archive, destination).map_err(|e| SetupError::Extraction {
        archive: archive.to_path_buf(),
        destination: destination.to_path_buf(),
        message: format!("{:#}", e),
    })
}

fn extract_impl(archive_path: &Path, destination: &Path) -> anyhow::Result<usize> {
    tracing::debug!(
        "Extracting {} to {}",
        archive_path.display(),
        destination.display()
    );
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive at {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(file).context("Failed to parse ZIP archive")?;

    fs::create_dir_all(destination)
        .with_context(|| format!("Failed to create {}", destination.display()))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to read ZIP entry {}", i))?;

        let entry_path = match entry.enclosed_name() {
            Some(path) => path,
            None => {
                tracing::debug!("Skipping entry with unsafe path: {}", entry.name());
                continue;
            }
        };
        let full_path = destination.join(entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&full_path)?;
            continue;
        }

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&full_path)
            .with_context(|| format!("Failed to create {}", full_path.display()))?;
        std::io::copy(&mut entry, &mut out)
            .with_context(|| format!("Failed to extract file {}", full_path.display()))?;
        written += 1;
    }

    tracing::info!("Extracted {} files to {}", written, destination.display());
    Ok(written)
}
