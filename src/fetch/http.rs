//! HTTP file downloads.
//!
//! Bodies are streamed to `<dest>.part` and renamed into place once the
//! transfer completes, so a partial file never sits at `dest`.

use crate::error::{Result, SetupError};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fetches a URL into a local file.
pub trait Downloader {
    /// Download `url` to `dest`, replacing any existing file.
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Downloads over HTTP/HTTPS.
pub struct HttpDownloader {
    client: Client,
    timeout: Duration,
    show_progress: bool,
}

impl HttpDownloader {
    /// Create a downloader with the default 300-second timeout.
    ///
    /// A progress bar is drawn when stderr is a terminal.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(300))
    }

    /// Create a downloader with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent("modpack-setup")
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            timeout,
            show_progress: console::Term::stderr().is_term(),
        }
    }

    /// Never draw a progress bar.
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn progress_bar(&self, length: Option<u64>, label: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = match length {
            Some(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{msg} [{bar:30.magenta}] {bytes}/{total_bytes} ({eta})")
                        .unwrap()
                        .progress_chars("=> "),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.magenta} {msg} {bytes}")
                        .unwrap(),
                );
                bar
            }
        };
        bar.set_message(label.to_string());
        bar
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let failed = |message: String| SetupError::Download {
            url: url.to_string(),
            message,
        };

        tracing::info!("Downloading {}", file_name_from_url(url));
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status())));
        }

        let partial = partial_path(dest);
        let file = File::create(&partial)?;
        let bar = self.progress_bar(response.content_length(), &file_name_from_url(url));
        let mut writer = bar.wrap_write(BufWriter::new(file));

        let copied = response
            .copy_to(&mut writer)
            .map_err(|e| e.to_string())
            .and_then(|bytes| writer.flush().map(|_| bytes).map_err(|e| e.to_string()));
        drop(writer);
        bar.finish_and_clear();

        let bytes = match copied {
            Ok(bytes) => bytes,
            Err(message) => {
                let _ = fs::remove_file(&partial);
                return Err(failed(message));
            }
        };

        fs::rename(&partial, dest)?;
        tracing::debug!("Saved {} bytes to {}", bytes, dest.display());
        Ok(())
    }
}

/// Last path segment of a URL, without query string.
pub fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let without_scheme = path.split_once("://").map_or(path, |(_, rest)| rest);
    let path_part = without_scheme.split_once('/').map_or("", |(_, rest)| rest);
    path_part
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("download")
        .to_string()
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn default_timeout_is_300_seconds() {
        let downloader = HttpDownloader::new();
        assert_eq!(downloader.timeout(), Duration::from_secs(300));
    }

    #[test]
    fn downloads_body_to_destination() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/fabric-installer-1.0.3.jar");
            then.status(200).body("jar bytes");
        });

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("fabric-installer-1.0.3.jar");
        HttpDownloader::new()
            .quiet()
            .download(&server.url("/fabric-installer-1.0.3.jar"), &dest)
            .unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "jar bytes");
        assert!(!partial_path(&dest).exists());
    }

    #[test]
    fn replaces_existing_file() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/pack.zip");
            then.status(200).body("new");
        });

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("pack.zip");
        fs::write(&dest, "old contents").unwrap();

        HttpDownloader::new()
            .quiet()
            .download(&server.url("/pack.zip"), &dest)
            .unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn error_status_leaves_no_file() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.msi");
            then.status(404).body("Not Found");
        });

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("missing.msi");
        let result = HttpDownloader::new()
            .quiet()
            .download(&server.url("/missing.msi"), &dest);

        let err = result.unwrap_err();
        assert!(matches!(err, SetupError::Download { .. }));
        assert!(err.to_string().contains("404"), "Error should mention 404: {}", err);
        assert!(!dest.exists());
        assert!(!partial_path(&dest).exists());
    }

    #[test]
    fn sends_user_agent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/jdk.msi")
                .header("user-agent", "modpack-setup");
            then.status(200).body("msi");
        });

        let temp = TempDir::new().unwrap();
        HttpDownloader::new()
            .quiet()
            .download(&server.url("/jdk.msi"), &temp.path().join("jdk.msi"))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn file_name_is_last_path_segment() {
        assert_eq!(
            file_name_from_url(
                "https://download.oracle.com/java/22/archive/jdk-22.0.2_windows-x64_bin.msi"
            ),
            "jdk-22.0.2_windows-x64_bin.msi"
        );
    }

    #[test]
    fn file_name_drops_query_string() {
        assert_eq!(
            file_name_from_url("https://www.dropbox.com/scl/fi/abc/mods.zip?rlkey=x&dl=1"),
            "mods.zip"
        );
    }

    #[test]
    fn file_name_falls_back_for_bare_host() {
        assert_eq!(file_name_from_url("https://example.com/"), "download");
    }
}
