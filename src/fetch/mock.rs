//! Canned downloader for testing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, SetupError};

use super::http::Downloader;

/// [`Downloader`] that serves fixed bodies and records requested URLs.
///
/// URLs without a body fail with a `Download` error.
#[derive(Debug, Default)]
pub struct CannedDownloader {
    bodies: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl CannedDownloader {
    /// Create a downloader that serves nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn serve(&mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.bodies.insert(url.into(), body.into());
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Downloader for CannedDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.requests.borrow_mut().push(url.to_string());
        let body = self.bodies.get(url).ok_or_else(|| SetupError::Download {
            url: url.to_string(),
            message: "HTTP 404 Not Found".to_string(),
        })?;
        fs::write(dest, body)?;
        Ok(())
    }
}
