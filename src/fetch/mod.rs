//! Downloading installers and the mod bundle.

pub mod http;
pub mod mock;

pub use http::{file_name_from_url, Downloader, HttpDownloader};
pub use mock::CannedDownloader;
