//! modpack-setup - one-shot provisioning of a modded Minecraft install.
//!
//! A run makes sure a sufficiently recent Java runtime and the Fabric loader
//! are installed (installing and re-verifying them when they are not),
//! registers a launcher profile for the modded game directory, and unpacks
//! the mod bundle into it.
//!
//! # Modules
//!
//! - [`config`] - Configuration schema, loading, and command templates
//! - [`environment`] - Process environment and search path handling
//! - [`error`] - Error types and result aliases
//! - [`requirements`] - Version comparison, detection, and the install/verify state machine
//! - [`shell`] - External process execution
//! - [`fetch`] - HTTP downloads
//! - [`archive`] - Zip extraction
//! - [`launcher`] - Launcher profile registration
//! - [`provision`] - The end-to-end provisioning run
//!
//! # Example
//!
//! ```
//! use modpack_setup::requirements::{compare_at_least, Version};
//!
//! let required = Version::parse("21").unwrap();
//! let installed = Version::parse("21.0.3").unwrap();
//! assert!(compare_at_least(&installed, &required));
//! assert!(!compare_at_least(&required, &Version::parse("21.0.1").unwrap()));
//! ```

pub mod archive;
pub mod config;
pub mod environment;
pub mod error;
pub mod fetch;
pub mod fs;
pub mod launcher;
pub mod provision;
pub mod requirements;
pub mod shell;

pub use error::{Result, SetupError};
