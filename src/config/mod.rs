//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions and defaults in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Installer command templates in [`interpolation`]
//!
//! # Example
//!
//! ```
//! use modpack_setup::config::{parse_config, SetupConfig};
//! use std::path::Path;
//!
//! let config = parse_config("loader:\n  version: \"0.16.14\"\n", Path::new("config.yml")).unwrap();
//! assert_eq!(config.game.minecraft_version, "1.20.1");
//! assert_eq!(config, SetupConfig::default());
//! ```

pub mod interpolation;
pub mod loader;
pub mod schema;

pub use interpolation::{resolve_argv, resolve_string, InterpolationContext};
pub use loader::{load_config, load_config_file, parse_config, user_config_path};
pub use schema::{
    GameConfig, LoaderConfig, ModpackConfig, ProfileConfig, RetrySettings, RuntimeConfig,
    SetupConfig,
};
