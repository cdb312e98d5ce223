//! Minecraft launcher integration.

pub mod profile;

pub use profile::{profiles_path, register_profile, LauncherProfile, PROFILES_FILE};
