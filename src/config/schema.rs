//! Configuration schema definitions.
//!
//! Every field has a default, so an empty (or absent) config file yields a
//! complete configuration for the Cove Season 8 modpack.

use crate::environment::Environment;
use crate::error::{Result, SetupError};
use crate::requirements::{RetryPolicy, Version};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for `~/.modpack-setup/config.yml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Java runtime requirement and installer
    pub runtime: RuntimeConfig,

    /// Fabric loader requirement and installer
    pub loader: LoaderConfig,

    /// Game version and directories
    pub game: GameConfig,

    /// Launcher profile written after installation
    pub profile: ProfileConfig,

    /// Mod bundle download
    pub modpack: ModpackConfig,

    /// Re-verification policy after an install
    pub retry: RetrySettings,
}

/// Java runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Minimum acceptable version, e.g. "21"
    pub required_version: String,

    /// Where to download the installer from
    pub installer_url: String,

    /// Installer argv template; `${installer}` is the downloaded file
    pub install_command: Vec<String>,

    /// Shown when automatic installation fails
    pub manual_install_hint: String,

    /// Installation roots scanned when the search path has no usable copy
    pub search_roots: Vec<PathBuf>,

    /// Windowed launcher executable recorded in the launcher profile
    pub gui_executable: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            required_version: "21".to_string(),
            installer_url:
                "https://download.oracle.com/java/22/archive/jdk-22.0.2_windows-x64_bin.msi"
                    .to_string(),
            install_command: strings(&["msiexec", "/i", "${installer}", "/qn", "/norestart"]),
            manual_install_hint:
                "https://www.oracle.com/java/technologies/javase/jdk22-archive-downloads.html"
                    .to_string(),
            search_roots: default_search_roots(),
            gui_executable: default_gui_executable().to_string(),
        }
    }
}

/// Fabric loader settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Minimum acceptable loader version
    pub version: String,

    /// Fabric installer jar location
    pub installer_url: String,

    /// Installer argv template
    pub install_command: Vec<String>,

    /// Shown when automatic installation fails
    pub manual_install_hint: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            version: "0.16.14".to_string(),
            installer_url:
                "https://maven.fabricmc.net/net/fabricmc/fabric-installer/1.0.3/fabric-installer-1.0.3.jar"
                    .to_string(),
            install_command: strings(&[
                "java",
                "-jar",
                "${installer}",
                "client",
                "-dir",
                "${minecraft_dir}",
                "-mcversion",
                "${mc_version}",
                "-loader",
                "${loader_version}",
            ]),
            manual_install_hint: "https://fabricmc.net/use/installer/".to_string(),
        }
    }
}

/// Game version and directory settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Minecraft version the loader targets
    pub minecraft_version: String,

    /// Launcher data directory (defaults to the platform's `.minecraft`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minecraft_dir: Option<PathBuf>,

    /// Game directory for the modded profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modded_install_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            minecraft_version: "1.20.1".to_string(),
            minecraft_dir: None,
            modded_install_dir: None,
        }
    }
}

/// Launcher profile settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Display name in the launcher
    pub name: String,

    /// Profile key; defaults to `fabric-modded-<minecraft_version>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Launcher icon name or data URI
    pub icon: String,

    /// JVM arguments for the game
    pub java_args: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "The Cove - Season 8 (1.20.1)".to_string(),
            id: None,
            icon: "Furnace".to_string(),
            java_args: "-Xmx4G -XX:+UnlockExperimentalVMOptions -XX:+UseG1GC \
                        -XX:G1NewSizePercent=20 -XX:G1ReservePercent=20 \
                        -XX:MaxGCPauseMillis=50 -XX:G1HeapRegionSize=32M"
                .to_string(),
        }
    }
}

/// Mod bundle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModpackConfig {
    /// Zip download location
    pub url: String,

    /// Cached file name in the temp directory
    pub file_name: String,
}

impl Default for ModpackConfig {
    fn default() -> Self {
        Self {
            url: "https://www.dropbox.com/scl/fi/5g7ygqza18345os79bpvx/cove-s8-client-mods-full.zip?rlkey=fhjxukhk969lbpee8j2dxcr4p&st=uyidgl06&dl=1"
                .to_string(),
            file_name: "cove-s8-modpack.zip".to_string(),
        }
    }
}

/// Re-verification policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Re-verification attempts after a successful install
    pub max_attempts: u32,

    /// Seconds between attempts
    pub retry_delay_secs: u64,

    /// Seconds to wait after the runtime installer before the first attempt
    pub settle_delay_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_secs: 3,
            settle_delay_secs: 2,
        }
    }
}

impl RetrySettings {
    /// Policy used by the validator.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            settle_delay: Duration::from_secs(self.settle_delay_secs),
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}

impl SetupConfig {
    /// Parsed minimum runtime version.
    pub fn required_runtime_version(&self) -> Result<Version> {
        Version::parse(&self.runtime.required_version)
    }

    /// Parsed minimum loader version.
    pub fn required_loader_version(&self) -> Result<Version> {
        Version::parse(&self.loader.version)
    }

    /// Launcher profile key.
    pub fn profile_id(&self) -> String {
        self.profile
            .id
            .clone()
            .unwrap_or_else(|| format!("fabric-modded-{}", self.game.minecraft_version))
    }

    /// Launcher data directory.
    pub fn minecraft_dir(&self, env: &dyn Environment) -> Result<PathBuf> {
        match &self.game.minecraft_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_minecraft_dir(env, cfg!(windows)),
        }
    }

    /// Game directory for the modded profile.
    pub fn modded_install_dir(&self, env: &dyn Environment) -> Result<PathBuf> {
        match &self.game.modded_install_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(home(env)?
                .join("Games")
                .join("Minecraft")
                .join("modded-install")),
        }
    }

    /// Check that every configured version and command is usable.
    pub fn validate(&self) -> Result<()> {
        self.required_runtime_version()?;
        self.required_loader_version()?;
        if self.game.minecraft_version.trim().is_empty() {
            return Err(SetupError::ConfigValidation {
                message: "game.minecraft_version must not be empty".to_string(),
            });
        }
        for (field, command) in [
            ("runtime.install_command", &self.runtime.install_command),
            ("loader.install_command", &self.loader.install_command),
        ] {
            if command.is_empty() {
                return Err(SetupError::ConfigValidation {
                    message: format!("{} must not be empty", field),
                });
            }
        }
        if self.retry.max_attempts == 0 {
            return Err(SetupError::ConfigValidation {
                message: "retry.max_attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn home(env: &dyn Environment) -> Result<PathBuf> {
    env.home_dir().ok_or_else(|| SetupError::Directory {
        path: PathBuf::from("~"),
        message: "home directory could not be determined".to_string(),
    })
}

/// `%APPDATA%\.minecraft` on Windows, `~/.minecraft` elsewhere.
fn default_minecraft_dir(env: &dyn Environment, windows: bool) -> Result<PathBuf> {
    if windows {
        if let Some(appdata) = env.data_dir() {
            return Ok(appdata.join(".minecraft"));
        }
    }
    Ok(home(env)?.join(".minecraft"))
}

fn strings(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn default_gui_executable() -> &'static str {
    if cfg!(windows) {
        "javaw"
    } else {
        "java"
    }
}

fn default_search_roots() -> Vec<PathBuf> {
    let vendors = ["Java", "Oracle", "Eclipse Adoptium", "Eclipse Foundation"];
    ["C:\\Program Files", "C:\\Program Files (x86)"]
        .iter()
        .flat_map(|base| {
            vendors
                .iter()
                .map(move |vendor| PathBuf::from(format!("{}\\{}", base, vendor)))
        })
        .collect()
}
