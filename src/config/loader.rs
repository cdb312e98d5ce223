//! Configuration file discovery and loading.
//!
//! A single optional override file is read from `~/.modpack-setup/config.yml`.
//! Fields it leaves out keep their defaults.

use crate::config::schema::SetupConfig;
use crate::environment::Environment;
use crate::error::{Result, SetupError};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding the user's override file, relative to home.
pub const CONFIG_DIR: &str = ".modpack-setup";

/// Override file name.
pub const CONFIG_FILE: &str = "config.yml";

/// Location of the user's override file: `~/.modpack-setup/config.yml`
pub fn user_config_path(env: &dyn Environment) -> Option<PathBuf> {
    Some(env.home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Parse YAML content into a `SetupConfig`.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<SetupConfig> {
    if content.trim().is_empty() {
        return Ok(SetupConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| SetupError::ConfigParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file, falling back to defaults when it does not exist.
///
/// # Errors
///
/// Returns `ConfigParse` if the YAML is invalid, and `MalformedVersion` or
/// `ConfigValidation` if the values it sets are unusable.
pub fn load_config_file(path: &Path) -> Result<SetupConfig> {
    let config = match fs::read_to_string(path) {
        Ok(content) => {
            tracing::debug!("Loading config from {}", path.display());
            parse_config(&content, path)?
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config at {}, using defaults", path.display());
            SetupConfig::default()
        }
        Err(e) => return Err(SetupError::Io(e)),
    };

    config.validate()?;
    Ok(config)
}

/// Load the user's config, or the defaults when there is no home directory.
pub fn load_config(env: &dyn Environment) -> Result<SetupConfig> {
    match user_config_path(env) {
        Some(path) => load_config_file(&path),
        None => Ok(SetupConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::MemoryEnvironment;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config_file(&temp.path().join("config.yml")).unwrap();
        assert_eq!(config, SetupConfig::default());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("", Path::new("config.yml")).unwrap();
        assert_eq!(config, SetupConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let yaml = r#"
loader:
  version: "0.15.11"
retry:
  max_attempts: 5
"#;
        let config = parse_config(yaml, Path::new("config.yml")).unwrap();
        assert_eq!(config.loader.version, "0.15.11");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.retry_delay_secs, 3);
        assert_eq!(config.runtime.required_version, "21");
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let result = parse_config("runtime: [unclosed", Path::new("config.yml"));
        assert!(matches!(result, Err(SetupError::ConfigParse { .. })));
    }

    #[test]
    fn malformed_version_in_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "runtime:\n  required_version: \"twenty-one\"\n").unwrap();

        let result = load_config_file(&path);
        assert!(matches!(result, Err(SetupError::MalformedVersion { .. })));
    }

    #[test]
    fn load_config_reads_from_home() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(CONFIG_FILE),
            "game:\n  minecraft_version: \"1.21.1\"\n",
        )
        .unwrap();

        let env = MemoryEnvironment::new().home(temp.path());
        let config = load_config(&env).unwrap();
        assert_eq!(config.game.minecraft_version, "1.21.1");
        assert_eq!(config.profile_id(), "fabric-modded-1.21.1");
    }

    #[test]
    fn no_home_yields_defaults() {
        let env = MemoryEnvironment::new();
        assert_eq!(load_config(&env).unwrap(), SetupConfig::default());
    }
}
