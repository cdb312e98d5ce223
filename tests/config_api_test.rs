//! Integration tests for config module public API.

use modpack_setup::config::{
    load_config_file, resolve_argv, InterpolationContext, SetupConfig,
};
use modpack_setup::SetupError;
use std::fs;
use tempfile::TempDir;

#[test]
fn override_file_changes_only_what_it_names() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yml");
    fs::write(
        &path,
        r#"
runtime:
  required_version: "17"
profile:
  name: "Cove Test"
"#,
    )
    .unwrap();

    let config = load_config_file(&path).unwrap();
    assert_eq!(config.runtime.required_version, "17");
    assert_eq!(config.profile.name, "Cove Test");
    assert_eq!(config.loader, SetupConfig::default().loader);
}

#[test]
fn malformed_loader_version_is_rejected_at_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yml");
    fs::write(&path, "loader:\n  version: \"0..16\"\n").unwrap();

    let err = load_config_file(&path).unwrap_err();
    assert!(matches!(err, SetupError::MalformedVersion { .. }));
}

#[test]
fn default_loader_command_renders_installer_arguments() {
    let config = SetupConfig::default();
    let ctx = InterpolationContext::new()
        .with("installer", "/tmp/fabric-installer-1.0.3.jar")
        .with("minecraft_dir", "/home/steve/.minecraft")
        .with("mc_version", config.game.minecraft_version.clone())
        .with("loader_version", config.loader.version.clone());

    let argv = resolve_argv(&config.loader.install_command, &ctx).unwrap();
    assert_eq!(
        argv,
        vec![
            "java",
            "-jar",
            "/tmp/fabric-installer-1.0.3.jar",
            "client",
            "-dir",
            "/home/steve/.minecraft",
            "-mcversion",
            "1.20.1",
            "-loader",
            "0.16.14",
        ]
    );
}

#[test]
fn unknown_template_variable_is_config_error() {
    let ctx = InterpolationContext::new();
    let err = resolve_argv(&["${nope}".to_string()], &ctx).unwrap_err();
    assert!(matches!(err, SetupError::ConfigValidation { .. }));
}
