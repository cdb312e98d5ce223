//! Launcher profile registration.
//!
//! The launcher keeps its profiles in `<minecraft_dir>/launcher_profiles.json`.
//! Registration inserts or replaces one entry under `profiles` and leaves the
//! rest of the document as it was.

use crate::error::{Result, SetupError};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Profiles document name inside the launcher directory.
pub const PROFILES_FILE: &str = "launcher_profiles.json";

/// A custom launcher profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherProfile {
    /// Display name
    pub name: String,
    /// Installed version the profile launches, e.g. `fabric-loader-0.16.14-1.20.1`
    pub last_version_id: String,
    /// Game directory
    pub game_dir: PathBuf,
    /// Icon name or data URI
    pub icon: String,
    /// JVM arguments
    pub java_args: String,
    /// Runtime executable; the launcher's bundled runtime is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub java_dir: Option<PathBuf>,
}

impl LauncherProfile {
    /// Version id the Fabric installer creates for `loader_version` on `mc_version`.
    pub fn fabric_version_id(loader_version: &str, mc_version: &str) -> String {
        format!("fabric-loader-{}-{}", loader_version, mc_version)
    }
}

/// Path of the profiles document.
pub fn profiles_path(minecraft_dir: &Path) -> PathBuf {
    minecraft_dir.join(PROFILES_FILE)
}

/// Insert or replace profile `id` in the launcher's profiles document.
///
/// # Errors
///
/// Returns `ProfileRegistration` if the document is missing, is not a JSON
/// object, or cannot be written back.
pub fn register_profile(minecraft_dir: &Path, id: &str, profile: &LauncherProfile) -> Result<()> {
    let path = profiles_path(minecraft_dir);
    let failed = |message: String| SetupError::ProfileRegistration {
        path: path.clone(),
        message,
    };

    let content = fs::read_to_string(&path).map_err(|e| failed(e.to_string()))?;
    let mut document: Value =
        serde_json::from_str(&content).map_err(|e| failed(format!("invalid JSON: {}", e)))?;

    let created = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    upsert_profile(&mut document, id, profile, &created).map_err(failed)?;

    fs::write(&path, to_pretty_json(&document).map_err(failed)?)
        .map_err(|e| failed(e.to_string()))?;

    tracing::info!("Added/updated launcher profile: {}", profile.name);
    Ok(())
}

fn upsert_profile(
    document: &mut Value,
    id: &str,
    profile: &LauncherProfile,
    created: &str,
) -> std::result::Result<(), String> {
    let root = document
        .as_object_mut()
        .ok_or_else(|| "top-level value is not an object".to_string())?;

    let profiles = root
        .entry("profiles")
        .or_insert_with(|| Value::Object(Map::new()));
    if profiles.is_null() {
        *profiles = Value::Object(Map::new());
    }
    let profiles = profiles
        .as_object_mut()
        .ok_or_else(|| "\"profiles\" is not an object".to_string())?;

    let previous_created = profiles
        .get(id)
        .and_then(|existing| existing.get("created"))
        .cloned();

    let mut entry = match serde_json::to_value(profile).map_err(|e| e.to_string())? {
        Value::Object(map) => map,
        _ => return Err("profile did not serialize to an object".to_string()),
    };
    entry.insert("type".to_string(), Value::String("custom".to_string()));
    entry.insert(
        "created".to_string(),
        previous_created.unwrap_or_else(|| Value::String(created.to_string())),
    );

    profiles.insert(id.to_string(), Value::Object(entry));
    Ok(())
}

fn to_pretty_json(document: &Value) -> std::result::Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    document
        .serialize(&mut serializer)
        .map_err(|e| e.to_string())?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn profile() -> LauncherProfile {
        LauncherProfile {
            name: "The Cove - Season 8 (1.20.1)".to_string(),
            last_version_id: LauncherProfile::fabric_version_id("0.16.14", "1.20.1"),
            game_dir: PathBuf::from("/home/steve/Games/Minecraft/modded-install"),
            icon: "Furnace".to_string(),
            java_args: "-Xmx4G".to_string(),
            java_dir: Some(PathBuf::from("/opt/jdk-21/bin/java")),
        }
    }

    fn read(dir: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(profiles_path(dir)).unwrap()).unwrap()
    }

    #[test]
    fn adds_profile_and_keeps_other_entries() {
        let temp = TempDir::new().unwrap();
        fs::write(
            profiles_path(temp.path()),
            json!({
                "profiles": { "vanilla": { "name": "Latest release", "type": "latest-release" } },
                "settings": { "enableSnapshots": false },
                "version": 3
            })
            .to_string(),
        )
        .unwrap();

        register_profile(temp.path(), "fabric-modded-1.20.1", &profile()).unwrap();

        let doc = read(temp.path());
        assert_eq!(doc["profiles"]["vanilla"]["name"], "Latest release");
        assert_eq!(doc["settings"]["enableSnapshots"], false);
        assert_eq!(doc["version"], 3);

        let entry = &doc["profiles"]["fabric-modded-1.20.1"];
        assert_eq!(entry["type"], "custom");
        assert_eq!(entry["lastVersionId"], "fabric-loader-0.16.14-1.20.1");
        assert_eq!(entry["gameDir"], "/home/steve/Games/Minecraft/modded-install");
        assert_eq!(entry["javaDir"], "/opt/jdk-21/bin/java");
        assert_eq!(entry["icon"], "Furnace");
        assert!(entry["created"].is_string());
    }

    #[test]
    fn replaces_existing_profile_but_keeps_created() {
        let temp = TempDir::new().unwrap();
        fs::write(
            profiles_path(temp.path()),
            json!({
                "profiles": {
                    "fabric-modded-1.20.1": {
                        "name": "Old name",
                        "created": "2024-01-01T00:00:00.000Z",
                        "lastVersionId": "fabric-loader-0.15.0-1.20.1"
                    }
                }
            })
            .to_string(),
        )
        .unwrap();

        register_profile(temp.path(), "fabric-modded-1.20.1", &profile()).unwrap();

        let entry = &read(temp.path())["profiles"]["fabric-modded-1.20.1"];
        assert_eq!(entry["name"], "The Cove - Season 8 (1.20.1)");
        assert_eq!(entry["lastVersionId"], "fabric-loader-0.16.14-1.20.1");
        assert_eq!(entry["created"], "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn creates_profiles_object_when_absent() {
        let temp = TempDir::new().unwrap();
        fs::write(profiles_path(temp.path()), "{}").unwrap();

        register_profile(temp.path(), "cove", &profile()).unwrap();
        assert!(read(temp.path())["profiles"]["cove"].is_object());
    }

    #[test]
    fn omits_java_dir_when_unknown() {
        let temp = TempDir::new().unwrap();
        fs::write(profiles_path(temp.path()), "{\"profiles\": {}}").unwrap();
        let mut p = profile();
        p.java_dir = None;

        register_profile(temp.path(), "cove", &p).unwrap();
        assert!(read(temp.path())["profiles"]["cove"].get("javaDir").is_none());
    }

    #[test]
    fn writes_four_space_indentation() {
        let temp = TempDir::new().unwrap();
        fs::write(profiles_path(temp.path()), "{\"profiles\": {}}").unwrap();

        register_profile(temp.path(), "cove", &profile()).unwrap();

        let text = fs::read_to_string(profiles_path(temp.path())).unwrap();
        assert!(text.contains("\n    \"profiles\": {\n        \"cove\""));
    }

    #[test]
    fn missing_document_is_registration_error() {
        let temp = TempDir::new().unwrap();
        let result = register_profile(temp.path(), "cove", &profile());
        assert!(matches!(result, Err(SetupError::ProfileRegistration { .. })));
    }

    #[test]
    fn unparseable_document_is_left_alone() {
        let temp = TempDir::new().unwrap();
        fs::write(profiles_path(temp.path()), "{ not json").unwrap();

        let result = register_profile(temp.path(), "cove", &profile());
        assert!(matches!(result, Err(SetupError::ProfileRegistration { .. })));
        assert_eq!(
            fs::read_to_string(profiles_path(temp.path())).unwrap(),
            "{ not json"
        );
    }

    #[test]
    fn non_object_document_is_rejected() {
        let mut doc = json!([1, 2, 3]);
        assert!(upsert_profile(&mut doc, "cove", &profile(), "now").is_err());
    }
}
