//! Versioned JSON snapshots of a project.
//!
//! Snapshots are plain bytes; reading and writing files is left to the
//! caller. Older schema versions are migrated forward step by step before
//! deserialization, and the loaded project is validated.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use snapcut_core::{Result, SnapcutError};
use tracing::debug;

use crate::project::Project;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 2;

/// Versioned project snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Schema version for migration.
    pub version: u32,
    pub project: Project,
    /// Library version that wrote the snapshot.
    pub app_version: String,
}

impl ProjectFile {
    pub fn new(project: Project) -> Self {
        Self {
            version: CURRENT_VERSION,
            project,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| SnapcutError::Serialization(format!("Failed to serialize project: {}", e)))
    }

    /// Deserialize from JSON bytes, migrating and validating.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: Value = serde_json::from_slice(data)
            .map_err(|e| SnapcutError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(Value::as_u64).unwrap_or(0) as u32;
        if version > CURRENT_VERSION {
            return Err(SnapcutError::Serialization(format!(
                "Project file version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;
        let file: Self = serde_json::from_value(migrated)
            .map_err(|e| SnapcutError::Serialization(format!("Failed to parse project: {}", e)))?;
        file.project.validate()?;
        debug!(from = version, tracks = file.project.tracks.len(), "Loaded project snapshot");
        Ok(file)
    }
}

/// Apply sequential migrations from `from_version` to [`CURRENT_VERSION`].
fn migrate(mut data: Value, from_version: u32) -> Result<Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: bare project without the wrapper
                if data.get("version").is_none() {
                    data = serde_json::json!({
                        "version": 1,
                        "project": data,
                        "app_version": "0.1.0",
                    });
                }
                version = 1;
            }
            1 => {
                // v1 → v2: clip sources were file paths, now media ids
                migrate_clip_sources(&mut data);
                data["version"] = Value::from(2);
                version = 2;
            }
            _ => {
                return Err(SnapcutError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}

fn migrate_clip_sources(data: &mut Value) {
    let Some(tracks) = data
        .pointer_mut("/project/tracks")
        .and_then(Value::as_array_mut)
    else {
        return;
    };
    let clips = tracks
        .iter_mut()
        .filter_map(|t| t.get_mut("clips").and_then(Value::as_array_mut))
        .flatten();
    for clip in clips {
        if let Some(source) = clip.get_mut("source").and_then(Value::as_object_mut) {
            if let Some(path) = source.remove("path") {
                source.entry("media_id").or_insert(path);
            }
        }
    }
}
