//! Snapshot persistence for the warp registry.
//!
//! The registry is written as a single pretty-printed JSON document. Writes
//! go to a sibling temporary file first and are renamed into place, so a
//! crash mid-write leaves the previous snapshot intact.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use warpgate_types::NamedLocation;

use crate::error::StoreError;

/// Snapshot format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDocument {
    version: u32,
    warps: Vec<NamedLocation>,
}

/// A JSON snapshot file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarpSnapshotFile {
    path: PathBuf,
}

impl WarpSnapshotFile {
    /// Bind to the snapshot at `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records. A missing file is an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read,
    /// [`StoreError::Serialization`] if it is not a valid snapshot, or
    /// [`StoreError::UnsupportedVersion`] if it was written by another format
    /// version.
    pub fn load(&self) -> Result<Vec<NamedLocation>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No warp snapshot found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let document: SnapshotDocument = serde_json::from_str(&contents)?;
        if document.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: document.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        tracing::debug!(
            path = %self.path.display(),
            count = document.warps.len(),
            "Loaded warp snapshot"
        );
        Ok(document.warps)
    }

    /// Replace the snapshot with `warps`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if encoding fails or
    /// [`StoreError::Io`] if the file cannot be written.
    pub fn save(&self, warps: &[NamedLocation]) -> Result<(), StoreError> {
        let document = SnapshotDocument {
            version: SNAPSHOT_VERSION,
            warps: warps.to_vec(),
        };
        let json = serde_json::to_string_pretty(&document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), count = warps.len(), "Saved warp snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use warpgate_types::{Position, ScopeKey, ScopeMode};

    use super::*;
    use crate::store::LocationStore;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("warpgate-{tag}-{}", uuid::Uuid::new_v4()))
            .join("warps.json")
    }

    #[test]
    fn missing_file_is_empty() {
        let file = WarpSnapshotFile::new(temp_path("missing"));
        let loaded = file.load();
        assert!(loaded.is_ok());
        assert!(loaded.ok().unwrap_or_default().is_empty());
    }

    #[test]
    fn save_then_load_preserves_records() {
        let path = temp_path("roundtrip");
        let file = WarpSnapshotFile::new(&path);

        let store = LocationStore::new(ScopeMode::PerWorld);
        let _ = store.create("home", Position::new("w", 1.0, 2.0, 3.0), Some("Alice"));
        let _ = store.create("mine", Position::new("deep", 4.0, 5.0, 6.0), None);
        let (_, records) = store.snapshot();

        assert!(file.save(&records).is_ok());
        let loaded = file.load().ok().unwrap_or_default();
        assert_eq!(loaded, records);

        let restored = LocationStore::restore(ScopeMode::PerWorld, loaded);
        assert!(
            restored
                .get(&ScopeKey::World(String::from("deep")), "MINE")
                .is_some()
        );

        let _ = std::fs::remove_dir_all(path.parent().unwrap_or(path.as_path()));
    }

    #[test]
    fn rejects_unknown_version() {
        let path = temp_path("version");
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = std::fs::write(&path, r#"{"version": 99, "warps": []}"#);
        let result = WarpSnapshotFile::new(&path).load();
        assert!(matches!(
            result,
            Err(StoreError::UnsupportedVersion { found: 99, .. })
        ));
        let _ = std::fs::remove_dir_all(path.parent().unwrap_or(path.as_path()));
    }

    #[test]
    fn rejects_garbage() {
        let path = temp_path("garbage");
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = std::fs::write(&path, "not json");
        let result = WarpSnapshotFile::new(&path).load();
        assert!(matches!(result, Err(StoreError::Serialization(_))));
        let _ = std::fs::remove_dir_all(path.parent().unwrap_or(path.as_path()));
    }

    #[test]
    fn document_shape_is_stable() {
        let record = NamedLocation {
            name: String::from("spawn"),
            world_name: None,
            position: Position::new("w", 0.0, 64.0, 0.0),
            creator_name: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(SnapshotDocument {
            version: SNAPSHOT_VERSION,
            warps: vec![record],
        })
        .ok();
        let version = json
            .as_ref()
            .and_then(|v| v.get("version"))
            .and_then(serde_json::Value::as_u64);
        assert_eq!(version, Some(1));
        let first_name = json
            .as_ref()
            .and_then(|v| v.get("warps"))
            .and_then(|w| w.get(0))
            .and_then(|w| w.get("name"))
            .and_then(serde_json::Value::as_str);
        assert_eq!(first_name, Some("spawn"));
    }
}
