//! RepairMap — the persisted mojibake/C1 repair side table produced by
//! VAL and consumed by IDX at boot.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GrfError, Result};
use crate::logging::Logger;

/// Per-archive summary counts recorded alongside the path mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveSummary {
    pub file: String,
    #[serde(rename = "totalFiles")]
    pub total_files: usize,
    pub mapped: usize,
    pub mojibake: usize,
    pub c1: usize,
    #[serde(rename = "detectedEncoding")]
    pub detected_encoding: String,
}

/// Aggregate counts across every archive in the manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "totalFiles")]
    pub total_files: usize,
    #[serde(rename = "totalMapped")]
    pub total_mapped: usize,
    #[serde(rename = "mojibakeFixed")]
    pub mojibake_fixed: usize,
    #[serde(rename = "c1Fixed")]
    pub c1_fixed: usize,
}

/// The `path-mapping.json` document: a mapping from a mojibake-or-C1-bearing
/// raw path to its canonical (Korean) form, plus per-archive and aggregate
/// summary counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepairMap {
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
    pub grfs: Vec<ArchiveSummary>,
    pub paths: HashMap<String, String>,
    pub summary: Summary,
}

impl RepairMap {
    /// Loads a repair map from `path`. Returns an empty, default map (with
    /// a warning through `log`) if the file is missing or fails to parse —
    /// boot must never fail because of a stale or absent repair map.
    pub fn load_or_default(path: &Path, log: &Logger) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    log.warn(format!(
                        "repair map at '{}' failed to parse ({e}); continuing without it",
                        path.display()
                    ));
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Strictly loads a repair map, surfacing parse errors instead of
    /// silently degrading. Used by tests and by callers that want to
    /// distinguish "absent" from "corrupt".
    pub fn load_strict(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| GrfError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|e| GrfError::DeserializationError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| GrfError::ConfigError(e.to_string()))?;
        std::fs::write(path, json).map_err(|source| GrfError::IoError {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn roundtrips_through_json() {
        let mut map = RepairMap {
            generated_at: "2024-01-01T00:00:00Z".to_string(),
            ..Default::default()
        };
        map.paths.insert("mojibake/path".to_string(), "canonical/path".to_string());
        map.summary.total_files = 10;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("path-mapping.json");
        map.save(&path).unwrap();

        let loaded = RepairMap::load_strict(&path).unwrap();
        assert_eq!(loaded.paths.get("mojibake/path"), Some(&"canonical/path".to_string()));
        assert_eq!(loaded.summary.total_files, 10);
    }

    #[test]
    fn missing_file_loads_as_default_without_panicking() {
        let log = Logger::new(0, true);
        let loaded = RepairMap::load_or_default(Path::new("/nonexistent/path-mapping.json"), &log);
        assert!(loaded.paths.is_empty());
    }

    #[test]
    fn corrupt_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("path-mapping.json");
        std::fs::write(&path, "not json").unwrap();

        let log = Logger::new(0, true);
        let loaded = RepairMap::load_or_default(&path, &log);
        assert!(loaded.paths.is_empty());
    }
}
