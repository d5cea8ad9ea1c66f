//! Runtime configuration envelope.
//!
//! Mirrors the recognized configuration keys of the archive engine: cache
//! bounds, encoding auto-detection threshold, whether resolved bytes are
//! mirrored to disk, and the entry-count cap applied while auto-detecting
//! an archive's encoding. Built three ways: [`Config::default`] for the
//! documented defaults, [`ConfigBuilder`] for programmatic/library callers
//! and tests, and `clap`-derived flags on the validator CLI (see
//! [`crate::cli`]).

use std::path::{Path, PathBuf};

use crate::error::{GrfError, Result};

/// Default LRU entry-count bound (`cache.maxEntries`).
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 100;
/// Default LRU byte bound, in megabytes (`cache.maxMemoryMB`).
pub const DEFAULT_CACHE_MAX_MEMORY_MB: u64 = 256;
/// Default fraction of invalid-UTF-8 names above which CP949 is selected.
pub const DEFAULT_AUTO_DETECT_THRESHOLD: f64 = 0.01;

/// The resolved configuration envelope for one boot of the archive engine.
#[derive(Debug, Clone)]
pub struct Config {
    manifest_path: PathBuf,
    repair_map_path: Option<PathBuf>,
    cache_max_entries: u64,
    cache_max_memory_mb: u64,
    auto_detect_threshold: f64,
    extract_enabled: bool,
    scan_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from("DATA.INI"),
            repair_map_path: None,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            cache_max_memory_mb: DEFAULT_CACHE_MAX_MEMORY_MB,
            auto_detect_threshold: DEFAULT_AUTO_DETECT_THRESHOLD,
            extract_enabled: false,
            scan_limit: 0,
        }
    }
}

impl Config {
    /// Start a builder for programmatic construction.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn repair_map_path(&self) -> Option<&Path> {
        self.repair_map_path.as_deref()
    }

    /// The byte-budget-bound LRU entry count.
    pub fn cache_max_entries(&self) -> u64 {
        self.cache_max_entries
    }

    /// The LRU byte budget, in bytes.
    pub fn cache_max_bytes(&self) -> u64 {
        self.cache_max_memory_mb * 1024 * 1024
    }

    pub fn auto_detect_threshold(&self) -> f64 {
        self.auto_detect_threshold
    }

    pub fn extract_enabled(&self) -> bool {
        self.extract_enabled
    }

    /// Max entries inspected during encoding auto-detect; 0 means
    /// unbounded (inspect the full table).
    pub fn scan_limit(&self) -> usize {
        self.scan_limit
    }
}

/// Builder for [`Config`]. Unset fields fall back to the documented
/// defaults.
#[derive(Default)]
pub struct ConfigBuilder {
    manifest_path: Option<PathBuf>,
    repair_map_path: Option<PathBuf>,
    cache_max_entries: Option<u64>,
    cache_max_memory_mb: Option<u64>,
    auto_detect_threshold: Option<f64>,
    extract_enabled: Option<bool>,
    scan_limit: Option<usize>,
}

impl ConfigBuilder {
    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    pub fn repair_map_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.repair_map_path = Some(path.into());
        self
    }

    pub fn cache_max_entries(mut self, n: u64) -> Self {
        self.cache_max_entries = Some(n);
        self
    }

    /// Accepts a human-readable size string such as `"256M"` or a raw byte
    /// count, following the same suffix grammar as the archive's own size
    /// fields (`B`/`K`/`M`/`G`/`T`, case-insensitive, decimal multipliers
    /// such as `"1.5G"` allowed).
    pub fn cache_max_bytes_str(mut self, s: &str) -> Result<Self> {
        let bytes = parse_size(s)?;
        self.cache_max_memory_mb = Some(bytes / (1024 * 1024));
        Ok(self)
    }

    pub fn cache_max_memory_mb(mut self, mb: u64) -> Self {
        self.cache_max_memory_mb = Some(mb);
        self
    }

    pub fn auto_detect_threshold(mut self, threshold: f64) -> Self {
        self.auto_detect_threshold = Some(threshold);
        self
    }

    pub fn extract_enabled(mut self, enabled: bool) -> Self {
        self.extract_enabled = Some(enabled);
        self
    }

    pub fn scan_limit(mut self, limit: usize) -> Self {
        self.scan_limit = Some(limit);
        self
    }

    pub fn build(self) -> Config {
        let default = Config::default();
        Config {
            manifest_path: self.manifest_path.unwrap_or(default.manifest_path),
            repair_map_path: self.repair_map_path.or(default.repair_map_path),
            cache_max_entries: self.cache_max_entries.unwrap_or(default.cache_max_entries),
            cache_max_memory_mb: self
                .cache_max_memory_mb
                .unwrap_or(default.cache_max_memory_mb),
            auto_detect_threshold: self
                .auto_detect_threshold
                .unwrap_or(default.auto_detect_threshold),
            extract_enabled: self.extract_enabled.unwrap_or(default.extract_enabled),
            scan_limit: self.scan_limit.unwrap_or(default.scan_limit),
        }
    }
}

/// Parse a human-readable byte-size string (`"256M"`, `"1.5G"`, `"2048"`)
/// into a raw byte count.
pub(crate) fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim();

    if let Ok(bytes) = s.parse::<u64>() {
        return Ok(bytes);
    }

    let mut split_pos = s.len();
    for (i, ch) in s.char_indices() {
        if ch.is_alphabetic() {
            split_pos = i;
            break;
        }
    }
    let (num_part, suffix) = s.split_at(split_pos);
    if num_part.is_empty() {
        return Err(GrfError::ConfigError(format!("'{s}' has no numeric part")));
    }

    let multiplier: u64 = match suffix.to_uppercase().as_str() {
        "B" | "" => 1,
        "K" | "KB" | "KIB" => 1024,
        "M" | "MB" | "MIB" => 1024 * 1024,
        "G" | "GB" | "GIB" => 1024 * 1024 * 1024,
        "T" | "TB" | "TIB" => 1024_u64.pow(4),
        other => return Err(GrfError::ConfigError(format!("unknown size suffix '{other}'"))),
    };

    let base: f64 = num_part
        .parse()
        .map_err(|_| GrfError::ConfigError(format!("'{s}' is not a valid size")))?;

    Ok((base * multiplier as f64) as u64)
}
