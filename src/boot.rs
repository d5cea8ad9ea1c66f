//! CFG/BOOT — wires the manifest, parallel archive opens, IDX, RepairMap
//! and the resolver into one process-wide [`BootContainer`].
//!
//! Archive opens are fanned out across a `rayon` pool; IDX ingestion
//! then happens sequentially, in manifest order, because ingestion order
//! is observable (it establishes collision priority). The external
//! consumer contract is expressed as the [`GrfService`] trait so a
//! caller (e.g. an HTTP layer) can depend on the trait alone.

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use rayon::prelude::*;
use regex::Regex;

use crate::archive::Archive;
use crate::cache::{CacheStats, Lru};
use crate::config::Config;
use crate::error::{GrfError, Result};
use crate::index::Idx;
use crate::logging::Logger;
use crate::manifest::Manifest;
use crate::repair_map::RepairMap;
use crate::resolver::{FetchResult, Resolver};

const ARCHIVE_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Aggregate stats returned by [`GrfService::stats`].
#[derive(Debug, Clone)]
pub struct ServiceStats {
    pub cache: CacheStats,
    pub index_entries: usize,
    pub index_collisions: usize,
    pub missing: usize,
    pub archives_loaded: usize,
    pub archives_failed: usize,
}

/// The external consumer contract: answer for bytes, list canonical
/// paths, search by pattern, and report aggregate stats.
pub trait GrfService {
    fn fetch(&self, path: &str) -> FetchResult;
    fn list(&self) -> Vec<String>;
    fn search(&self, pattern: &Regex) -> Vec<String>;
    fn stats(&self) -> ServiceStats;
}

/// The process-wide owner of archives, IDX, LRU, RepairMap and the
/// missing-record ring, created once at startup.
#[derive(Debug)]
pub struct BootContainer {
    resolver: Resolver,
    canonical_paths: Vec<String>,
    index_entries: usize,
    index_collisions: usize,
    archives_loaded: usize,
    archives_failed: usize,
}

impl BootContainer {
    /// Parses the manifest, opens every named archive (fatal per-archive,
    /// not fatal for the whole boot as long as one archive loads), builds
    /// IDX in manifest order, merges the repair map, and returns a ready
    /// container.
    pub fn boot(config: &Config, log: &Logger) -> Result<Self> {
        let manifest = Manifest::parse(config.manifest_path())?;
        let base_dir = config
            .manifest_path()
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        let paths = manifest.archive_paths(&base_dir);

        let threshold = config.auto_detect_threshold();
        let open_results: Vec<(PathBuf, Result<Archive>)> = paths
            .par_iter()
            .map(|path| (path.clone(), open_with_timeout(path, threshold)))
            .collect();

        let mut archives = Vec::new();
        let mut archives_failed = 0usize;
        for (path, result) in open_results {
            match result {
                Ok(archive) => archives.push(archive),
                Err(e) => {
                    archives_failed += 1;
                    log.warn(format!("archive '{}' failed to load: {e}", path.display()));
                }
            }
        }

        if archives.is_empty() {
            return Err(GrfError::ManifestEmpty(config.manifest_path().to_path_buf()));
        }

        let mut idx = Idx::new();
        let mut canonical_paths = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for (archive_id, archive) in archives.iter().enumerate() {
            let entries: Vec<(&[u8], &str)> = archive
                .iter_entries()
                .map(|e| (e.raw_name.as_slice(), e.decoded_name.as_str()))
                .collect();
            for &(_, decoded) in entries.iter() {
                let key = crate::encoding::normalize(decoded);
                if seen.insert(key) {
                    canonical_paths.push(decoded.to_string());
                }
            }
            idx.ingest(archive_id, entries);
        }

        let repair_map = match config.repair_map_path() {
            Some(path) => RepairMap::load_or_default(path, log),
            None => RepairMap::default(),
        };
        idx.merge_repair_map(&repair_map);

        let index_entries = idx.len();
        let index_collisions = idx.collisions();
        let archives_loaded = archives.len();

        let extract_dir = if config.extract_enabled() {
            Some(base_dir.join("extracted"))
        } else {
            None
        };

        let cache = Lru::new(config.cache_max_entries(), config.cache_max_bytes());
        let resolver = Resolver::new(archives, idx, repair_map, cache, extract_dir);

        Ok(Self {
            resolver,
            canonical_paths,
            index_entries,
            index_collisions,
            archives_loaded,
            archives_failed,
        })
    }
}

impl GrfService for BootContainer {
    fn fetch(&self, path: &str) -> FetchResult {
        self.resolver.fetch(path)
    }

    fn list(&self) -> Vec<String> {
        self.canonical_paths.clone()
    }

    fn search(&self, pattern: &Regex) -> Vec<String> {
        self.canonical_paths
            .iter()
            .filter(|p| pattern.is_match(p))
            .cloned()
            .collect()
    }

    fn stats(&self) -> ServiceStats {
        ServiceStats {
            cache: self.resolver.cache_stats(),
            index_entries: self.index_entries,
            index_collisions: self.index_collisions,
            missing: self.resolver.missing_count(),
            archives_loaded: self.archives_loaded,
            archives_failed: self.archives_failed,
        }
    }
}

/// Opens `path` on a dedicated watcher thread, failing with
/// `ArchiveLoadTimeout` if it doesn't complete within 10 seconds. The
/// crate has no async runtime, so this is the only `timeout` primitive
/// available for a blocking mmap+parse call.
fn open_with_timeout(path: &PathBuf, auto_detect_threshold: f64) -> Result<Archive> {
    if !path.exists() {
        return Err(GrfError::ArchiveNotFound(path.clone()));
    }

    let (tx, rx) = mpsc::channel();
    let path_owned = path.clone();
    std::thread::spawn(move || {
        let result = Archive::open_with_threshold(&path_owned, auto_detect_threshold);
        let _ = tx.send(result);
    });

    match rx.recv_timeout(ARCHIVE_LOAD_TIMEOUT) {
        Ok(result) => result,
        Err(_) => Err(GrfError::ArchiveLoadTimeout(path.clone())),
    }
}
