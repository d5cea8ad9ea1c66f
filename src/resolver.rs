//! RES — resolver: the single entry point answering "give me the bytes
//! for path P".
//!
//! `fetch` runs a four-step sequence: cache, optional on-disk mirror, IDX
//! (plus a RepairMap-assisted retry), then a recorded miss. The fifth
//! step described by some archive-engine folklore — scanning archives
//! sequentially as a last resort — is intentionally not implemented here;
//! IDX is treated as authoritative.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::archive::Archive;
use crate::cache::Lru;
use crate::index::{Idx, Lookup};
use crate::repair_map::RepairMap;

/// Outcome of a [`Resolver::fetch`] call.
#[derive(Debug, Clone)]
pub enum FetchResult {
    Found(Arc<[u8]>),
    NotFound,
}

/// An audit record for an exhausted lookup miss.
#[derive(Debug, Clone)]
pub struct MissingRecord {
    pub requested_path: String,
    pub normalized: String,
    pub tried_alternates: Vec<String>,
}

const MISSING_RING_CAPACITY: usize = 1000;

/// Resolves paths against a priority-ordered set of archives via IDX and
/// an LRU cache, with an optional on-disk extraction mirror probed ahead
/// of the index.
#[derive(Debug)]
pub struct Resolver {
    archives: Vec<Archive>,
    idx: Idx,
    repair_map: RepairMap,
    cache: Mutex<Lru>,
    missing: Mutex<VecDeque<MissingRecord>>,
    extract_dir: Option<PathBuf>,
}

impl Resolver {
    pub fn new(
        archives: Vec<Archive>,
        idx: Idx,
        repair_map: RepairMap,
        cache: Lru,
        extract_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            archives,
            idx,
            repair_map,
            cache: Mutex::new(cache),
            missing: Mutex::new(VecDeque::with_capacity(MISSING_RING_CAPACITY)),
            extract_dir,
        }
    }

    /// Resolves `path` to its bytes.
    pub fn fetch(&self, path: &str) -> FetchResult {
        let key = path.to_lowercase();

        if let Some(buf) = self.cache.lock().unwrap().get(&key) {
            return FetchResult::Found(buf);
        }

        if let Some(dir) = &self.extract_dir {
            let mirror_path = dir.join(path.trim_start_matches(['/', '\\']));
            if let Ok(bytes) = std::fs::read(&mirror_path) {
                let buf: Arc<[u8]> = Arc::from(bytes);
                self.cache.lock().unwrap().put(key, Arc::clone(&buf));
                return FetchResult::Found(buf);
            }
        }

        let mut tried = Vec::new();
        if let Some(buf) = self.lookup_and_extract(path, &mut tried) {
            self.cache.lock().unwrap().put(key, Arc::clone(&buf));
            return FetchResult::Found(buf);
        }

        if let Some(alternate) = self.repair_map.paths.get(path).or_else(|| {
            self.repair_map
                .paths
                .iter()
                .find(|(_, canonical)| canonical.as_str() == path)
                .map(|(mojibake, _)| mojibake)
        }) {
            tried.push(alternate.clone());
            if let Some(buf) = self.lookup_and_extract(alternate, &mut tried) {
                self.cache.lock().unwrap().put(key, Arc::clone(&buf));
                return FetchResult::Found(buf);
            }
        }

        self.record_missing(path, &key, tried);
        FetchResult::NotFound
    }

    fn lookup_and_extract(&self, path: &str, tried: &mut Vec<String>) -> Option<Arc<[u8]>> {
        tried.push(path.to_string());
        let entry = match self.idx.resolve(path) {
            Lookup::Found(entry) => entry,
            Lookup::NotFound => return None,
        };
        let archive = self.archives.get(entry.archive_id)?;
        archive.get(&entry.raw_key).ok().map(Arc::from)
    }

    fn record_missing(&self, requested_path: &str, normalized: &str, tried_alternates: Vec<String>) {
        let mut ring = self.missing.lock().unwrap();
        if ring.len() == MISSING_RING_CAPACITY {
            ring.pop_front();
        }
        ring.push_back(MissingRecord {
            requested_path: requested_path.to_string(),
            normalized: normalized.to_string(),
            tried_alternates,
        });
    }

    pub fn missing_count(&self) -> usize {
        self.missing.lock().unwrap().len()
    }

    pub fn cache_stats(&self) -> crate::cache::CacheStats {
        self.cache.lock().unwrap().stats()
    }

    pub fn archive_paths(&self) -> Vec<&Path> {
        self.archives.iter().map(Archive::path).collect()
    }
}
