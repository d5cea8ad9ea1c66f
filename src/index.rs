//! IDX — unified cross-archive index.
//!
//! Archives are ingested in manifest order; earlier archives win on
//! collisions. Both the normalized (`/`-separated, lowercase, NFC) key and
//! a backslash-flavored key are inserted per entry so ad-hoc Windows-style
//! lookups succeed without a second normalization pass.

use std::collections::HashMap;

use crate::encoding::normalize;
use crate::repair_map::RepairMap;

/// Priority-ordered identifier for an ingested archive.
pub type ArchiveId = usize;

/// Value stored in the index for one normalized path.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub archive_id: ArchiveId,
    pub raw_key: Vec<u8>,
    pub mapped_from: Option<String>,
}

/// The result of an [`Idx::resolve`] lookup.
#[derive(Debug, Clone)]
pub enum Lookup {
    Found(IndexEntry),
    NotFound,
}

#[derive(Default)]
#[derive(Debug)]
pub struct Idx {
    by_normalized: HashMap<String, IndexEntry>,
    collisions: usize,
}

impl Idx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingests every entry of one archive. `raw_key_of` extracts the raw
    /// (still-encoded) lookup key and `decoded_path_of` the decoded path
    /// used to compute the normalized key, for each of `entries`.
    pub fn ingest<'a, I>(&mut self, archive_id: ArchiveId, entries: I)
    where
        I: IntoIterator<Item = (&'a [u8], &'a str)>,
    {
        for (raw_key, decoded_path) in entries {
            let n = normalize(decoded_path);
            self.insert_if_absent(
                n,
                IndexEntry {
                    archive_id,
                    raw_key: raw_key.to_vec(),
                    mapped_from: None,
                },
            );

            let n_backslash = decoded_path.to_ascii_lowercase().replace('/', "\\");
            self.insert_if_absent(
                n_backslash,
                IndexEntry {
                    archive_id,
                    raw_key: raw_key.to_vec(),
                    mapped_from: None,
                },
            );
        }
    }

    fn insert_if_absent(&mut self, key: String, value: IndexEntry) {
        if self.by_normalized.contains_key(&key) {
            self.collisions += 1;
        } else {
            self.by_normalized.insert(key, value);
        }
    }

    /// Merges a [`RepairMap`]: for every `mojibake_path -> canonical_path`
    /// pair whose canonical form already resolves, also index the
    /// mojibake form to the same archive entry.
    pub fn merge_repair_map(&mut self, repair_map: &RepairMap) {
        let mut to_insert = Vec::new();
        for (mojibake_path, canonical_path) in &repair_map.paths {
            let canonical_key = normalize(canonical_path);
            if let Some(existing) = self.by_normalized.get(&canonical_key) {
                let mojibake_key = normalize(mojibake_path);
                if !self.by_normalized.contains_key(&mojibake_key) {
                    to_insert.push((
                        mojibake_key,
                        IndexEntry {
                            archive_id: existing.archive_id,
                            raw_key: existing.raw_key.clone(),
                            mapped_from: Some(mojibake_path.clone()),
                        },
                    ));
                }
            }
        }
        for (key, value) in to_insert {
            self.by_normalized.insert(key, value);
        }
    }

    /// Looks up an already-normalized key.
    pub fn resolve_normalized(&self, normalized_key: &str) -> Lookup {
        match self.by_normalized.get(normalized_key) {
            Some(entry) => Lookup::Found(entry.clone()),
            None => Lookup::NotFound,
        }
    }

    /// Normalizes `path` and looks it up.
    pub fn resolve(&self, path: &str) -> Lookup {
        self.resolve_normalized(&normalize(path))
    }

    pub fn len(&self) -> usize {
        self.by_normalized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_normalized.is_empty()
    }

    pub fn collisions(&self) -> usize {
        self.collisions
    }
}
