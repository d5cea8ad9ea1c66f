//! ARC — archive reader: header/table parse, entry walk, on-demand
//! extraction.

mod entry;
mod header;
mod table;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::br::ByteReader;
use crate::encoding::{self, Encoding};
use crate::error::{GrfError, Result};
use crate::inflate;

pub use entry::{FLAG_DES, FLAG_FILE, FLAG_MIXCRYPT};
pub use header::{VERSION_200, VERSION_300};

/// One decoded, addressable entry inside an archive.
#[derive(Debug, Clone)]
pub struct Entry {
    pub raw_name: Vec<u8>,
    pub decoded_name: String,
    pub comp_aligned: u32,
    pub real_size: u32,
    pub flags: u8,
    pub offset: u64,
    pub has_replacement_char: bool,
}

impl Entry {
    pub fn is_file(&self) -> bool {
        self.flags & FLAG_FILE != 0
    }

    /// True if this entry carries either legacy DES encryption variant.
    pub fn is_encrypted(&self) -> bool {
        self.flags & (FLAG_MIXCRYPT | FLAG_DES) != 0
    }
}

/// Per-archive summary counts, exposed by [`Archive::stats`].
#[derive(Debug, Clone, Default)]
pub struct ArchiveStats {
    pub total_entries: usize,
    pub bad_name_count: usize,
    pub detected_encoding: Option<Encoding>,
    pub extension_counts: HashMap<String, usize>,
}

/// One opened, parsed GRF archive. Immutable after [`Archive::open`].
#[derive(Debug)]
pub struct Archive {
    path: PathBuf,
    reader: ByteReader,
    version: u32,
    encoding: Encoding,
    entries: Vec<Entry>,
    by_raw_key: HashMap<Vec<u8>, usize>,
}

impl Archive {
    /// Opens `path` using the default encoding auto-detect threshold. See
    /// [`Archive::open_with_threshold`] for a configurable variant.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_threshold(path, crate::config::DEFAULT_AUTO_DETECT_THRESHOLD)
    }

    /// Opens `path`, validates the header, inflates and parses the file
    /// table, and decodes every addressable entry's name. `auto_detect_threshold`
    /// is the fraction of invalid-UTF-8 names above which CP949 is selected.
    pub fn open_with_threshold(path: impl AsRef<Path>, auto_detect_threshold: f64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let reader = ByteReader::open(&path)?;
        let length = reader.len();

        let header_bytes = reader.read_at(0, header::HEADER_LEN)?;
        let parsed_header = header::parse(header_bytes, &path)?;

        let full_file = reader.read_at(0, length)?;
        let table = table::inflate_table(full_file, &parsed_header, &path)?;
        let walk_result = table::select_layout(&table, &parsed_header, length);

        if walk_result.parse_errors > 0 && walk_result.inspected == 0 {
            return Err(GrfError::TableParseError {
                path: path.clone(),
                reason: "no entries could be parsed from the file table".to_string(),
            });
        }

        let encoding = detect_encoding(&walk_result.entries, auto_detect_threshold);

        let mut entries = Vec::with_capacity(walk_result.entries.len());
        let mut by_raw_key = HashMap::new();
        for raw in walk_result.entries {
            if !raw.is_file() {
                continue;
            }
            let decoded_name = encoding::decode(&raw.name_bytes, encoding)
                .unwrap_or_else(|_| String::from_utf8_lossy(&raw.name_bytes).into_owned());
            let has_replacement_char = encoding::count_replacement(&decoded_name) > 0;

            let key_index = entries.len();
            by_raw_key.insert(raw.name_bytes.clone(), key_index);

            entries.push(Entry {
                raw_name: raw.name_bytes,
                decoded_name,
                comp_aligned: raw.comp_aligned,
                real_size: raw.real_size,
                flags: raw.flags,
                offset: raw.offset,
                has_replacement_char,
            });
        }

        Ok(Self {
            path,
            reader,
            version: parsed_header.version,
            encoding,
            entries,
            by_raw_key,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Lazily-style sequence of every addressable entry. Restartable: each
    /// call returns a fresh iterator over the immutable entry list.
    pub fn iter_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Extracts and inflates the bytes for `raw_key` (the raw, still-encoded
    /// name bytes as stored in the archive).
    pub fn get(&self, raw_key: &[u8]) -> Result<Vec<u8>> {
        let index = *self
            .by_raw_key
            .get(raw_key)
            .ok_or_else(|| GrfError::MissingEntry(String::from_utf8_lossy(raw_key).into_owned()))?;
        let entry = &self.entries[index];

        if entry.is_encrypted() {
            return Err(GrfError::UnsupportedEncryption {
                path: self.path.clone(),
                entry: entry.decoded_name.clone(),
            });
        }

        if entry.real_size == 0 {
            return Ok(Vec::new());
        }

        let body_offset = header::HEADER_LEN + entry.offset;
        let compressed = self.reader.read_at(body_offset, entry.comp_aligned as u64)?;
        inflate::inflate(compressed, entry.real_size as u64).map_err(|e| GrfError::InflateError {
            path: self.path.clone(),
            entry: entry.decoded_name.clone(),
            reason: e.to_string(),
        })
    }

    pub fn stats(&self) -> ArchiveStats {
        let mut extension_counts = HashMap::new();
        let mut bad_name_count = 0;
        for entry in &self.entries {
            if entry.has_replacement_char {
                bad_name_count += 1;
            }
            if let Some(ext) = entry.decoded_name.rsplit('.').next() {
                *extension_counts.entry(ext.to_ascii_lowercase()).or_insert(0) += 1;
            }
        }
        ArchiveStats {
            total_entries: self.entries.len(),
            bad_name_count,
            detected_encoding: if self.entries.is_empty() {
                None
            } else {
                Some(self.encoding)
            },
            extension_counts,
        }
    }
}

/// Auto-detects an archive's filename encoding: try UTF-8 strict on every
/// file entry's raw name; if the fraction failing strict UTF-8 exceeds
/// `threshold`, select CP949. An archive with zero inspected file entries
/// has "unknown" encoding, represented here as CP949 with no entries to
/// decode under it (callers should check `total_entries == 0` separately
/// via [`ArchiveStats`]).
fn detect_encoding(raw_entries: &[entry::RawEntry], threshold: f64) -> Encoding {
    let file_entries: Vec<&entry::RawEntry> = raw_entries.iter().filter(|e| e.is_file()).collect();
    if file_entries.is_empty() {
        return Encoding::Cp949;
    }

    let invalid = file_entries
        .iter()
        .filter(|e| !encoding::is_utf8(&e.name_bytes))
        .count();
    let fraction_invalid = invalid as f64 / file_entries.len() as f64;

    if fraction_invalid > threshold {
        Encoding::Cp949
    } else {
        Encoding::Utf8Strict
    }
}
