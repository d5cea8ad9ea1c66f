//! CFG — manifest parsing.
//!
//! Parses a `DATA.INI`-style manifest: an INI-like file with a single
//! `[data]` section whose keys are ignored and whose values are archive
//! filenames, listed in priority order (earlier entries shadow later ones
//! during IDX ingestion). `;` and `#` start a comment to end of line;
//! blank lines and lines outside `[data]` are ignored.

use std::path::{Path, PathBuf};

use crate::error::{GrfError, Result};

/// A parsed manifest: the archive filenames named under `[data]`, in file
/// order, duplicates removed keeping the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    archives: Vec<String>,
}

impl Manifest {
    /// Parses a manifest from `path`.
    pub fn parse(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                GrfError::ManifestMissing(path.to_path_buf())
            } else {
                GrfError::IoError {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let manifest = Self::parse_str(&contents);
        if manifest.archives.is_empty() {
            return Err(GrfError::ManifestEmpty(path.to_path_buf()));
        }
        Ok(manifest)
    }

    /// Parses manifest text directly, without touching the filesystem.
    pub fn parse_str(contents: &str) -> Self {
        let mut archives = Vec::new();
        let mut in_data_section = false;

        for raw_line in contents.lines() {
            let line = strip_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                in_data_section = line.eq_ignore_ascii_case("[data]");
                continue;
            }

            if !in_data_section {
                continue;
            }

            let Some((_key, value)) = line.split_once('=') else {
                continue;
            };
            let filename = value.trim();
            if filename.is_empty() {
                continue;
            }
            if !archives.iter().any(|existing: &String| existing == filename) {
                archives.push(filename.to_string());
            }
        }

        Self { archives }
    }

    /// Archive filenames in priority order (first wins on collision).
    pub fn archives(&self) -> &[String] {
        &self.archives
    }

    /// Resolves each archive filename against `base_dir`.
    pub fn archive_paths(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.archives.iter().map(|name| base_dir.join(name)).collect()
    }
}

fn strip_comment(line: &str) -> &str {
    let cut = line.find([';', '#']).unwrap_or(line.len());
    &line[..cut]
}
