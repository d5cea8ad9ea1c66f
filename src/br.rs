//! BR — positioned byte reads over an opened archive file.
//!
//! A thin, stateless-aside-from-the-handle wrapper over a memory-mapped
//! file. Multiple reads may be interleaved; a short read is always
//! surfaced as [`GrfError::Truncated`], never a silently shortened buffer.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::{GrfError, Result};

/// A positioned byte source backed by a memory-mapped file.
#[derive(Debug)]
pub struct ByteReader {
    path: PathBuf,
    mmap: Mmap,
}

impl ByteReader {
    /// Opens `path` and memory-maps it for positioned reads.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| GrfError::IoError {
            path: path.clone(),
            source,
        })?;
        // SAFETY: the archive file is not expected to be mutated by another
        // process while mapped; a truncation underneath us surfaces as a
        // bounds failure in `read_at`, not undefined behavior, because we
        // never read past `mmap.len()`.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| GrfError::IoError {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, mmap })
    }

    /// Total length of the underlying file, in bytes.
    pub fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Reads exactly `length` bytes starting at `position`.
    ///
    /// Returns [`GrfError::Truncated`] if the requested range runs past the
    /// end of the file.
    pub fn read_at(&self, position: u64, length: u64) -> Result<&[u8]> {
        let start = usize::try_from(position).map_err(|_| GrfError::Truncated {
            path: self.path.clone(),
            offset: position,
            wanted: length,
            got: 0,
        })?;
        let len = usize::try_from(length).map_err(|_| GrfError::Truncated {
            path: self.path.clone(),
            offset: position,
            wanted: length,
            got: 0,
        })?;
        let end = start.checked_add(len).ok_or(GrfError::Truncated {
            path: self.path.clone(),
            offset: position,
            wanted: length,
            got: 0,
        })?;

        if end > self.mmap.len() {
            let got = self.mmap.len().saturating_sub(start) as u64;
            return Err(GrfError::Truncated {
                path: self.path.clone(),
                offset: position,
                wanted: length,
                got,
            });
        }

        Ok(&self.mmap[start..end])
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
