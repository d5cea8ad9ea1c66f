//! 46-byte GRF header parse.
//!
//! ```text
//! offset  size  field
//! 0       16    signature (ASCII, NUL-padded)
//! 16      14    encryption key (unused; any nonzero byte => reject)
//! 30      4     tableOffset (u32 LE)
//! 34      4     seed (u32 LE)
//! 38      4     nFiles (u32 LE)
//! 42      4     version (u32 LE)
//! ```

use std::path::Path;

use crate::error::{GrfError, Result};

pub const HEADER_LEN: u64 = 46;
const SIGNATURE: &[u8] = b"Master of Magic";

pub const VERSION_200: u32 = 0x200;
pub const VERSION_300: u32 = 0x300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub table_offset: u32,
    pub seed: u32,
    pub n_files: u32,
    pub version: u32,
}

impl Header {
    /// Entry count after accounting for the seed and the seven reserved
    /// slots the format always allots.
    pub fn effective_entry_count(&self) -> u32 {
        self.n_files.saturating_sub(self.seed).saturating_sub(7)
    }
}

/// Parses the 46-byte header from `bytes` (exactly [`HEADER_LEN`] bytes).
pub fn parse(bytes: &[u8], path: &Path) -> Result<Header> {
    debug_assert_eq!(bytes.len() as u64, HEADER_LEN);

    let signature = &bytes[0..16];
    let sig_trimmed = &signature[..signature
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(signature.len())];
    if sig_trimmed != SIGNATURE {
        return Err(GrfError::BadHeader {
            path: path.to_path_buf(),
            reason: "signature mismatch".to_string(),
        });
    }

    let encryption_key = &bytes[16..30];
    if encryption_key.iter().any(|&b| b != 0) {
        return Err(GrfError::BadHeader {
            path: path.to_path_buf(),
            reason: "nonzero encryption key: legacy DES-encrypted archives are unsupported".to_string(),
        });
    }

    let table_offset = u32::from_le_bytes(bytes[30..34].try_into().unwrap());
    let seed = u32::from_le_bytes(bytes[34..38].try_into().unwrap());
    let n_files = u32::from_le_bytes(bytes[38..42].try_into().unwrap());
    let version = u32::from_le_bytes(bytes[42..46].try_into().unwrap());

    if version != VERSION_200 && version != VERSION_300 {
        return Err(GrfError::UnsupportedVersion {
            path: path.to_path_buf(),
            version,
        });
    }

    Ok(Header {
        table_offset,
        seed,
        n_files,
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_header(version: u32, table_offset: u32, seed: u32, n_files: u32) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_LEN as usize];
        bytes[0..SIGNATURE.len()].copy_from_slice(SIGNATURE);
        bytes[30..34].copy_from_slice(&table_offset.to_le_bytes());
        bytes[34..38].copy_from_slice(&seed.to_le_bytes());
        bytes[38..42].copy_from_slice(&n_files.to_le_bytes());
        bytes[42..46].copy_from_slice(&version.to_le_bytes());
        bytes
    }

    #[test]
    fn parses_a_valid_v200_header() {
        let bytes = build_header(VERSION_200, 100, 0, 10);
        let header = parse(&bytes, Path::new("a.grf")).unwrap();
        assert_eq!(header.table_offset, 100);
        assert_eq!(header.version, VERSION_200);
        assert_eq!(header.effective_entry_count(), 3);
    }

    #[test]
    fn rejects_bad_signature() {
        let mut bytes = build_header(VERSION_200, 0, 0, 0);
        bytes[0] = b'X';
        assert!(matches!(
            parse(&bytes, Path::new("a.grf")),
            Err(GrfError::BadHeader { .. })
        ));
    }

    #[test]
    fn rejects_nonzero_encryption_key() {
        let mut bytes = build_header(VERSION_200, 0, 0, 0);
        bytes[20] = 1;
        assert!(matches!(
            parse(&bytes, Path::new("a.grf")),
            Err(GrfError::BadHeader { .. })
        ));
    }

    #[test]
    fn rejects_unsupported_version() {
        let bytes = build_header(0x100, 0, 0, 0);
        assert!(matches!(
            parse(&bytes, Path::new("a.grf")),
            Err(GrfError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn effective_entry_count_saturates_at_zero() {
        let bytes = build_header(VERSION_200, 0, 100, 5);
        let header = parse(&bytes, Path::new("a.grf")).unwrap();
        assert_eq!(header.effective_entry_count(), 0);
    }
}
