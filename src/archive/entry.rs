//! Per-entry record and the file-table entry walk.
//!
//! ```text
//! name\0 | compSize:u32 | compAligned:u32 | realSize:u32 | flags:u8 | offset:u32|u64
//! ```
//!
//! The offset width is fixed at 4 bytes for version 0x200. For 0x300, the
//! caller tries both widths via [`walk`] and keeps whichever layout
//! [`super::table::select_layout`] judges better.

pub const FLAG_FILE: u8 = 0x01;
/// Entry body has the legacy "mixed" DES encryption applied to its first
/// few blocks. Not implemented; [`super::Archive::get`] rejects it.
pub const FLAG_MIXCRYPT: u8 = 0x02;
/// Entry body is fully DES-encrypted. Not implemented; [`super::Archive::get`]
/// rejects it.
pub const FLAG_DES: u8 = 0x04;

/// One raw, not-yet-decoded entry as read from the file table.
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub name_bytes: Vec<u8>,
    pub comp_size: u32,
    pub comp_aligned: u32,
    pub real_size: u32,
    pub flags: u8,
    pub offset: u64,
}

impl RawEntry {
    pub fn is_file(&self) -> bool {
        self.flags & FLAG_FILE != 0
    }
}

/// Result of walking a table buffer under one offset-width hypothesis.
#[derive(Debug, Default)]
pub struct WalkResult {
    pub entries: Vec<RawEntry>,
    /// Entries that parsed structurally, whether or not they are files.
    pub inspected: usize,
    /// Entries that could not be parsed (truncated metadata); the walk
    /// stops at the first one.
    pub parse_errors: usize,
    /// File entries whose offset or offset+size falls outside the archive.
    pub out_of_range: usize,
}

/// Walks `table` interpreting offsets as `offset_width` bytes (4 or 8),
/// stopping at `max_entries` structurally-parsed entries or when the
/// buffer is exhausted. `archive_length` bounds the out-of-range check.
pub fn walk(table: &[u8], offset_width: usize, max_entries: u32, archive_length: u64) -> WalkResult {
    let mut result = WalkResult::default();
    let mut pos = 0usize;

    while pos < table.len() && (result.inspected as u32) < max_entries {
        let Some(name_end) = table[pos..].iter().position(|&b| b == 0) else {
            result.parse_errors += 1;
            break;
        };
        let name_bytes = table[pos..pos + name_end].to_vec();
        pos += name_end + 1; // skip the NUL terminator

        let fixed_len = 4 + 4 + 4 + 1 + offset_width;
        if pos + fixed_len > table.len() {
            result.parse_errors += 1;
            break;
        }

        let comp_size = u32::from_le_bytes(table[pos..pos + 4].try_into().unwrap());
        pos += 4;
        let comp_aligned = u32::from_le_bytes(table[pos..pos + 4].try_into().unwrap());
        pos += 4;
        let real_size = u32::from_le_bytes(table[pos..pos + 4].try_into().unwrap());
        pos += 4;
        let flags = table[pos];
        pos += 1;

        let offset = if offset_width == 4 {
            u32::from_le_bytes(table[pos..pos + 4].try_into().unwrap()) as u64
        } else {
            u64::from_le_bytes(table[pos..pos + 8].try_into().unwrap())
        };
        pos += offset_width;

        result.inspected += 1;

        let entry = RawEntry {
            name_bytes,
            comp_size,
            comp_aligned,
            real_size,
            flags,
            offset,
        };

        if entry.is_file() {
            let end = entry.offset.saturating_add(entry.comp_aligned as u64);
            if entry.offset >= archive_length || end > archive_length {
                result.out_of_range += 1;
            }
        }

        result.entries.push(entry);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_entry(name: &str, comp_size: u32, comp_aligned: u32, real_size: u32, flags: u8, offset: u64, width: usize) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(name.as_bytes());
        out.push(0);
        out.extend_from_slice(&comp_size.to_le_bytes());
        out.extend_from_slice(&comp_aligned.to_le_bytes());
        out.extend_from_slice(&real_size.to_le_bytes());
        out.push(flags);
        if width == 4 {
            out.extend_from_slice(&(offset as u32).to_le_bytes());
        } else {
            out.extend_from_slice(&offset.to_le_bytes());
        }
        out
    }

    #[test]
    fn walks_entries_with_4_byte_offsets() {
        let mut table = Vec::new();
        table.extend(encode_entry("data\\foo.txt", 5, 5, 5, FLAG_FILE, 46, 4));
        table.extend(encode_entry("data\\dir", 0, 0, 0, 0, 0, 4));

        let result = walk(&table, 4, 100, 1000);
        assert_eq!(result.inspected, 2);
        assert_eq!(result.parse_errors, 0);
        assert_eq!(result.out_of_range, 0);
        assert!(result.entries[0].is_file());
        assert!(!result.entries[1].is_file());
    }

    #[test]
    fn detects_out_of_range_offsets() {
        let mut table = Vec::new();
        table.extend(encode_entry("big.bin", 10, 10, 10, FLAG_FILE, 9000, 4));

        let result = walk(&table, 4, 100, 1000);
        assert_eq!(result.out_of_range, 1);
    }

    #[test]
    fn truncated_metadata_is_a_parse_error() {
        let mut table = Vec::new();
        table.extend_from_slice(b"incomplete\0");
        table.extend_from_slice(&1u32.to_le_bytes()); // short: missing rest of fixed fields

        let result = walk(&table, 4, 100, 1000);
        assert_eq!(result.parse_errors, 1);
        assert_eq!(result.inspected, 0);
    }

    #[test]
    fn stops_at_max_entries() {
        let mut table = Vec::new();
        table.extend(encode_entry("a", 0, 0, 0, FLAG_FILE, 0, 4));
        table.extend(encode_entry("b", 0, 0, 0, FLAG_FILE, 0, 4));

        let result = walk(&table, 4, 1, 1000);
        assert_eq!(result.inspected, 1);
    }
}
