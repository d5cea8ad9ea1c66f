//! File-table header parse and the dual offset-width layout trial for
//! version 0x300 archives.

use std::path::Path;

use crate::archive::entry::{self, WalkResult};
use crate::archive::header::{Header, VERSION_300};
use crate::error::{GrfError, Result};
use crate::inflate;

/// Inflates the file table located at `header.table_offset` (relative to
/// the end of the 46-byte header) and returns the decompressed bytes.
pub fn inflate_table(full_file: &[u8], header: &Header, path: &Path) -> Result<Vec<u8>> {
    let table_header_start = super::header::HEADER_LEN as usize + header.table_offset as usize;
    if table_header_start + 8 > full_file.len() {
        return Err(GrfError::TableParseError {
            path: path.to_path_buf(),
            reason: "table header runs past end of file".to_string(),
        });
    }

    let compressed_size =
        u32::from_le_bytes(full_file[table_header_start..table_header_start + 4].try_into().unwrap());
    let uncompressed_size = u32::from_le_bytes(
        full_file[table_header_start + 4..table_header_start + 8]
            .try_into()
            .unwrap(),
    );

    let data_start = table_header_start + 8;
    let data_end = data_start
        .checked_add(compressed_size as usize)
        .ok_or_else(|| GrfError::TableParseError {
            path: path.to_path_buf(),
            reason: "compressed table size overflows file length".to_string(),
        })?;
    if data_end > full_file.len() {
        return Err(GrfError::TableParseError {
            path: path.to_path_buf(),
            reason: "compressed table runs past end of file".to_string(),
        });
    }

    inflate::inflate(&full_file[data_start..data_end], uncompressed_size as u64).map_err(|e| {
        GrfError::TableInflateError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })
}

/// Chooses the best offset-width layout for a decompressed table.
///
/// For 0x200 archives the width is fixed at 4. For 0x300, both widths are
/// tried and the result maximizing `inspected` wins, ties broken first by
/// fewer `parse_errors`, then by fewer `out_of_range` offsets.
pub fn select_layout(table: &[u8], header: &Header, archive_length: u64) -> WalkResult {
    let max_entries = header.effective_entry_count();

    if header.version != VERSION_300 {
        return entry::walk(table, 4, max_entries, archive_length);
    }

    let attempt32 = entry::walk(table, 4, max_entries, archive_length);
    let attempt64 = entry::walk(table, 8, max_entries, archive_length);

    if is_better(&attempt64, &attempt32) {
        attempt64
    } else {
        attempt32
    }
}

/// True when `candidate` should be preferred over `current`.
fn is_better(candidate: &WalkResult, current: &WalkResult) -> bool {
    if candidate.inspected != current.inspected {
        return candidate.inspected > current.inspected;
    }
    if candidate.parse_errors != current.parse_errors {
        return candidate.parse_errors < current.parse_errors;
    }
    candidate.out_of_range < current.out_of_range
}
