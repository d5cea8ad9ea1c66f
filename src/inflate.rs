//! INF — zlib-wrapped DEFLATE decode with an uncompressed-size ceiling.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::{GrfError, Result};

/// Reject any expected uncompressed size above this many bytes.
pub const MAX_UNCOMPRESSED_SIZE: u64 = 512 * 1024 * 1024;

/// Inflates a zlib-wrapped `compressed` blob to exactly
/// `expected_uncompressed_size` bytes.
///
/// Fails if `expected_uncompressed_size` exceeds [`MAX_UNCOMPRESSED_SIZE`],
/// if the stream is not valid zlib, or if the decoded length does not
/// match `expected_uncompressed_size` exactly.
pub fn inflate(compressed: &[u8], expected_uncompressed_size: u64) -> Result<Vec<u8>> {
    if expected_uncompressed_size > MAX_UNCOMPRESSED_SIZE {
        return Err(inflate_error(format!(
            "expected uncompressed size {expected_uncompressed_size} exceeds the {MAX_UNCOMPRESSED_SIZE} byte ceiling"
        )));
    }

    let expected = expected_uncompressed_size as usize;
    let mut decoder = ZlibDecoder::new(compressed);
    let mut out = Vec::with_capacity(expected);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| inflate_error(e.to_string()))?;

    if out.len() != expected {
        return Err(inflate_error(format!(
            "decoded {} bytes, expected exactly {expected}",
            out.len()
        )));
    }

    Ok(out)
}

fn inflate_error(reason: String) -> GrfError {
    GrfError::TableInflateError {
        path: std::path::PathBuf::new(),
        reason,
    }
}
