//! Shared fixtures for crate-level integration tests: a byte-exact,
//! hand-built GRF archive writer and a `DATA.INI` manifest writer.

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::ZlibEncoder;

use grf_archive::archive::{FLAG_FILE, VERSION_200, VERSION_300};

pub fn zlib_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Builds a minimal, valid version-0x200 archive (4-byte offsets) holding
/// `files`.
pub fn build_grf_v200(files: &[(&str, &[u8])]) -> Vec<u8> {
    let files: Vec<(&[u8], &[u8])> = files.iter().map(|(n, c)| (n.as_bytes(), *c)).collect();
    build_grf_raw(&files, VERSION_200, 4)
}

/// Builds a minimal, valid version-0x300 archive using `offset_width`
/// (4 or 8) bytes per entry offset.
pub fn build_grf_v300(files: &[(&str, &[u8])], offset_width: usize) -> Vec<u8> {
    let files: Vec<(&[u8], &[u8])> = files.iter().map(|(n, c)| (n.as_bytes(), *c)).collect();
    build_grf_raw(&files, VERSION_300, offset_width)
}

/// Like [`build_grf_v200`], but takes raw (possibly non-UTF-8) name
/// bytes directly, for archives whose filenames are written in a legacy
/// byte encoding.
pub fn build_grf_raw_v200(files: &[(&[u8], &[u8])]) -> Vec<u8> {
    build_grf_raw(files, VERSION_200, 4)
}

fn build_grf_raw(files: &[(&[u8], &[u8])], version: u32, offset_width: usize) -> Vec<u8> {
    let mut body = Vec::new();
    let mut table_entries = Vec::new();

    for (name, content) in files {
        let offset = body.len() as u64;
        let compressed = zlib_compress(content);
        let comp_aligned = compressed.len() as u32;
        body.extend_from_slice(&compressed);

        table_entries.extend_from_slice(name);
        table_entries.push(0);
        table_entries.extend_from_slice(&comp_aligned.to_le_bytes());
        table_entries.extend_from_slice(&comp_aligned.to_le_bytes());
        table_entries.extend_from_slice(&(content.len() as u32).to_le_bytes());
        table_entries.push(FLAG_FILE);
        if offset_width == 4 {
            table_entries.extend_from_slice(&(offset as u32).to_le_bytes());
        } else {
            table_entries.extend_from_slice(&offset.to_le_bytes());
        }
    }

    let table_compressed = zlib_compress(&table_entries);

    let mut header = vec![0u8; 46];
    header[0..15].copy_from_slice(b"Master of Magic");
    let table_offset = body.len() as u32;
    header[30..34].copy_from_slice(&table_offset.to_le_bytes());
    header[34..38].copy_from_slice(&0u32.to_le_bytes());
    header[38..42].copy_from_slice(&(files.len() as u32 + 7).to_le_bytes());
    header[42..46].copy_from_slice(&version.to_le_bytes());

    let mut out = header;
    out.extend_from_slice(&body);
    out.extend_from_slice(&(table_compressed.len() as u32).to_le_bytes());
    out.extend_from_slice(&(table_entries.len() as u32).to_le_bytes());
    out.extend_from_slice(&table_compressed);
    out
}

/// Writes `archives` (filename -> contents) plus a `DATA.INI` manifest
/// listing them in the given priority order, into `dir`.
pub fn write_manifest(dir: &Path, archives: &[(&str, Vec<u8>)]) {
    let mut manifest = String::from("[data]\n");
    for (i, (name, bytes)) in archives.iter().enumerate() {
        std::fs::write(dir.join(name), bytes).unwrap();
        manifest.push_str(&format!("{i}={name}\n"));
    }
    std::fs::write(dir.join("DATA.INI"), manifest).unwrap();
}
