//! VAL — deep validator.
//!
//! Iterates every decoded filename across all archives, classifies each
//! one, computes a per-archive and aggregate health score, and produces
//! a [`RepairMap`] ready to persist as JSON. Archives are scanned in
//! parallel with `rayon::par_iter`, then folded sequentially into a
//! deterministic summary, the same shape the archive engine's own
//! parallel-scan-then-aggregate commands use elsewhere in this crate.

use rayon::prelude::*;

use crate::archive::Archive;
use crate::encoding::{self, Encoding};
use crate::logging::Logger;
use crate::repair_map::{ArchiveSummary, RepairMap, Summary};

/// Per-filename classification produced while validating one archive.
#[derive(Debug, Clone, Default)]
struct ArchiveCounts {
    total: usize,
    bad_ufffd: usize,
    bad_c1: usize,
    mojibake: usize,
    roundtrip_raw_fail: usize,
    roundtrip_repairable: usize,
    roundtrip_final_fail: usize,
    mapped: Vec<(String, String)>,
}

struct ArchiveReport {
    file: String,
    encoding: Encoding,
    counts: ArchiveCounts,
}

/// The result of running [`validate`] over a set of archives.
pub struct Outcome {
    pub repair_map: RepairMap,
    pub exit_code: i32,
}

/// Classifies every decoded filename in `archives`, logging per-archive
/// progress through `log`. `failed_to_load` is the count of manifest
/// archives that could not be opened at all (per-archive fatal errors
/// upstream in boot); it contributes only to the aggregate exit code.
pub fn validate(archives: &[Archive], failed_to_load: usize, log: &Logger) -> Outcome {
    let reports: Vec<ArchiveReport> = archives
        .par_iter()
        .map(|archive| {
            let counts = classify_archive(archive);
            ArchiveReport {
                file: archive.path().display().to_string(),
                encoding: archive.encoding(),
                counts,
            }
        })
        .collect();

    let mut grfs = Vec::with_capacity(reports.len());
    let mut summary = Summary::default();
    let mut paths = std::collections::HashMap::new();
    let mut any_final_fail = false;
    let mut any_warning = false;

    for report in &reports {
        log.info(format!(
            "{}: {} files, {} mojibake, {} c1, encoding {}",
            report.file,
            report.counts.total,
            report.counts.mojibake,
            report.counts.bad_c1,
            report.encoding.label()
        ));

        summary.total_files += report.counts.total;
        summary.total_mapped += report.counts.mapped.len();
        summary.mojibake_fixed += report.counts.mapped.len().min(report.counts.mojibake);
        summary.c1_fixed += report.counts.roundtrip_repairable;

        if report.counts.roundtrip_final_fail > 0 {
            any_final_fail = true;
        }
        if report.counts.roundtrip_repairable > 0 || report.counts.bad_ufffd > 0 {
            any_warning = true;
        }

        for (broken, canonical) in &report.counts.mapped {
            paths.insert(broken.clone(), canonical.clone());
        }

        grfs.push(ArchiveSummary {
            file: report.file.clone(),
            total_files: report.counts.total,
            mapped: report.counts.mapped.len(),
            mojibake: report.counts.mojibake,
            c1: report.counts.bad_c1,
            detected_encoding: report.encoding.label().to_string(),
        });
    }

    let exit_code = if failed_to_load > 0 || any_final_fail {
        2
    } else if any_warning {
        1
    } else {
        0
    };

    let repair_map = RepairMap {
        generated_at: String::new(),
        grfs,
        paths,
        summary,
    };

    Outcome { repair_map, exit_code }
}

fn classify_archive(archive: &Archive) -> ArchiveCounts {
    let mut counts = ArchiveCounts::default();
    let enc = archive.encoding();

    for entry in archive.iter_entries() {
        counts.total += 1;
        let name = &entry.decoded_name;

        let has_ufffd = encoding::count_replacement(name) > 0;
        let c1_count = encoding::count_c1(name);
        let is_mojibake = encoding::is_mojibake(name);

        if has_ufffd {
            counts.bad_ufffd += 1;
        }
        if c1_count > 0 {
            counts.bad_c1 += 1;
        }
        if is_mojibake {
            counts.mojibake += 1;
            let fixed = encoding::fix_mojibake(name);
            if fixed != *name {
                counts.mapped.push((name.clone(), fixed));
            }
        }

        if !encoding::roundtrip_ok(name, enc) {
            counts.roundtrip_raw_fail += 1;
            let repaired = encoding::repair(name, enc);
            if encoding::roundtrip_ok(&repaired, enc) {
                counts.roundtrip_repairable += 1;
                if repaired != *name {
                    counts.mapped.push((name.clone(), repaired));
                }
            } else {
                counts.roundtrip_final_fail += 1;
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use tempfile::TempDir;

    use super::*;
    use crate::archive::FLAG_FILE;

    fn zlib_compress(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn build_grf(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        let mut table_entries = Vec::new();

        for (name, content) in files {
            let offset = body.len() as u32;
            let compressed = zlib_compress(content);
            let comp_aligned = compressed.len() as u32;
            body.extend_from_slice(&compressed);

            table_entries.extend_from_slice(name.as_bytes());
            table_entries.push(0);
            table_entries.extend_from_slice(&comp_aligned.to_le_bytes());
            table_entries.extend_from_slice(&comp_aligned.to_le_bytes());
            table_entries.extend_from_slice(&(content.len() as u32).to_le_bytes());
            table_entries.push(FLAG_FILE);
            table_entries.extend_from_slice(&offset.to_le_bytes());
        }

        let table_compressed = zlib_compress(&table_entries);

        let mut header = vec![0u8; 46];
        header[0..15].copy_from_slice(b"Master of Magic");
        let table_offset = body.len() as u32;
        header[30..34].copy_from_slice(&table_offset.to_le_bytes());
        header[34..38].copy_from_slice(&0u32.to_le_bytes());
        header[38..42].copy_from_slice(&(files.len() as u32 + 7).to_le_bytes());
        header[42..46].copy_from_slice(&crate::archive::VERSION_200.to_le_bytes());

        let mut out = header;
        out.extend_from_slice(&body);
        out.extend_from_slice(&(table_compressed.len() as u32).to_le_bytes());
        out.extend_from_slice(&(table_entries.len() as u32).to_le_bytes());
        out.extend_from_slice(&table_compressed);
        out
    }

    #[test]
    fn scenario_s5_clean_archive_exits_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.grf");
        std::fs::write(&path, build_grf(&[("data\\clean.txt", b"hi")])).unwrap();
        let archive = Archive::open(&path).unwrap();

        let log = Logger::new(0, true);
        let outcome = validate(&[archive], 0, &log);
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.repair_map.summary.total_files, 1);
    }

    #[test]
    fn mojibake_name_produces_a_repair_map_entry() {
        let original = "유저인터페이스.bmp";
        let cp949_bytes = encoding::encode(original, Encoding::Cp949);
        let mojibake_name: String = cp949_bytes.iter().map(|&b| b as char).collect();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.grf");
        std::fs::write(&path, build_grf(&[(mojibake_name.as_str(), b"hi")])).unwrap();
        let archive = Archive::open(&path).unwrap();

        let log = Logger::new(0, true);
        let outcome = validate(&[archive], 0, &log);
        assert!(outcome.repair_map.paths.contains_key(&mojibake_name));
        assert_eq!(outcome.repair_map.paths.get(&mojibake_name), Some(&original.to_string()));
    }

    #[test]
    fn failed_to_load_count_forces_exit_code_two() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.grf");
        std::fs::write(&path, build_grf(&[("clean.txt", b"hi")])).unwrap();
        let archive = Archive::open(&path).unwrap();

        let log = Logger::new(0, true);
        let outcome = validate(&[archive], 1, &log);
        assert_eq!(outcome.exit_code, 2);
    }
}
