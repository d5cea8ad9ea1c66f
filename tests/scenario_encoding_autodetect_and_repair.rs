//! S2: an archive whose filenames are mostly non-UTF-8 is auto-detected
//! as CP949; the validator repairs a mojibake'd copy of the same name
//! and the resolver can then serve the broken form via the repair map.

mod common;

use grf_archive::archive::Archive;
use grf_archive::encoding::{self, Encoding};
use grf_archive::logging::Logger;
use grf_archive::validator;
use tempfile::TempDir;

#[test]
fn archive_with_cp949_names_is_detected_and_decoded() {
    let korean_name = "유저인터페이스.bmp";
    let cp949_bytes = encoding::encode(korean_name, Encoding::Cp949);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.grf");
    std::fs::write(
        &path,
        common::build_grf_raw_v200(&[(cp949_bytes.as_slice(), b"ui-data")]),
    )
    .unwrap();

    let archive = Archive::open(&path).unwrap();
    assert_eq!(archive.encoding(), Encoding::Cp949);

    let entry = archive.iter_entries().next().unwrap();
    assert_eq!(entry.decoded_name, korean_name);
}

#[test]
fn mojibake_name_is_classified_and_mapped_by_the_validator() {
    let korean_name = "아이템정보.txt";
    let cp949_bytes = encoding::encode(korean_name, Encoding::Cp949);
    let mojibake_name: String = cp949_bytes.iter().map(|&b| b as char).collect();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.grf");
    std::fs::write(&path, common::build_grf_v200(&[(mojibake_name.as_str(), b"item-data")])).unwrap();

    let archive = Archive::open(&path).unwrap();
    let log = Logger::new(0, true);
    let outcome = validator::validate(&[archive], 0, &log);

    assert_eq!(outcome.repair_map.paths.get(&mojibake_name), Some(&korean_name.to_string()));
    assert!(outcome.repair_map.summary.mojibake_fixed >= 1);
}
