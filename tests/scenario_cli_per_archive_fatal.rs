//! S7: a manifest naming one good archive and one missing archive does
//! not fail the whole CLI invocation; only the missing archive is
//! counted as a load failure.

mod common;

use clap::Parser;
use grf_archive::cli::Cli;
use grf_archive::commands;

#[test]
fn stats_succeeds_and_reports_one_failed_archive() {
    let dir = tempfile::TempDir::new().unwrap();
    common::write_manifest(
        dir.path(),
        &[("data.grf", common::build_grf_v200(&[("a.txt", b"hi")]))],
    );
    let manifest_path = dir.path().join("DATA.INI");
    std::fs::write(&manifest_path, "[data]\n0=data.grf\n1=missing.grf\n").unwrap();

    let cli = Cli::parse_from([
        "grf-validate",
        "--manifest-path",
        manifest_path.to_str().unwrap(),
        "--quiet",
        "stats",
    ]);

    let exit_code = commands::execute(&cli).unwrap();
    assert_eq!(exit_code, 0);
}

#[test]
fn validate_succeeds_and_still_exits_nonzero_when_an_archive_fails_to_load() {
    let dir = tempfile::TempDir::new().unwrap();
    common::write_manifest(
        dir.path(),
        &[("data.grf", common::build_grf_v200(&[("a.txt", b"hi")]))],
    );
    let manifest_path = dir.path().join("DATA.INI");
    std::fs::write(&manifest_path, "[data]\n0=data.grf\n1=missing.grf\n").unwrap();

    let cli = Cli::parse_from([
        "grf-validate",
        "--manifest-path",
        manifest_path.to_str().unwrap(),
        "--quiet",
        "validate",
    ]);

    let exit_code = commands::execute(&cli).unwrap();
    assert_eq!(exit_code, 2);
}
