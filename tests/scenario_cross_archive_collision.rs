//! S6: when two archives in the manifest both contain the same
//! normalized path, the first archive in priority order wins.

mod common;

use grf_archive::boot::{BootContainer, GrfService};
use grf_archive::config::Config;
use grf_archive::logging::Logger;
use grf_archive::resolver::FetchResult;
use tempfile::TempDir;

#[test]
fn first_archive_in_manifest_order_wins_a_path_collision() {
    let dir = TempDir::new().unwrap();
    common::write_manifest(
        dir.path(),
        &[
            (
                "patch.grf",
                common::build_grf_v200(&[("data\\icon.bmp", b"patched-version")]),
            ),
            (
                "base.grf",
                common::build_grf_v200(&[("data\\icon.bmp", b"base-version")]),
            ),
        ],
    );

    let config = Config::builder().manifest_path(dir.path().join("DATA.INI")).build();
    let log = Logger::new(0, true);
    let container = BootContainer::boot(&config, &log).unwrap();

    match container.fetch("data/icon.bmp") {
        FetchResult::Found(bytes) => assert_eq!(&*bytes, b"patched-version"),
        FetchResult::NotFound => panic!("expected a hit"),
    }
}

#[test]
fn colliding_path_is_counted_once_in_the_canonical_listing() {
    let dir = TempDir::new().unwrap();
    common::write_manifest(
        dir.path(),
        &[
            (
                "patch.grf",
                common::build_grf_v200(&[("data\\icon.bmp", b"patched-version")]),
            ),
            (
                "base.grf",
                common::build_grf_v200(&[
                    ("data\\icon.bmp", b"base-version"),
                    ("data\\other.bmp", b"only-in-base"),
                ]),
            ),
        ],
    );

    let config = Config::builder().manifest_path(dir.path().join("DATA.INI")).build();
    let log = Logger::new(0, true);
    let container = BootContainer::boot(&config, &log).unwrap();

    let listing = container.list();
    assert_eq!(listing.iter().filter(|p| p.as_str() == "data\\icon.bmp").count(), 1);
    assert!(listing.iter().any(|p| p.as_str() == "data\\other.bmp"));
}
