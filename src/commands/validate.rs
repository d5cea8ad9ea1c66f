//! `validate` command implementation.

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::Result;
use crate::logging::Logger;
use crate::validator;

/// Opens every archive named by the manifest, runs the deep validator,
/// writes the repair-map JSON and prints a console summary.
///
/// Returns the process exit code (0 clean, 1 warnings-only, 2 load
/// failures or unrepairable names present).
pub fn validate(global_opts: &GlobalOpts, config: &Config) -> Result<i32> {
    let log = Logger::new(global_opts.verbose(), global_opts.quiet());

    let manifest = crate::manifest::Manifest::parse(config.manifest_path())?;
    let base_dir = config
        .manifest_path()
        .parent()
        .map(std::path::PathBuf::from)
        .unwrap_or_default();
    let paths = manifest.archive_paths(&base_dir);

    let mut archives = Vec::new();
    let mut failed_to_load = 0usize;
    for path in &paths {
        match crate::archive::Archive::open_with_threshold(path, config.auto_detect_threshold()) {
            Ok(archive) => archives.push(archive),
            Err(e) => {
                failed_to_load += 1;
                log.warn(format!("archive '{}' failed to load: {e}", path.display()));
            }
        }
    }

    let outcome = validator::validate(&archives, failed_to_load, &log);

    if let Some(repair_map_path) = config.repair_map_path() {
        outcome.repair_map.save(repair_map_path)?;
        log.info(format!("repair map written to '{}'", repair_map_path.display()));
    }

    let summary = &outcome.repair_map.summary;
    log.info(format!(
        "validated {} archive(s), {} files, {} mapped, {} mojibake fixed, {} c1 fixed",
        archives.len(),
        summary.total_files,
        summary.total_mapped,
        summary.mojibake_fixed,
        summary.c1_fixed,
    ));

    Ok(outcome.exit_code)
}
