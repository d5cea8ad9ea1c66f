//! # grf-validate CLI
//!
//! The command-line interface for the GRF archive engine: opens every
//! archive named by a manifest, builds the cross-archive index, and
//! validates filename encodings.
//!
//! ## Commands
//!
//! - **validate**: classifies every decoded filename, writes the
//!   repair-map JSON, prints a health summary
//! - **inspect**: resolves a single path and reports the hit
//! - **stats**: prints aggregate archive/index/cache stats
//!
//! ## Environment Variables
//!
//! - `GRF_MANIFEST_PATH`: override the manifest path (default: ./DATA.INI)
//! - `GRF_REPAIR_MAP_PATH`: repair-map JSON location
//! - `GRF_VERBOSE`: enable verbose output
//! - `GRF_QUIET`: silence all output except errors
//!
//! See [`grf_archive::cli`] for the full set of recognized flags and
//! environment variables.

use std::io::IsTerminal;
use std::process::ExitCode;

use grf_archive::cli::Cli;

fn main() -> miette::Result<ExitCode> {
    miette::set_panic_hook();

    if std::io::stderr().is_terminal() {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::unicode_nocolor())
                    .with_context_lines(3),
            )
        }))?;
    } else {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::none())
                    .with_context_lines(0),
            )
        }))?;
    }

    let cli = Cli::parse_args();
    let exit_code = grf_archive::commands::execute(&cli)?;
    Ok(ExitCode::from(exit_code as u8))
}
