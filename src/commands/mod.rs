//! Implementation of `grf-validate` subcommands.

use crate::cli::{Cli, Commands};
use crate::error::Result;

pub mod inspect;
pub mod stats;
pub mod validate;

use inspect::inspect;
use stats::stats;
use validate::validate;

/// Execute a command based on the parsed CLI arguments. Returns the
/// process exit code.
pub fn execute(cli: &Cli) -> Result<i32> {
    let global_opts = cli.global_opts();
    let config = global_opts.to_config();

    match cli.command() {
        Commands::Validate => validate(global_opts, &config),
        Commands::Inspect { path } => inspect(path, global_opts, &config),
        Commands::Stats => stats(global_opts, &config),
    }
}
