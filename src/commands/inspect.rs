//! `inspect` command implementation.

use crate::boot::{BootContainer, GrfService};
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::Result;
use crate::logging::Logger;
use crate::resolver::FetchResult;

/// Boots the archive engine and resolves a single path through the
/// resolver, printing the result or a not-found diagnostic. A manual
/// smoke-test entry point for the resolver.
pub fn inspect(path: &str, global_opts: &GlobalOpts, config: &Config) -> Result<i32> {
    let log = Logger::new(global_opts.verbose(), global_opts.quiet());
    let container = BootContainer::boot(config, &log)?;

    match container.fetch(path) {
        FetchResult::Found(bytes) => {
            log.info(format!("'{path}' resolved: {} bytes", bytes.len()));
            Ok(0)
        }
        FetchResult::NotFound => {
            log.info(format!("'{path}' not found"));
            Ok(1)
        }
    }
}
