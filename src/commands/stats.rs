//! `stats` command implementation.

use crate::boot::{BootContainer, GrfService};
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::Result;
use crate::logging::Logger;

/// Boots the archive engine and prints aggregate stats without writing
/// any file: archive count, entry count, index collision count.
pub fn stats(global_opts: &GlobalOpts, config: &Config) -> Result<i32> {
    let log = Logger::new(global_opts.verbose(), global_opts.quiet());
    let container = BootContainer::boot(config, &log)?;
    let stats = container.stats();

    log.info(format!("archives loaded:    {}", stats.archives_loaded));
    log.info(format!("archives failed:    {}", stats.archives_failed));
    log.info(format!("index entries:      {}", stats.index_entries));
    log.info(format!("index collisions:   {}", stats.index_collisions));
    log.info(format!("cache hits/misses:  {}/{}", stats.cache.hits, stats.cache.misses));
    log.info(format!("missing recorded:   {}", stats.missing));

    Ok(0)
}
