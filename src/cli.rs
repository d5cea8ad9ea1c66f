//! Command-line interface definitions for `grf-validate`.
//!
//! This module defines the CLI structure using clap: global options
//! shared by every subcommand, plus the `validate`/`inspect`/`stats`
//! subcommands themselves.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

/// Top-level CLI configuration for `grf-validate`.
#[derive(Parser)]
#[command(
    name = "grf-validate",
    bin_name = "grf-validate",
    author,
    version,
    about = "Reader, cross-archive index and encoding validator for legacy GRF game archives",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    global_opts: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every `grf-validate` subcommand.
#[derive(Parser)]
pub struct GlobalOpts {
    /// Path to the archive manifest (DATA.INI)
    #[arg(long, global = true, default_value = "DATA.INI", env = "GRF_MANIFEST_PATH")]
    manifest_path: PathBuf,

    /// Path to the repair-map JSON file (path-mapping.json)
    #[arg(long, global = true, env = "GRF_REPAIR_MAP_PATH")]
    repair_map_path: Option<PathBuf>,

    /// Maximum LRU cache entry count
    #[arg(long, global = true, env = "GRF_CACHE_MAX_ENTRIES")]
    cache_max_entries: Option<u64>,

    /// Maximum LRU cache size in megabytes
    #[arg(long, global = true, env = "GRF_CACHE_MAX_MEMORY_MB")]
    cache_max_memory_mb: Option<u64>,

    /// Fraction of invalid-UTF-8 names above which CP949 is selected
    #[arg(long, global = true, env = "GRF_AUTO_DETECT_THRESHOLD")]
    auto_detect_threshold: Option<f64>,

    /// Mirror resolved bytes to a physical extraction directory
    #[arg(long, global = true, env = "GRF_EXTRACT")]
    extract: bool,

    /// Max entries inspected during encoding auto-detect (0 = full)
    #[arg(long, global = true, env = "GRF_SCAN_LIMIT")]
    scan_limit: Option<usize>,

    /// Enable verbose output (use multiple times for more verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, env = "GRF_VERBOSE")]
    verbose: u8,

    /// Silence all output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose", env = "GRF_QUIET")]
    quiet: bool,
}

impl GlobalOpts {
    pub fn builder() -> GlobalOptsBuilder {
        GlobalOptsBuilder::default()
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn repair_map_path(&self) -> Option<&Path> {
        self.repair_map_path.as_deref()
    }

    pub fn cache_max_entries(&self) -> Option<u64> {
        self.cache_max_entries
    }

    pub fn cache_max_memory_mb(&self) -> Option<u64> {
        self.cache_max_memory_mb
    }

    pub fn auto_detect_threshold(&self) -> Option<f64> {
        self.auto_detect_threshold
    }

    pub fn extract(&self) -> bool {
        self.extract
    }

    pub fn scan_limit(&self) -> Option<usize> {
        self.scan_limit
    }

    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// Builds the resolved [`crate::config::Config`] from these flags,
    /// falling through to documented defaults for anything unset.
    pub fn to_config(&self) -> crate::config::Config {
        let mut builder = crate::config::Config::builder().manifest_path(self.manifest_path.clone());
        if let Some(path) = &self.repair_map_path {
            builder = builder.repair_map_path(path.clone());
        }
        if let Some(n) = self.cache_max_entries {
            builder = builder.cache_max_entries(n);
        }
        if let Some(mb) = self.cache_max_memory_mb {
            builder = builder.cache_max_memory_mb(mb);
        }
        if let Some(threshold) = self.auto_detect_threshold {
            builder = builder.auto_detect_threshold(threshold);
        }
        if let Some(limit) = self.scan_limit {
            builder = builder.scan_limit(limit);
        }
        builder.extract_enabled(self.extract).build()
    }
}

/// Builder for [`GlobalOpts`], used by tests and programmatic callers.
#[derive(Default)]
pub struct GlobalOptsBuilder {
    manifest_path: Option<PathBuf>,
    repair_map_path: Option<PathBuf>,
    cache_max_entries: Option<u64>,
    cache_max_memory_mb: Option<u64>,
    auto_detect_threshold: Option<f64>,
    extract: bool,
    scan_limit: Option<usize>,
    verbose: u8,
    quiet: bool,
}

impl GlobalOptsBuilder {
    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    pub fn repair_map_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.repair_map_path = Some(path.into());
        self
    }

    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn build(self) -> GlobalOpts {
        GlobalOpts {
            manifest_path: self.manifest_path.unwrap_or_else(|| PathBuf::from("DATA.INI")),
            repair_map_path: self.repair_map_path,
            cache_max_entries: self.cache_max_entries,
            cache_max_memory_mb: self.cache_max_memory_mb,
            auto_detect_threshold: self.auto_detect_threshold,
            extract: self.extract,
            scan_limit: self.scan_limit,
            verbose: self.verbose,
            quiet: self.quiet,
        }
    }
}

impl Cli {
    pub fn global_opts(&self) -> &GlobalOpts {
        &self.global_opts
    }

    pub fn command(&self) -> &Commands {
        &self.command
    }

    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Available `grf-validate` subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the deep validator over every archive named by the manifest
    ///
    /// Classifies every decoded filename, computes a health score, writes
    /// the repair-map JSON, and exits 0 (clean), 1 (warnings only) or 2
    /// (load failures or unrepairable names present).
    Validate,

    /// Resolve a single path through the resolver and print the result
    ///
    /// A manual smoke-test entry point: opens every archive, builds the
    /// index, and reports which archive a path resolved to (or that it
    /// wasn't found).
    Inspect {
        /// The path to resolve, as it would be requested by a consumer
        path: String,
    },

    /// Print aggregate stats without writing any file
    ///
    /// Reports archive count, entry count, per-encoding counts and
    /// index collision count.
    Stats,
}
