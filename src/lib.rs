//! # grf-archive
//!
//! A reader, cross-archive index and encoding validator for legacy GRF
//! game archives.
//!
//! ## Overview
//!
//! GRF archives bundle thousands of game assets behind a zlib-compressed
//! file table, and their filenames were written under a handful of
//! incompatible byte encodings depending on the authoring tool and
//! locale. This crate opens archives, decodes filenames under an
//! auto-detected encoding, merges several archives into one priority-
//! ordered lookup index, and repairs or at least classifies filenames
//! that were corrupted in transit (mojibake, C1-control prefixes,
//! replacement characters).
//!
//! ## Key Features
//!
//! - **Dual offset-width table parsing**: version 0x300 archives are
//!   parsed under both 4- and 8-byte offset layouts; the better-fitting
//!   layout is selected automatically.
//! - **Encoding auto-detection and repair**: per-archive UTF-8/CP949
//!   detection, with mojibake and C1-prefix repair heuristics.
//! - **Cross-archive indexing**: first-insert-wins collision semantics
//!   across archives, keyed by a normalized (slash/case/NFC-folded) path.
//! - **Bounded in-memory cache**: a double-bounded (count and byte
//!   budget) LRU in front of repeated fetches.
//! - **Parallel archive opens**: leverages rayon to open multiple
//!   archives concurrently at boot.
//!
//! ## Architecture
//!
//! - [`cli`]: command-line interface definitions using clap
//! - [`commands`]: implementation of the `grf-validate` subcommands
//! - [`error`]: error types and handling with thiserror + miette
//! - [`boot`]: wires the manifest, archives, index and resolver together
//! - [`resolver`]: the `fetch(path) -> bytes` entry point
//! - [`validator`]: the deep filename-encoding validator
//!
//! Internal modules (not part of the public API):
//! - `br`: positioned byte reads over a memory-mapped archive file
//! - `inflate`: zlib decompression with a size guardrail
//! - `encoding`: byte-string decoding, mojibake and C1 repair
//! - `archive`: header/table parse and on-demand entry extraction
//! - `index`: the unified cross-archive lookup index
//! - `cache`: the double-bounded LRU
//! - `repair_map`: the persisted encoding-repair side table
//! - `manifest`: the `DATA.INI`-style archive manifest parser
//! - `config`: the runtime configuration envelope
//! - `logging`: a hand-rolled verbosity-gated console logger
//!
//! ## Library Usage
//!
//! ```no_run
//! use grf_archive::boot::{BootContainer, GrfService};
//! use grf_archive::config::Config;
//! use grf_archive::logging::Logger;
//!
//! let config = Config::builder().manifest_path("DATA.INI").build();
//! let log = Logger::new(0, false);
//! let container = BootContainer::boot(&config, &log)?;
//! let _ = container.fetch("data/some_asset.bmp");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! The crate uses a combination of:
//! - `thiserror` for strongly-typed errors
//! - `miette` for rich diagnostic output in the CLI
//!
//! All public functions return `Result` types with descriptive error
//! variants.

pub mod archive;
pub mod boot;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod encoding;
pub mod error;
pub mod index;
pub mod manifest;
pub mod repair_map;
pub mod resolver;
pub mod validator;

mod br;
mod inflate;
pub mod logging;
