//! Error types for the GRF archive engine.
//!
//! All fallible operations in this crate return [`Result`], whose error
//! variant is [`GrfError`]. Errors are defined with `thiserror` and carry
//! `miette::Diagnostic` metadata so the validator CLI can render them as
//! rich, actionable reports.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error types that can occur while opening, indexing or resolving GRF
/// archives.
#[derive(Error, Debug, Diagnostic)]
pub enum GrfError {
    /// The archive manifest file does not exist at the configured path.
    ///
    /// Raised by `manifest::parse` when the `DATA.INI` file cannot be
    /// opened. Boot cannot proceed without a manifest.
    #[error("manifest not found at '{0}'")]
    #[diagnostic(
        code(grf::manifest::missing),
        help("Point --manifest-path (or GRF_MANIFEST_PATH) at a DATA.INI file.")
    )]
    ManifestMissing(PathBuf),

    /// The manifest parsed but named zero archives.
    ///
    /// Raised when the `[data]` section of the manifest contains no
    /// `n=filename.grf` entries.
    #[error("manifest at '{0}' names no archives")]
    #[diagnostic(
        code(grf::manifest::empty),
        help("Add at least one 'n=filename.grf' entry under [data].")
    )]
    ManifestEmpty(PathBuf),

    /// An archive named by the manifest does not exist on disk.
    ///
    /// Per-archive fatal: boot continues with the remaining archives as
    /// long as at least one loads.
    #[error("archive '{0}' not found")]
    #[diagnostic(code(grf::archive::not_found))]
    ArchiveNotFound(PathBuf),

    /// The 46-byte archive header failed validation.
    ///
    /// Raised when the signature is not `"Master of Magic"`, or when the
    /// encryption-key field is nonzero (indicating the unsupported legacy
    /// DES scheme).
    #[error("'{path}' has an invalid or encrypted header: {reason}")]
    #[diagnostic(
        code(grf::archive::bad_header),
        help("Only unencrypted GRF archives with the standard signature are supported.")
    )]
    BadHeader {
        /// The archive that failed header validation.
        path: PathBuf,
        /// Why the header was rejected.
        reason: String,
    },

    /// The archive declares a version other than 0x200 or 0x300.
    #[error("'{path}' has unsupported version 0x{version:x}")]
    #[diagnostic(
        code(grf::archive::unsupported_version),
        help("Only GRF versions 0x200 and 0x300 are supported.")
    )]
    UnsupportedVersion {
        /// The archive with the unsupported version.
        path: PathBuf,
        /// The version field read from the header.
        version: u32,
    },

    /// An entry is marked with an encryption flag this crate does not
    /// implement.
    #[error("'{path}' entry '{entry}' uses an unsupported encryption scheme")]
    #[diagnostic(code(grf::archive::unsupported_encryption))]
    UnsupportedEncryption {
        /// The archive containing the entry.
        path: PathBuf,
        /// The raw entry name.
        entry: String,
    },

    /// The central file table failed to inflate.
    ///
    /// The archive is rejected; IDX ingestion skips it entirely.
    #[error("'{path}' file table failed to inflate: {reason}")]
    #[diagnostic(
        code(grf::archive::table_inflate_error),
        help("The archive may be truncated or corrupted.")
    )]
    TableInflateError {
        /// The archive whose table failed to inflate.
        path: PathBuf,
        /// The underlying inflate failure.
        reason: String,
    },

    /// The central file table inflated but failed to parse under either
    /// offset-width layout.
    #[error("'{path}' file table could not be parsed: {reason}")]
    #[diagnostic(code(grf::archive::table_parse_error))]
    TableParseError {
        /// The archive whose table failed to parse.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A single entry's compressed body failed to inflate.
    ///
    /// Surfaced to the resolver as `NotFound`, with this error logged at
    /// verbosity >= 1.
    #[error("entry '{entry}' in '{path}' failed to inflate: {reason}")]
    #[diagnostic(code(grf::entry::inflate_error))]
    InflateError {
        /// The archive containing the entry.
        path: PathBuf,
        /// The raw entry name.
        entry: String,
        /// The underlying inflate failure.
        reason: String,
    },

    /// A short read was returned by the byte source instead of the
    /// requested length.
    #[error("truncated read in '{path}' at offset {offset}: wanted {wanted} bytes, got {got}")]
    #[diagnostic(code(grf::br::truncated))]
    Truncated {
        /// The file being read.
        path: PathBuf,
        /// The byte offset the read started at.
        offset: u64,
        /// The number of bytes requested.
        wanted: u64,
        /// The number of bytes actually available.
        got: u64,
    },

    /// An archive's boot-time load exceeded the 10 second safety timeout.
    #[error("loading '{0}' exceeded the archive load timeout")]
    #[diagnostic(
        code(grf::archive::load_timeout),
        help("The underlying storage may be slow or unavailable; this archive was skipped.")
    )]
    ArchiveLoadTimeout(PathBuf),

    /// A requested entry does not exist in its archive.
    #[error("entry '{0}' not found in archive")]
    #[diagnostic(code(grf::entry::missing))]
    MissingEntry(String),

    /// The repair-map JSON file failed to parse.
    ///
    /// Boot proceeds with an empty `RepairMap` and a warning; this is not
    /// fatal.
    #[error("repair map at '{path}' could not be read: {reason}")]
    #[diagnostic(
        code(grf::repair_map::deserialization_error),
        help("The file will be treated as absent and regenerated by the validator.")
    )]
    DeserializationError {
        /// The repair-map file that failed to parse.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// File system I/O error while reading or writing a path managed by
    /// this crate.
    #[error("I/O error accessing '{path}'")]
    #[diagnostic(code(grf::io_error))]
    IoError {
        /// The path that caused the I/O error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration value failed validation (e.g. an unparsable size
    /// string or an out-of-range threshold).
    #[error("invalid configuration: {0}")]
    #[diagnostic(
        code(grf::config::error),
        help("Check the value passed via CLI flag, environment variable or config key.")
    )]
    ConfigError(String),
}

/// Type alias for `Result`s produced by this crate.
pub type Result<T> = std::result::Result<T, GrfError>;
