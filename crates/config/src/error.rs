//! Error types for settings loading and resolution.
//!
//! Responsibilities:
//! - Define error variants for all source loading and resolver failures.
//! - Convert lower-level serialization errors raised while extracting typed settings.
//!
//! Does NOT handle:
//! - Missing config files (silently ignored by the loaders, never an error).
//! - Placeholder non-convergence (logged, never an error).
//!
//! Invariants:
//! - All error variants include context for debugging (paths, formats, keys).
//! - Parse errors NEVER include raw source line contents to prevent secret leakage.

use std::path::PathBuf;
use thiserror::Error;

use crate::source::SourceFormat;

/// Errors that can occur while loading sources or resolving settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An environment selector ran before any config source was configured.
    #[error("No config source loaded. Load a config source before selecting environments.")]
    ConfigMissing,

    /// The process-wide resolver was requested before one was installed.
    #[error("Settings resolver not initialized. Construct a resolver before using the global accessor.")]
    EnvironmentNotInitialized,

    #[error("Setting '{0}' not found")]
    NotFound(String),

    #[error("Failed to read config source at {path}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config source at {path}: {message}")]
    SourceParse {
        path: PathBuf,
        format: SourceFormat,
        message: String,
    },

    #[error("Unsupported config source format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Invalid env-file syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error("Failed to parse env file at {path} (position {error_index})")]
    DotenvParse { path: PathBuf, error_index: usize },

    #[error("Failed to extract typed settings: {0}")]
    Extract(#[from] serde_json::Error),
}
