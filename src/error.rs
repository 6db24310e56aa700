//! Crate-level error types.
//!
//! Pipeline failures live in [`crate::maven::Error`]; this module wraps them
//! together with CLI and configuration errors for the binary.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors (vendoring helper output)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors (project metadata)
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Artifact pipeline errors
    #[error(transparent)]
    Maven(#[from] crate::maven::Error),

    /// `DUCKDB_SOURCE_ID` definition not found
    #[error("DuckDB source id not found in {}", .0.display())]
    SourceIdNotFound(PathBuf),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}
