//! Error types for the Maven release pipeline.
//!
//! Every variant is fatal to the run: nothing in the pipeline retries or
//! recovers, the error is propagated to the CLI which prints it and exits.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving versions, assembling, signing or publishing artifacts.
#[derive(Error, Debug)]
pub enum Error {
    /// Free-form failure, usually produced by [`bail!`](crate::bail)
    #[error("{0}")]
    GenericError(String),

    /// Raw IO error without path context
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// IO error annotated with the operation and the path involved
    #[error("{context} `{}`: {error}", .path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path the operation touched
        path: PathBuf,
        /// Underlying error
        #[source]
        error: std::io::Error,
    },

    /// External tool could not be spawned at all
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command line as logged
        command: String,
        /// Spawn error
        error: std::io::Error,
    },

    /// External tool ran and exited unsuccessfully
    #[error("`{command}` failed ({status})\nstdout:\n{stdout}\nstderr:\n{stderr}")]
    ToolFailed {
        /// Command line as logged
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// Required external tool is not on PATH
    #[error("required tool `{tool}` not found in PATH: {reason}")]
    ToolNotFound {
        /// Tool name
        tool: String,
        /// Lookup failure
        reason: String,
    },

    /// Version tag does not have the `v1.2.3.4` shape
    #[error("could not parse version tag `{tag}` (expected format v1.2.3.4)")]
    InvalidTag {
        /// Offending tag text
        tag: String,
    },

    /// Required environment variable is unset or empty
    #[error("environment variable {variable} is required but not set")]
    MissingEnvironment {
        /// Variable name
        variable: &'static str,
    },

    /// A platform archive contributed no native library entries
    #[error("no `{prefix}*` entries found in {}", .archive.display())]
    MissingNativeLibrary {
        /// Archive that was scanned
        archive: PathBuf,
        /// Entry name prefix that was expected
        prefix: &'static str,
    },

    /// The same entry name was contributed twice to one archive
    #[error("duplicate entry `{name}` from {}", .archive.display())]
    DuplicateEntry {
        /// Entry name
        name: String,
        /// Archive the second copy came from
        archive: PathBuf,
    },

    /// An artifact that must exist before publishing is missing
    #[error("required artifact is missing: {}", .0.display())]
    MissingArtifact(PathBuf),

    /// The publishing endpoint rejected the upload
    #[error("upload rejected with HTTP {status}: {body}")]
    Upload {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// ZIP read/write errors
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Template rendering errors
    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Directory traversal errors
    #[error("directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix stripping errors
    #[error("path error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),
}

/// Attach path context to IO results.
pub trait ErrorExt<T> {
    /// Wrap an IO error with the operation being performed and the path involved.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Convert options and results into pipeline errors with a message.
pub trait Context<T> {
    /// Attach a message; for results the original error is appended.
    fn context<C: std::fmt::Display>(self, message: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: std::fmt::Display>(self, message: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(message.to_string()))
    }
}

impl<T> Context<T> for Result<T> {
    fn context<C: std::fmt::Display>(self, message: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{message}: {e}")))
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::maven::Error::GenericError(format!($($arg)*)))
    };
}
