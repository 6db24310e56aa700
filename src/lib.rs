//! Release automation for the DuckDB JDBC driver.
//!
//! This library provides:
//! - Version resolution from release tags and git history
//! - Assembly of the combined, nolib and per-platform JARs
//! - POM, sources and javadoc generation
//! - GPG signing, digests and Maven Central publishing
//! - Vendoring support (`CMakeLists.txt` generation, engine source id)
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod maven;
pub mod metadata;
pub mod vendor;

// Re-export commonly used types
pub use error::{CliError, ReleaseError, Result};
