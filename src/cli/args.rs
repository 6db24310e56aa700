//! Command line argument parsing and validation.

use crate::maven::upload::{PORTAL_UPLOAD_URL, PublishingType};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Release automation for the DuckDB JDBC driver
#[derive(Parser, Debug)]
#[command(
    name = "jdbc_release",
    version,
    about = "Release automation for the DuckDB JDBC driver",
    long_about = "Assembles, signs and publishes the DuckDB JDBC driver to Maven Central.

Usage:
  jdbc_release deploy v1.4.4.0 ./artifacts .
  jdbc_release deploy main ./artifacts .
  jdbc_release snapshot ./artifacts
  jdbc_release cmake --duckdb ../duckdb
  jdbc_release source-id

Publishing needs MAVEN_USERNAME and MAVEN_PASSWORD (Central Portal user token)."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file overriding the built-in project metadata
    #[arg(long, global = true, value_name = "FILE")]
    pub project: Option<PathBuf>,

    /// Keep the staging directory after the run
    #[arg(long, global = true)]
    pub keep_staging: bool,

    /// Show detailed progress
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors and command results
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Publish a tagged release to Maven Central (`main` publishes a snapshot)
    Deploy(DeployArgs),

    /// Publish a snapshot of the latest build to the Central snapshot repository
    Snapshot(SnapshotArgs),

    /// Vendor the DuckDB sources and generate CMakeLists.txt
    Cmake(CmakeArgs),

    /// Print the source id of the vendored DuckDB engine
    SourceId(SourceIdArgs),
}

#[derive(clap::Args, Debug)]
pub struct DeployArgs {
    /// Release tag (v1.2.3.4) or `main`
    pub release_tag: String,

    /// Directory holding the java-<platform>/duckdb_jdbc.jar builds
    pub artifact_dir: PathBuf,

    /// Root of the driver checkout
    pub jdbc_root: PathBuf,

    /// Build the bundle without gpg signatures
    #[arg(long)]
    pub skip_signing: bool,

    /// Stop after building the bundle (for `main`, after staging the snapshot)
    #[arg(long)]
    pub dry_run: bool,

    /// How the portal publishes a validated bundle
    #[arg(long, value_enum, default_value_t = PublishingType::Automatic)]
    pub publishing_type: PublishingType,

    /// Portal upload endpoint
    #[arg(long, default_value = PORTAL_UPLOAD_URL, value_name = "URL")]
    pub endpoint: String,
}

#[derive(clap::Args, Debug)]
pub struct SnapshotArgs {
    /// Directory holding the java-<platform>/duckdb_jdbc.jar builds
    pub artifact_dir: PathBuf,

    /// Root of the driver checkout
    #[arg(default_value = ".")]
    pub jdbc_root: PathBuf,

    /// Stop after building the artifacts
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args, Debug)]
pub struct CmakeArgs {
    /// DuckDB checkout to vendor from
    #[arg(long, value_name = "PATH")]
    pub duckdb: PathBuf,

    /// Root of the driver checkout
    #[arg(long, default_value = ".", value_name = "PATH")]
    pub root: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct SourceIdArgs {
    /// Root of the driver checkout
    #[arg(long, default_value = ".", value_name = "PATH")]
    pub root: PathBuf,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency without touching the filesystem.
    pub fn validate(&self) -> Result<(), String> {
        if let Command::Deploy(deploy) = &self.command
            && deploy.endpoint.trim().is_empty()
        {
            return Err("endpoint cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Fails unless `path` is an existing directory.
pub fn require_dir(path: &Path, role: &str) -> Result<(), String> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(format!("{role} '{}' is not a directory", path.display()))
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
    project: Option<PathBuf>,
    keep_staging: bool,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
            project: args.project.clone(),
            keep_staging: args.keep_staging,
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Project metadata override, if any
    pub fn project(&self) -> Option<&Path> {
        self.project.as_deref()
    }

    pub fn keep_staging(&self) -> bool {
        self.keep_staging
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
