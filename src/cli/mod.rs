//! Command line interface for the release tool.
//!
//! Parses arguments, builds the [`RuntimeConfig`] and dispatches to the
//! subcommand in [`commands`].

mod args;
pub mod commands;
mod output;

pub use args::{
    Args, CmakeArgs, Command, DeployArgs, RuntimeConfig, SnapshotArgs, SourceIdArgs,
};
pub use output::OutputManager;

use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let config = RuntimeConfig::from(&args);
    commands::execute(&args.command, &config).await
}
