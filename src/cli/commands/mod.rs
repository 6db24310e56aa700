//! Subcommand execution.

mod cmake;
mod deploy;
mod snapshot;
mod source_id;

use super::{Command, RuntimeConfig, args::require_dir};
use crate::error::{CliError, Result};
use std::path::Path;

/// Runs `command` and returns the process exit code.
pub async fn execute(command: &Command, config: &RuntimeConfig) -> Result<i32> {
    match command {
        Command::Deploy(args) => deploy::execute(args, config).await,
        Command::Snapshot(args) => snapshot::execute(args, config).await,
        Command::Cmake(args) => cmake::execute(args, config).await,
        Command::SourceId(args) => source_id::execute(args, config).await,
    }
}

fn require_directory(path: &Path, role: &str) -> Result<()> {
    require_dir(path, role).map_err(|reason| CliError::InvalidArguments { reason }.into())
}
