//! External tool invocation.
//!
//! Every tool the pipeline delegates to (git, gpg, javadoc, mvn, python3)
//! runs through [`run_tool`], which blocks the pipeline until the child exits
//! and turns a non-zero exit status into [`Error::ToolFailed`] with the
//! captured output attached.

use crate::maven::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::Path;
use tokio::process::Command;

/// Runs `program` with `args`, optionally inside `cwd`, and returns its stdout.
///
/// The command line is logged before execution. Callers must not pass secrets
/// as arguments.
pub async fn run_tool<P, I, S>(program: P, args: I, cwd: Option<&Path>) -> Result<String>
where
    P: AsRef<OsStr>,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<OsString> = args
        .into_iter()
        .map(|a| a.as_ref().to_os_string())
        .collect();
    let program = program.as_ref();
    let command_line = describe(program, &args);
    log::info!("+ {}", command_line);

    let mut command = Command::new(program);
    command.args(&args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command.output().await.map_err(|error| Error::CommandFailed {
        command: command_line.clone(),
        error,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        return Err(Error::ToolFailed {
            command: command_line,
            status: output.status.to_string(),
            stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    log::debug!(
        "{} produced {} bytes of output",
        program.to_string_lossy(),
        stdout.len()
    );
    Ok(stdout)
}

fn describe(program: &OsStr, args: &[OsString]) -> String {
    let mut line = program.to_string_lossy().into_owned();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}
