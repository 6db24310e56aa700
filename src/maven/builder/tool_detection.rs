//! External tool availability checking.
//!
//! Tools are looked up before the pipeline writes anything so a missing
//! `gpg` or `mvn` fails the run up front instead of after the artifacts are
//! half staged.

use crate::maven::error::{Error, Result};
use std::path::PathBuf;

/// Signs artifacts with detached signatures.
pub const GPG: &str = "gpg";
/// Generates API documentation.
pub const JAVADOC: &str = "javadoc";
/// Deploys snapshot artifacts.
pub const MAVEN: &str = "mvn";
/// Reads tag history.
pub const GIT: &str = "git";
/// Runs the upstream source-vendoring helper.
pub const PYTHON: &str = "python3";

/// Resolves `tool` on PATH.
pub fn require_tool(tool: &str) -> Result<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            Ok(path)
        }
        Err(e) => Err(Error::ToolNotFound {
            tool: tool.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Resolves every tool in `tools`, failing on the first one missing.
pub fn require_tools(tools: &[&str]) -> Result<()> {
    for tool in tools {
        require_tool(tool)?;
    }
    Ok(())
}
