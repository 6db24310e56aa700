//! Version-control queries used for snapshot versioning.
//!
//! All queries take the repository path explicitly and run `git -C <repo>`,
//! so the process working directory is never consulted or changed.

use crate::maven::builder::tool_detection::GIT;
use crate::maven::error::{Context, Result};
use crate::maven::utils::process::run_tool;
use crate::maven::version::{ReleaseVersion, TagVersion};
use std::ffi::OsStr;
use std::path::Path;

/// Most recent tag by committer date.
pub async fn latest_tag(repo: &Path) -> Result<String> {
    let output = run_tool(
        GIT,
        [
            OsStr::new("-C"),
            repo.as_os_str(),
            OsStr::new("tag"),
            OsStr::new("--sort=-committerdate"),
        ],
        None,
    )
    .await?;

    first_line(&output).context(format!("no tags found in {}", repo.display()))
}

/// Abbreviated id of the checked-out commit.
pub async fn short_commit(repo: &Path) -> Result<String> {
    let output = run_tool(
        GIT,
        [
            OsStr::new("-C"),
            repo.as_os_str(),
            OsStr::new("rev-parse"),
            OsStr::new("--short"),
            OsStr::new("HEAD"),
        ],
        None,
    )
    .await?;

    first_line(&output).context(format!("could not read HEAD in {}", repo.display()))
}

/// Snapshot version derived from the latest tag and the current commit.
pub async fn resolve_snapshot_version(repo: &Path) -> Result<ReleaseVersion> {
    let tag = latest_tag(repo).await?;
    log::debug!("latest tag in {}: {}", repo.display(), tag);
    let parsed = TagVersion::parse(&tag)?;
    let commit = short_commit(repo).await?;
    parsed.next_snapshot(Some(&commit))
}

fn first_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(String::from)
}
