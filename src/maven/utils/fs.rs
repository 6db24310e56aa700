//! File system utilities for staging artifacts.

use crate::maven::error::{Error, ErrorExt, Result};
use std::path::Path;
use tokio::fs;

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.is_file() {
        return Err(Error::MissingArtifact(from.to_path_buf()));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Fails with [`Error::MissingArtifact`] for the first path that is not a regular file.
pub fn ensure_files_exist<'a, I>(paths: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Path>,
{
    for path in paths {
        if !path.is_file() {
            return Err(Error::MissingArtifact(path.to_path_buf()));
        }
    }
    Ok(())
}
