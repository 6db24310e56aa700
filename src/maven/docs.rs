//! Javadoc and sources JARs.
//!
//! Javadoc generation is delegated to the JDK's `javadoc` tool; both JARs are
//! then packed directly from the generated tree and the Java source tree.

use crate::maven::archive::{ArchiveKind, pack_tree_async};
use crate::maven::builder::tool_detection::JAVADOC;
use crate::maven::error::{ErrorExt, Result};
use crate::maven::utils::process::run_tool;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Java package documented by javadoc.
pub const DOCUMENTED_PACKAGE: &str = "org.duckdb";

/// Top-level source directory packed into the sources JAR.
pub const SOURCE_ROOT_PACKAGE: &str = "org";

/// `src/main/java` under the driver checkout.
pub fn java_source_dir(jdbc_root: &Path) -> PathBuf {
    jdbc_root.join("src").join("main").join("java")
}

/// Packs `<jdbc_root>/src/main/java/org` into `dest`.
pub async fn build_sources_jar(jdbc_root: &Path, dest: &Path) -> Result<()> {
    let files = pack_tree_async(
        java_source_dir(jdbc_root),
        Some(PathBuf::from(SOURCE_ROOT_PACKAGE)),
        dest.to_path_buf(),
        ArchiveKind::Jar,
    )
    .await?;
    log::info!("✓ Sources JAR with {} files: {}", files, dest.display());
    Ok(())
}

/// Runs javadoc over the driver sources into a scratch directory and packs the result into `dest`.
pub async fn build_javadoc_jar(jdbc_root: &Path, dest: &Path) -> Result<()> {
    let scratch = tempfile::tempdir().fs_context("creating javadoc directory", std::env::temp_dir())?;
    let source_path = java_source_dir(jdbc_root);

    run_tool(
        JAVADOC,
        [
            OsStr::new("-Xdoclint:-reference"),
            OsStr::new("-d"),
            scratch.path().as_os_str(),
            OsStr::new("-sourcepath"),
            source_path.as_os_str(),
            OsStr::new(DOCUMENTED_PACKAGE),
        ],
        None,
    )
    .await?;

    let files = pack_tree_async(
        scratch.path().to_path_buf(),
        None,
        dest.to_path_buf(),
        ArchiveKind::Jar,
    )
    .await?;
    log::info!("✓ Javadoc JAR with {} files: {}", files, dest.display());
    Ok(())
}
