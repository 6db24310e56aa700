//! `cmake`: vendor the engine sources and regenerate `CMakeLists.txt`.

use super::require_directory;
use crate::cli::{CmakeArgs, RuntimeConfig};
use crate::error::Result;
use crate::maven::builder::tool_detection::{PYTHON, require_tool};
use crate::maven::error::ErrorExt;
use crate::vendor::cmake::{CmakeLists, write_cmake_lists};
use crate::vendor::package_build::run_package_build;
use crate::vendor::{EXTENSIONS, VENDOR_DIR};

pub async fn execute(args: &CmakeArgs, config: &RuntimeConfig) -> Result<i32> {
    require_directory(&args.duckdb, "duckdb")?;
    require_directory(&args.root, "root")?;
    require_tool(PYTHON)?;

    let root = tokio::fs::canonicalize(&args.root)
        .await
        .fs_context("resolving driver root", &args.root)?;
    let target = root.join(VENDOR_DIR);

    config.progress(&format!(
        "Vendoring {} into {}",
        args.duckdb.display(),
        target.display()
    ))?;
    let files = run_package_build(&args.duckdb, &target, &EXTENSIONS).await?;
    let lists = CmakeLists::from_package_files(&files, &root, &EXTENSIONS);
    for define in &lists.defines {
        config.verbose_println(&format!("-D{define}"))?;
    }

    let output = write_cmake_lists(&root, &lists).await?;
    config.success(&format!(
        "Wrote {} ({} sources)",
        output.display(),
        lists.sources.len()
    ))?;
    Ok(0)
}
