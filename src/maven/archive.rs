//! Packing directory trees into JAR and ZIP files.
//!
//! Used for the sources and javadoc JARs and for the upload bundle. Entry
//! names are relative to the archive base directory, use `/` separators and
//! are written in sorted order so identical trees produce identical listings.

use crate::maven::error::{Error, ErrorExt, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
const MANIFEST: &str = concat!(
    "Manifest-Version: 1.0\r\n",
    "Created-By: jdbc_release ",
    env!("CARGO_PKG_VERSION"),
    "\r\n\r\n"
);

/// Container flavour to produce.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArchiveKind {
    /// Java archive: a manifest is written first
    Jar,
    /// Plain ZIP
    Zip,
}

/// Packs `base/include` (or all of `base` when `include` is `None`) into `dest`.
///
/// Returns the number of file entries written, excluding directories and
/// the manifest.
pub fn pack_tree(base: &Path, include: Option<&Path>, dest: &Path, kind: ArchiveKind) -> Result<usize> {
    let root = match include {
        Some(sub) => base.join(sub),
        None => base.to_path_buf(),
    };
    if !root.is_dir() {
        crate::bail!("cannot archive {}: not a directory", root.display());
    }

    let file = File::create(dest).fs_context("creating archive", dest)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    if kind == ArchiveKind::Jar {
        writer.add_directory("META-INF/", options)?;
        writer.start_file(MANIFEST_PATH, options)?;
        writer.write_all(MANIFEST.as_bytes())?;
    }

    let mut files = 0;
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(base)?;
        if relative.as_os_str().is_empty() {
            continue;
        }
        let name = entry_name(relative);
        if kind == ArchiveKind::Jar && (name == "META-INF" || name == MANIFEST_PATH) {
            continue;
        }

        if entry.file_type().is_dir() {
            writer.add_directory(format!("{name}/"), options)?;
        } else if entry.file_type().is_file() {
            writer.start_file(name, options)?;
            let mut source = File::open(entry.path()).fs_context("reading file", entry.path())?;
            std::io::copy(&mut source, &mut writer).fs_context("archiving file", entry.path())?;
            files += 1;
        } else {
            log::warn!("Skipping non-regular file {}", entry.path().display());
        }
    }

    writer.finish()?;
    Ok(files)
}

/// Runs [`pack_tree`] on the blocking thread pool.
pub async fn pack_tree_async(
    base: PathBuf,
    include: Option<PathBuf>,
    dest: PathBuf,
    kind: ArchiveKind,
) -> Result<usize> {
    tokio::task::spawn_blocking(move || pack_tree(&base, include.as_deref(), &dest, kind))
        .await
        .map_err(|e| Error::GenericError(format!("archive task panicked: {e}")))?
}

fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
