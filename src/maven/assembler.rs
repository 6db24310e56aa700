//! Combined and nolib JAR assembly.
//!
//! Platform JARs share their Java classes and differ only in the native
//! library they carry. The combined JAR takes the classes from the base build
//! and the native libraries from every combined build; the nolib JAR is the
//! base build with its native library removed.
//!
//! Entries are copied raw: compressed bytes, CRCs and timestamps are carried
//! over unchanged.

use crate::maven::error::{Error, ErrorExt, Result};
use crate::maven::platform::{NATIVE_LIBRARY_PREFIX, is_native_entry};
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use zip::{ZipArchive, ZipWriter};

/// Writes the combined JAR to `dest` and returns the number of entries written.
///
/// Fails with [`Error::MissingNativeLibrary`] when a platform JAR contributes
/// no native entries, and with [`Error::DuplicateEntry`] when two platform
/// JARs carry the same native entry name.
pub fn write_combined_jar(base: &Path, platform_jars: &[PathBuf], dest: &Path) -> Result<usize> {
    let mut writer = create_writer(dest)?;
    let mut seen = HashSet::new();

    let mut base_archive = open_archive(base)?;
    let mut written = copy_entries(&mut base_archive, base, &mut writer, &mut seen, |name| {
        !is_native_entry(name)
    })?;

    for jar in platform_jars {
        let mut archive = open_archive(jar)?;
        let natives = copy_entries(&mut archive, jar, &mut writer, &mut seen, is_native_entry)?;
        if natives == 0 {
            return Err(Error::MissingNativeLibrary {
                archive: jar.clone(),
                prefix: NATIVE_LIBRARY_PREFIX,
            });
        }
        log::debug!("{} native entries from {}", natives, jar.display());
        written += natives;
    }

    writer.finish()?;
    Ok(written)
}

/// Writes `base` without its native libraries to `dest` and returns the entry count.
pub fn write_nolib_jar(base: &Path, dest: &Path) -> Result<usize> {
    let mut writer = create_writer(dest)?;
    let mut seen = HashSet::new();
    let mut archive = open_archive(base)?;
    let written = copy_entries(&mut archive, base, &mut writer, &mut seen, |name| {
        !is_native_entry(name)
    })?;
    writer.finish()?;
    Ok(written)
}

/// Runs [`write_combined_jar`] on the blocking thread pool.
pub async fn assemble_combined_jar(
    base: PathBuf,
    platform_jars: Vec<PathBuf>,
    dest: PathBuf,
) -> Result<usize> {
    tokio::task::spawn_blocking(move || write_combined_jar(&base, &platform_jars, &dest))
        .await
        .map_err(|e| Error::GenericError(format!("combined JAR task panicked: {e}")))?
}

/// Runs [`write_nolib_jar`] on the blocking thread pool.
pub async fn assemble_nolib_jar(base: PathBuf, dest: PathBuf) -> Result<usize> {
    tokio::task::spawn_blocking(move || write_nolib_jar(&base, &dest))
        .await
        .map_err(|e| Error::GenericError(format!("nolib JAR task panicked: {e}")))?
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).fs_context("opening archive", path)?;
    Ok(ZipArchive::new(file)?)
}

fn create_writer(dest: &Path) -> Result<ZipWriter<File>> {
    let file = File::create(dest).fs_context("creating archive", dest)?;
    Ok(ZipWriter::new(file))
}

fn copy_entries(
    source: &mut ZipArchive<File>,
    source_path: &Path,
    writer: &mut ZipWriter<File>,
    seen: &mut HashSet<String>,
    keep: impl Fn(&str) -> bool,
) -> Result<usize> {
    let mut copied = 0;
    for index in 0..source.len() {
        let entry = source.by_index_raw(index)?;
        let name = entry.name().to_string();
        if !keep(&name) {
            continue;
        }
        if !seen.insert(name.clone()) {
            return Err(Error::DuplicateEntry {
                name,
                archive: source_path.to_path_buf(),
            });
        }
        writer.raw_copy_file(entry)?;
        copied += 1;
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use zip::write::SimpleFileOptions;

    const COMMON: [(&str, &[u8]); 3] = [
        ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n"),
        ("org/duckdb/DuckDBDriver.class", b"\xca\xfe\xba\xbe driver"),
        ("org/duckdb/DuckDBConnection.class", b"\xca\xfe\xba\xbe connection"),
    ];

    fn platform_jar(dir: &Path, name: &str, native: Option<(&str, &[u8])>) -> PathBuf {
        let path = dir.join(name);
        let mut writer = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default();
        for (entry, bytes) in COMMON {
            writer.start_file(entry, options).unwrap();
            writer.write_all(bytes).unwrap();
        }
        if let Some((entry, bytes)) = native {
            writer.start_file(entry, options).unwrap();
            writer.write_all(bytes).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    fn entries(path: &Path) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes).unwrap();
                (file.name().to_string(), bytes)
            })
            .collect()
    }

    #[test]
    fn combined_jar_has_common_entries_plus_each_native() {
        let dir = tempfile::tempdir().unwrap();
        let linux = platform_jar(
            dir.path(),
            "linux.jar",
            Some(("libduckdb_java.so_linux_amd64", b"ELF linux")),
        );
        let osx = platform_jar(
            dir.path(),
            "osx.jar",
            Some(("libduckdb_java.so_osx_universal", b"MACHO osx")),
        );
        let dest = dir.path().join("combined.jar");

        let written = write_combined_jar(&linux, &[linux.clone(), osx], &dest).unwrap();

        let combined = entries(&dest);
        assert_eq!(written, COMMON.len() + 2);
        assert_eq!(combined.len(), COMMON.len() + 2);
        let names: HashSet<_> = combined.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names.len(), combined.len());
        assert!(names.contains("libduckdb_java.so_linux_amd64"));
        assert!(names.contains("libduckdb_java.so_osx_universal"));
        for (name, bytes) in COMMON {
            assert!(combined.iter().any(|(n, b)| n == name && b == bytes));
        }
    }

    #[test]
    fn nolib_jar_drops_only_native_entries() {
        let dir = tempfile::tempdir().unwrap();
        let linux = platform_jar(
            dir.path(),
            "linux.jar",
            Some(("libduckdb_java.so_linux_amd64", b"ELF linux")),
        );
        let dest = dir.path().join("nolib.jar");

        let written = write_nolib_jar(&linux, &dest).unwrap();

        let nolib = entries(&dest);
        assert_eq!(written, COMMON.len());
        assert!(nolib.iter().all(|(name, _)| !is_native_entry(name)));
        for (name, bytes) in COMMON {
            assert!(nolib.iter().any(|(n, b)| n == name && b == bytes));
        }
    }

    #[test]
    fn platform_without_native_library_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let linux = platform_jar(
            dir.path(),
            "linux.jar",
            Some(("libduckdb_java.so_linux_amd64", b"ELF linux")),
        );
        let broken = platform_jar(dir.path(), "broken.jar", None);

        let err = write_combined_jar(&linux, &[linux.clone(), broken.clone()], &dir.path().join("c.jar"))
            .unwrap_err();

        match err {
            Error::MissingNativeLibrary { archive, prefix } => {
                assert_eq!(archive, broken);
                assert_eq!(prefix, NATIVE_LIBRARY_PREFIX);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn same_native_entry_from_two_platforms_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let first = platform_jar(
            dir.path(),
            "first.jar",
            Some(("libduckdb_java.so_linux_amd64", b"one")),
        );
        let second = platform_jar(
            dir.path(),
            "second.jar",
            Some(("libduckdb_java.so_linux_amd64", b"two")),
        );

        let err = write_combined_jar(&first, &[first.clone(), second], &dir.path().join("c.jar"))
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateEntry { ref name, .. } if name == "libduckdb_java.so_linux_amd64"));
    }

    #[tokio::test]
    async fn async_wrapper_reports_missing_base() {
        let dir = tempfile::tempdir().unwrap();
        let err = assemble_nolib_jar(dir.path().join("absent.jar"), dir.path().join("out.jar"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fs { context: "opening archive", .. }));
    }
}
