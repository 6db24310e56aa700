//! Platform builds produced by CI and how they map onto Maven artifacts.

use crate::maven::version::ReleaseVersion;
use std::path::{Path, PathBuf};

/// Every platform JAR names its native library `libduckdb_java.so_<os>_<arch>`.
pub const NATIVE_LIBRARY_PREFIX: &str = "libduckdb_java.so";

/// File name of the driver JAR inside each platform build directory.
pub const PLATFORM_JAR_NAME: &str = "duckdb_jdbc.jar";

/// A CI platform build of the driver.
///
/// Each build lands in `<artifact_dir>/java-<platform>/duckdb_jdbc.jar` and
/// contains the Java classes plus exactly one native library.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Platform {
    /// glibc Linux on x86_64
    LinuxAmd64,
    /// glibc Linux on AArch64
    LinuxAarch64,
    /// musl (Alpine) Linux on x86_64
    LinuxAmd64Musl,
    /// musl (Alpine) Linux on AArch64
    LinuxAarch64Musl,
    /// macOS universal binary (Intel + Apple Silicon)
    OsxUniversal,
    /// Windows on x86_64
    WindowsAmd64,
    /// Windows on ARM64
    WindowsAarch64,
}

impl Platform {
    /// All platform builds, each published as its own classifier JAR.
    pub const ALL: [Platform; 7] = [
        Platform::LinuxAmd64,
        Platform::LinuxAarch64,
        Platform::LinuxAmd64Musl,
        Platform::LinuxAarch64Musl,
        Platform::OsxUniversal,
        Platform::WindowsAmd64,
        Platform::WindowsAarch64,
    ];

    /// Builds whose native libraries go into the combined JAR.
    pub const COMBINED: [Platform; 4] = [
        Platform::LinuxAmd64,
        Platform::OsxUniversal,
        Platform::WindowsAmd64,
        Platform::LinuxAarch64,
    ];

    /// Build whose Java classes seed the combined and nolib JARs.
    pub const BASE: Platform = Platform::LinuxAmd64;

    /// CI artifact directory name.
    pub fn build_dir(self) -> &'static str {
        match self {
            Platform::LinuxAmd64 => "java-linux-amd64",
            Platform::LinuxAarch64 => "java-linux-aarch64",
            Platform::LinuxAmd64Musl => "java-linux-amd64-musl",
            Platform::LinuxAarch64Musl => "java-linux-aarch64-musl",
            Platform::OsxUniversal => "java-osx-universal",
            Platform::WindowsAmd64 => "java-windows-amd64",
            Platform::WindowsAarch64 => "java-windows-aarch64",
        }
    }

    /// Maven classifier of the single-platform JAR in snapshot builds.
    pub fn snapshot_classifier(self) -> &'static str {
        match self {
            Platform::LinuxAmd64 => "linux_amd64",
            Platform::LinuxAarch64 => "linux_arm64",
            Platform::LinuxAmd64Musl => "linux_amd64_musl",
            Platform::LinuxAarch64Musl => "linux_arm64_musl",
            Platform::OsxUniversal => "macos_universal",
            Platform::WindowsAmd64 => "windows_amd64",
            Platform::WindowsAarch64 => "windows_arm64",
        }
    }

    /// Maven classifier of the single-platform JAR in tagged releases.
    ///
    /// Released ARM classifiers keep the `aarch64` spelling already published
    /// on Central.
    pub fn release_classifier(self) -> &'static str {
        match self {
            Platform::LinuxAarch64 => "linux_aarch64",
            Platform::LinuxAarch64Musl => "linux_aarch64_musl",
            Platform::WindowsAarch64 => "windows_aarch64",
            other => other.snapshot_classifier(),
        }
    }

    /// Classifier used when publishing `version`.
    pub fn classifier(self, version: &ReleaseVersion) -> &'static str {
        if version.is_snapshot() {
            self.snapshot_classifier()
        } else {
            self.release_classifier()
        }
    }

    /// Location of this platform's JAR under `artifact_dir`.
    pub fn jar_path(self, artifact_dir: &Path) -> PathBuf {
        artifact_dir.join(self.build_dir()).join(PLATFORM_JAR_NAME)
    }
}

/// Returns true for archive entries that hold a native library.
pub fn is_native_entry(name: &str) -> bool {
    name.starts_with(NATIVE_LIBRARY_PREFIX)
}
