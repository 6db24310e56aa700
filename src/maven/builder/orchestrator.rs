//! Staging and bundle orchestration.
//!
//! [`ArtifactBuilder`] turns the CI platform builds and the driver checkout
//! into the full set of Maven artifacts inside a staging directory.
//! [`write_central_bundle`] then lays those artifacts out in repository format,
//! signs them, writes digests and zips the result for the Central Portal.

use crate::maven::{
    archive::{ArchiveKind, pack_tree_async},
    assembler::{assemble_combined_jar, assemble_nolib_jar},
    docs::{build_javadoc_jar, build_sources_jar},
    error::{Error, ErrorExt, Result},
    platform::Platform,
    pom::write_pom,
    utils::fs::{copy_file, ensure_files_exist},
    version::ReleaseVersion,
};
use crate::metadata::ProjectMetadata;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::{checksum::write_digest_files, signing::Signer};

/// Directory inside the staging area holding the repository-layout bundle.
pub const BUNDLE_DIR_NAME: &str = "central-bundle";

/// File name of the zipped bundle.
pub const BUNDLE_ZIP_NAME: &str = "central-bundle.zip";

/// `groupId:artifactId:version` of the published driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCoordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: ReleaseVersion,
}

impl ArtifactCoordinates {
    /// Coordinates of `project` at `version`.
    pub fn new(project: &ProjectMetadata, version: ReleaseVersion) -> Self {
        Self {
            group_id: project.group_id.clone(),
            artifact_id: project.artifact_id.clone(),
            version,
        }
    }

    /// `<artifact>-<version>[-<classifier>].<extension>`
    pub fn file_name(&self, classifier: Option<&str>, extension: &str) -> String {
        match classifier {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                self.artifact_id, self.version, classifier, extension
            ),
            None => format!("{}-{}.{}", self.artifact_id, self.version, extension),
        }
    }

    /// `<group path>/<artifact>/<version>` relative to a repository root.
    pub fn repository_path(&self) -> PathBuf {
        let mut path: PathBuf = self.group_id.split('.').collect();
        path.push(&self.artifact_id);
        path.push(self.version.as_str());
        path
    }
}

/// Role of a staged file in the published artifact set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Project descriptor
    Pom,
    /// Combined JAR with native libraries for the major platforms
    Main,
    /// Java sources
    Sources,
    /// Generated API documentation
    Javadoc,
    /// Java classes only
    NoLib,
    /// Single-platform JAR
    Platform(Platform),
}

impl ArtifactKind {
    /// Maven classifier when publishing `version`, `None` for the POM and the main JAR.
    pub fn classifier(self, version: &ReleaseVersion) -> Option<&'static str> {
        match self {
            ArtifactKind::Pom | ArtifactKind::Main => None,
            ArtifactKind::Sources => Some("sources"),
            ArtifactKind::Javadoc => Some("javadoc"),
            ArtifactKind::NoLib => Some("nolib"),
            ArtifactKind::Platform(platform) => Some(platform.classifier(version)),
        }
    }

    /// File extension of the artifact.
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Pom => "pom",
            _ => "jar",
        }
    }
}

/// A file written into the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

/// What to do when a platform build has no JAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingJarPolicy {
    /// Abort the run
    Fail,
    /// Log a warning and publish without that classifier
    Skip,
}

/// Process-scoped staging directory, removed on drop unless kept.
///
/// A kept area survives both [`StagingArea::finish`] and an early drop on an
/// error path.
#[derive(Debug)]
pub struct StagingArea {
    dir: Option<TempDir>,
    path: PathBuf,
    keep: bool,
}

impl StagingArea {
    /// Creates a fresh staging directory under the system temp dir.
    pub fn new(keep: bool) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("jdbc-release-")
            .tempdir()
            .fs_context("creating staging directory", std::env::temp_dir())?;
        log::debug!("Staging in {}", dir.path().display());
        Ok(Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
            keep,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ends the staging lifetime. Returns the retained path when kept.
    pub fn finish(mut self) -> Option<PathBuf> {
        let dir = self.dir.take()?;
        if self.keep {
            Some(dir.keep())
        } else {
            drop(dir);
            None
        }
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if self.keep
            && let Some(dir) = self.dir.take()
        {
            let kept = dir.keep();
            log::warn!("Staging directory kept at {}", kept.display());
        }
    }
}

/// Builds every artifact of one version into a staging directory.
#[derive(Debug)]
pub struct ArtifactBuilder<'a> {
    project: &'a ProjectMetadata,
    coordinates: ArtifactCoordinates,
    artifact_dir: PathBuf,
    jdbc_root: PathBuf,
    staging: PathBuf,
    missing_jars: MissingJarPolicy,
}

impl<'a> ArtifactBuilder<'a> {
    pub fn new(
        project: &'a ProjectMetadata,
        version: ReleaseVersion,
        artifact_dir: impl Into<PathBuf>,
        jdbc_root: impl Into<PathBuf>,
        staging: impl Into<PathBuf>,
        missing_jars: MissingJarPolicy,
    ) -> Self {
        Self {
            coordinates: ArtifactCoordinates::new(project, version),
            project,
            artifact_dir: artifact_dir.into(),
            jdbc_root: jdbc_root.into(),
            staging: staging.into(),
            missing_jars,
        }
    }

    pub fn coordinates(&self) -> &ArtifactCoordinates {
        &self.coordinates
    }

    /// Builds the POM, all JARs and the documentation JARs.
    ///
    /// Order: POM, main, sources, javadoc, nolib, then platform JARs in
    /// [`Platform::ALL`] order.
    pub async fn build_all(&self) -> Result<Vec<StagedArtifact>> {
        let mut artifacts = Vec::new();
        artifacts.push(self.build_pom().await?);
        artifacts.push(self.build_main_jar().await?);
        artifacts.extend(self.build_docs().await?);
        artifacts.push(self.build_nolib_jar().await?);
        artifacts.extend(self.copy_platform_jars().await?);

        ensure_files_exist(artifacts.iter().map(|a| a.path.as_path()))?;
        log::info!(
            "✓ Staged {} artifacts for {}",
            artifacts.len(),
            self.coordinates.version
        );
        Ok(artifacts)
    }

    fn staged_path(&self, kind: ArtifactKind) -> PathBuf {
        let classifier = kind.classifier(&self.coordinates.version);
        self.staging
            .join(self.coordinates.file_name(classifier, kind.extension()))
    }

    pub async fn build_pom(&self) -> Result<StagedArtifact> {
        let path = self.staged_path(ArtifactKind::Pom);
        write_pom(self.project, &self.coordinates.version, &path).await?;
        Ok(StagedArtifact {
            kind: ArtifactKind::Pom,
            path,
        })
    }

    /// Base classes plus the native libraries of every [`Platform::COMBINED`] build.
    pub async fn build_main_jar(&self) -> Result<StagedArtifact> {
        let base = Platform::BASE.jar_path(&self.artifact_dir);
        let platform_jars: Vec<PathBuf> = Platform::COMBINED
            .iter()
            .map(|p| p.jar_path(&self.artifact_dir))
            .collect();
        ensure_files_exist(platform_jars.iter().map(PathBuf::as_path))?;

        let path = self.staged_path(ArtifactKind::Main);
        let entries = assemble_combined_jar(base, platform_jars, path.clone()).await?;
        log::info!("✓ Combined JAR with {} entries: {}", entries, path.display());
        Ok(StagedArtifact {
            kind: ArtifactKind::Main,
            path,
        })
    }

    pub async fn build_nolib_jar(&self) -> Result<StagedArtifact> {
        let base = Platform::BASE.jar_path(&self.artifact_dir);
        let path = self.staged_path(ArtifactKind::NoLib);
        let entries = assemble_nolib_jar(base, path.clone()).await?;
        log::info!("✓ Nolib JAR with {} entries: {}", entries, path.display());
        Ok(StagedArtifact {
            kind: ArtifactKind::NoLib,
            path,
        })
    }

    /// Sources and javadoc JARs; javadoc needs the JDK's `javadoc` on `PATH`.
    pub async fn build_docs(&self) -> Result<Vec<StagedArtifact>> {
        let sources = self.staged_path(ArtifactKind::Sources);
        build_sources_jar(&self.jdbc_root, &sources).await?;
        let javadoc = self.staged_path(ArtifactKind::Javadoc);
        build_javadoc_jar(&self.jdbc_root, &javadoc).await?;
        Ok(vec![
            StagedArtifact {
                kind: ArtifactKind::Sources,
                path: sources,
            },
            StagedArtifact {
                kind: ArtifactKind::Javadoc,
                path: javadoc,
            },
        ])
    }

    /// Copies each platform JAR under its classifier name.
    pub async fn copy_platform_jars(&self) -> Result<Vec<StagedArtifact>> {
        let mut staged = Vec::with_capacity(Platform::ALL.len());
        for platform in Platform::ALL {
            let source = platform.jar_path(&self.artifact_dir);
            if !source.is_file() {
                match self.missing_jars {
                    MissingJarPolicy::Fail => return Err(Error::MissingArtifact(source)),
                    MissingJarPolicy::Skip => {
                        log::warn!(
                            "{} not found, skipping {}",
                            source.display(),
                            platform.classifier(&self.coordinates.version)
                        );
                        continue;
                    }
                }
            }
            let kind = ArtifactKind::Platform(platform);
            let path = self.staged_path(kind);
            copy_file(&source, &path).await?;
            staged.push(StagedArtifact { kind, path });
        }
        Ok(staged)
    }
}

/// Lays out `artifacts` under `<staging>/central-bundle/<repository path>`,
/// signs each with `signer` (when given), writes digests and zips the bundle.
///
/// Returns the path of `central-bundle.zip`.
pub async fn write_central_bundle(
    staging: &Path,
    coordinates: &ArtifactCoordinates,
    artifacts: &[StagedArtifact],
    signer: Option<&Signer>,
) -> Result<PathBuf> {
    let bundle_root = staging.join(BUNDLE_DIR_NAME);
    let bundle_dir = bundle_root.join(coordinates.repository_path());
    tokio::fs::create_dir_all(&bundle_dir)
        .await
        .fs_context("creating bundle directory", &bundle_dir)?;

    for artifact in artifacts {
        let file_name = artifact
            .path
            .file_name()
            .ok_or_else(|| Error::MissingArtifact(artifact.path.clone()))?;
        let bundled = bundle_dir.join(file_name);
        copy_file(&artifact.path, &bundled).await?;
        if let Some(signer) = signer {
            signer.sign_detached(&bundled).await?;
        }
        write_digest_files(&bundled).await?;
    }

    let zip = staging.join(BUNDLE_ZIP_NAME);
    let files = pack_tree_async(bundle_root, None, zip.clone(), ArchiveKind::Zip).await?;
    log::info!("✓ Bundle with {} files: {}", files, zip.display());
    Ok(zip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maven::version::TagVersion;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn release() -> ReleaseVersion {
        TagVersion::parse("v1.2.3.4").unwrap().release()
    }

    fn write_platform_jar(artifact_dir: &Path, platform: Platform) {
        let path = platform.jar_path(artifact_dir);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut writer = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
        let options = SimpleFileOptions::default();
        writer.start_file("org/duckdb/DuckDBDriver.class", options).unwrap();
        writer.write_all(b"classes").unwrap();
        writer
            .start_file(
                format!("libduckdb_java.so_{}", platform.snapshot_classifier()),
                options,
            )
            .unwrap();
        writer.write_all(b"native").unwrap();
        writer.finish().unwrap();
    }

    fn entry_names(path: &Path) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index_raw(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn file_names_follow_maven_convention() {
        let project = ProjectMetadata::default();
        let coordinates = ArtifactCoordinates::new(&project, release());
        assert_eq!(coordinates.file_name(None, "jar"), "duckdb_jdbc-1.2.3.4.jar");
        assert_eq!(
            coordinates.file_name(Some("sources"), "jar"),
            "duckdb_jdbc-1.2.3.4-sources.jar"
        );
        assert_eq!(
            coordinates.repository_path(),
            Path::new("org/duckdb/duckdb_jdbc/1.2.3.4")
        );
    }

    #[test]
    fn kinds_map_to_classifiers() {
        let version = release();
        assert_eq!(ArtifactKind::Main.classifier(&version), None);
        assert_eq!(ArtifactKind::Pom.extension(), "pom");
        assert_eq!(ArtifactKind::NoLib.classifier(&version), Some("nolib"));
        assert_eq!(
            ArtifactKind::Platform(Platform::LinuxAarch64).classifier(&version),
            Some("linux_aarch64")
        );
    }

    #[tokio::test]
    async fn release_platform_jars_use_release_classifiers() {
        let artifacts = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        for platform in Platform::ALL {
            write_platform_jar(artifacts.path(), platform);
        }
        let project = ProjectMetadata::default();
        let builder = ArtifactBuilder::new(
            &project,
            release(),
            artifacts.path(),
            artifacts.path(),
            staging.path(),
            MissingJarPolicy::Fail,
        );

        let staged = builder.copy_platform_jars().await.unwrap();

        let names: Vec<String> = staged
            .iter()
            .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "duckdb_jdbc-1.2.3.4-linux_amd64.jar",
                "duckdb_jdbc-1.2.3.4-linux_aarch64.jar",
                "duckdb_jdbc-1.2.3.4-linux_amd64_musl.jar",
                "duckdb_jdbc-1.2.3.4-linux_aarch64_musl.jar",
                "duckdb_jdbc-1.2.3.4-macos_universal.jar",
                "duckdb_jdbc-1.2.3.4-windows_amd64.jar",
                "duckdb_jdbc-1.2.3.4-windows_aarch64.jar",
            ]
        );
    }

    #[tokio::test]
    async fn main_jar_merges_combined_platforms() {
        let artifacts = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        for platform in Platform::COMBINED {
            write_platform_jar(artifacts.path(), platform);
        }
        let project = ProjectMetadata::default();
        let builder = ArtifactBuilder::new(
            &project,
            release(),
            artifacts.path(),
            artifacts.path(),
            staging.path(),
            MissingJarPolicy::Fail,
        );

        let main = builder.build_main_jar().await.unwrap();
        let names = entry_names(&main.path);
        assert_eq!(names.len(), 1 + Platform::COMBINED.len());
        assert!(names.contains(&"libduckdb_java.so_macos_universal".to_string()));

        let nolib = builder.build_nolib_jar().await.unwrap();
        assert_eq!(entry_names(&nolib.path), vec!["org/duckdb/DuckDBDriver.class"]);
    }

    #[tokio::test]
    async fn missing_combined_platform_is_fatal() {
        let artifacts = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        write_platform_jar(artifacts.path(), Platform::LinuxAmd64);
        let project = ProjectMetadata::default();
        let builder = ArtifactBuilder::new(
            &project,
            release(),
            artifacts.path(),
            artifacts.path(),
            staging.path(),
            MissingJarPolicy::Skip,
        );

        let err = builder.build_main_jar().await.unwrap_err();
        assert!(matches!(err, Error::MissingArtifact(_)));
    }

    #[tokio::test]
    async fn missing_platform_jar_follows_policy() {
        let artifacts = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        write_platform_jar(artifacts.path(), Platform::LinuxAmd64);
        let project = ProjectMetadata::default();

        let skipping = ArtifactBuilder::new(
            &project,
            release(),
            artifacts.path(),
            artifacts.path(),
            staging.path(),
            MissingJarPolicy::Skip,
        );
        let staged = skipping.copy_platform_jars().await.unwrap();
        assert_eq!(staged.len(), 1);
        assert!(staged[0].path.ends_with("duckdb_jdbc-1.2.3.4-linux_amd64.jar"));

        let failing = ArtifactBuilder::new(
            &project,
            release(),
            artifacts.path(),
            artifacts.path(),
            staging.path(),
            MissingJarPolicy::Fail,
        );
        assert!(matches!(
            failing.copy_platform_jars().await.unwrap_err(),
            Error::MissingArtifact(_)
        ));
    }

    #[tokio::test]
    async fn unsigned_bundle_has_repository_layout_and_digests() {
        let staging = tempfile::tempdir().unwrap();
        let project = ProjectMetadata::default();
        let coordinates = ArtifactCoordinates::new(&project, release());
        let artifacts = staged_pom_and_jar(staging.path());

        let zip = write_central_bundle(staging.path(), &coordinates, &artifacts, None)
            .await
            .unwrap();

        assert!(zip.ends_with(BUNDLE_ZIP_NAME));
        let names = entry_names(&zip);
        let prefix = "org/duckdb/duckdb_jdbc/1.2.3.4/";
        for file in ["duckdb_jdbc-1.2.3.4.pom", "duckdb_jdbc-1.2.3.4.jar"] {
            assert!(names.contains(&format!("{prefix}{file}")));
            for ext in ["md5", "sha1", "sha256"] {
                assert!(names.contains(&format!("{prefix}{file}.{ext}")));
            }
        }
        assert!(!names.iter().any(|n| n.ends_with(".asc")));
        assert!(!names.iter().any(|n| n.starts_with(BUNDLE_DIR_NAME)));
    }

    fn staged_pom_and_jar(staging: &Path) -> Vec<StagedArtifact> {
        let pom = staging.join("duckdb_jdbc-1.2.3.4.pom");
        let jar = staging.join("duckdb_jdbc-1.2.3.4.jar");
        std::fs::write(&pom, "<project/>").unwrap();
        std::fs::write(&jar, "jar bytes").unwrap();
        vec![
            StagedArtifact {
                kind: ArtifactKind::Pom,
                path: pom,
            },
            StagedArtifact {
                kind: ArtifactKind::Main,
                path: jar,
            },
        ]
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn signed_bundle_carries_signatures() {
        let tools = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let project = ProjectMetadata::default();
        let coordinates = ArtifactCoordinates::new(&project, release());
        let artifacts = staged_pom_and_jar(staging.path());
        let signer = Signer::new(crate::maven::builder::signing::fake_gpg(
            tools.path(),
            r#"echo signed > "$3.asc""#,
        ));

        let zip = write_central_bundle(staging.path(), &coordinates, &artifacts, Some(&signer))
            .await
            .unwrap();

        let names = entry_names(&zip);
        let prefix = "org/duckdb/duckdb_jdbc/1.2.3.4/";
        for file in ["duckdb_jdbc-1.2.3.4.pom", "duckdb_jdbc-1.2.3.4.jar"] {
            assert!(names.contains(&format!("{prefix}{file}.asc")));
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn signing_failure_aborts_bundle() {
        let tools = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let project = ProjectMetadata::default();
        let coordinates = ArtifactCoordinates::new(&project, release());
        let artifacts = staged_pom_and_jar(staging.path());
        let signer = Signer::new(crate::maven::builder::signing::fake_gpg(tools.path(), "exit 2"));

        let err = write_central_bundle(staging.path(), &coordinates, &artifacts, Some(&signer))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ToolFailed { .. }));
        assert!(!staging.path().join(BUNDLE_ZIP_NAME).exists());
    }

    #[test]
    fn staging_area_is_removed_unless_kept() {
        let dropped = StagingArea::new(false).unwrap();
        let dropped_path = dropped.path().to_path_buf();
        assert!(dropped.finish().is_none());
        assert!(!dropped_path.exists());

        let kept = StagingArea::new(true).unwrap();
        let kept_path = kept.finish().unwrap();
        assert!(kept_path.is_dir());
        std::fs::remove_dir_all(kept_path).unwrap();
    }

    #[test]
    fn kept_staging_area_survives_early_drop() {
        let kept = StagingArea::new(true).unwrap();
        let kept_path = kept.path().to_path_buf();
        drop(kept);
        assert!(kept_path.is_dir());
        std::fs::remove_dir_all(kept_path).unwrap();

        let discarded = StagingArea::new(false).unwrap();
        let discarded_path = discarded.path().to_path_buf();
        drop(discarded);
        assert!(!discarded_path.exists());
    }
}
