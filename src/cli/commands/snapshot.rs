//! `snapshot`: publish the latest build to the Central snapshot repository.

use super::require_directory;
use crate::cli::{RuntimeConfig, SnapshotArgs};
use crate::error::Result;
use crate::maven::builder::tool_detection::{GIT, JAVADOC, MAVEN, require_tools};
use crate::maven::builder::{ArtifactBuilder, ArtifactKind, MissingJarPolicy, StagedArtifact, StagingArea};
use crate::maven::error::Error;
use crate::maven::git::resolve_snapshot_version;
use crate::maven::upload::{DeployRequest, SNAPSHOT_REPO_URL, SnapshotDeployer, write_settings_xml};
use crate::maven::upload::snapshot::SNAPSHOT_REPOSITORY_ID;
use crate::maven::{Credentials, ReleaseVersion};
use crate::metadata::load_project;
use std::path::Path;

pub async fn execute(args: &SnapshotArgs, config: &RuntimeConfig) -> Result<i32> {
    deploy_snapshot(&args.artifact_dir, &args.jdbc_root, args.dry_run, config).await
}

/// Builds the artifacts for the next snapshot version and deploys them one by one.
///
/// Platform JARs missing from `artifact_dir` are skipped with a warning. With
/// `dry_run` the run stops after staging: no credentials are read, no
/// `settings.xml` is written and `mvn` is never invoked.
pub(super) async fn deploy_snapshot(
    artifact_dir: &Path,
    jdbc_root: &Path,
    dry_run: bool,
    config: &RuntimeConfig,
) -> Result<i32> {
    let credentials = if dry_run {
        None
    } else {
        Some(Credentials::from_env()?)
    };
    require_directory(artifact_dir, "artifact_dir")?;
    require_directory(jdbc_root, "jdbc_root")?;
    if dry_run {
        require_tools(&[GIT, JAVADOC])?;
    } else {
        require_tools(&[GIT, JAVADOC, MAVEN])?;
    }

    let version = resolve_snapshot_version(jdbc_root).await?;
    let project = load_project(config.project())?;
    config.section(&format!("Deploying SNAPSHOT {version}"))?;

    let staging = StagingArea::new(config.keep_staging())?;
    let builder = ArtifactBuilder::new(
        &project,
        version.clone(),
        artifact_dir,
        jdbc_root,
        staging.path(),
        MissingJarPolicy::Skip,
    );
    config.progress("Building artifacts")?;
    let artifacts = builder.build_all().await?;

    let Some(credentials) = credentials else {
        config.success(&format!(
            "Dry run: {} artifacts staged for {version}, deploy skipped",
            artifacts.len()
        ))?;
        if let Some(kept) = staging.finish() {
            config.indent(&format!("Staging directory kept at {}", kept.display()))?;
        }
        return Ok(0);
    };

    let settings = staging.path().join("settings.xml");
    write_settings_xml(&settings, &credentials).await?;
    let deployer = SnapshotDeployer::new(
        settings,
        &project.group_id,
        &project.artifact_id,
        version.as_str(),
    );
    for request in deploy_requests(&artifacts, &version)? {
        let label = request.classifier.as_deref().unwrap_or("main JAR + POM");
        config.progress(&format!("Deploying {label}"))?;
        deployer.deploy(&request).await?;
    }

    config.success(&format!("SNAPSHOT {version} deployed to {SNAPSHOT_REPO_URL}"))?;
    config.indent(&format!(
        "<dependency><groupId>{}</groupId><artifactId>{}</artifactId><version>{}</version></dependency>",
        project.group_id, project.artifact_id, version
    ))?;
    config.indent(&format!(
        "<repository><id>{SNAPSHOT_REPOSITORY_ID}</id><url>{SNAPSHOT_REPO_URL}</url><snapshots><enabled>true</enabled></snapshots></repository>"
    ))?;

    if let Some(kept) = staging.finish() {
        config.indent(&format!("Staging directory kept at {}", kept.display()))?;
    }
    Ok(0)
}

/// Main JAR with its POM first, then every classified artifact in staging order.
fn deploy_requests(
    artifacts: &[StagedArtifact],
    version: &ReleaseVersion,
) -> Result<Vec<DeployRequest>> {
    let find = |kind: ArtifactKind| {
        artifacts
            .iter()
            .find(|a| a.kind == kind)
            .map(|a| a.path.clone())
            .ok_or_else(|| Error::GenericError(format!("{kind:?} artifact was not staged")))
    };

    let mut requests = vec![DeployRequest {
        file: find(ArtifactKind::Main)?,
        classifier: None,
        pom: Some(find(ArtifactKind::Pom)?),
    }];
    requests.extend(
        artifacts
            .iter()
            .filter_map(|a| a.kind.classifier(version).map(|c| (a, c)))
            .map(|(artifact, classifier)| DeployRequest {
                file: artifact.path.clone(),
                classifier: Some(classifier.to_string()),
                pom: None,
            }),
    );
    Ok(requests)
}
