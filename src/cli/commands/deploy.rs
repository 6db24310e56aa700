//! `deploy`: publish a tagged release through the Central Portal.

use super::{require_directory, snapshot};
use crate::cli::{DeployArgs, RuntimeConfig};
use crate::error::{CliError, Result};
use crate::maven::builder::tool_detection::{GPG, JAVADOC, require_tools};
use crate::maven::builder::{
    ArtifactBuilder, MissingJarPolicy, Signer, StagingArea, write_central_bundle,
};
use crate::maven::upload::{PORTAL_UPLOAD_URL, PortalClient, PublishingType};
use crate::maven::{Credentials, ReleaseRef, TagVersion};
use crate::metadata::load_project;

pub async fn execute(args: &DeployArgs, config: &RuntimeConfig) -> Result<i32> {
    let tag = match ReleaseRef::parse(&args.release_tag)? {
        ReleaseRef::Snapshot => {
            reject_release_only_flags(args)?;
            config.verbose_println("`main` requested, publishing a snapshot")?;
            return snapshot::deploy_snapshot(
                &args.artifact_dir,
                &args.jdbc_root,
                args.dry_run,
                config,
            )
            .await;
        }
        ReleaseRef::Tag(tag) => tag,
    };

    let credentials = if args.dry_run {
        None
    } else {
        Some(Credentials::from_env()?)
    };
    require_directory(&args.artifact_dir, "artifact_dir")?;
    require_directory(&args.jdbc_root, "jdbc_root")?;
    if args.skip_signing {
        require_tools(&[JAVADOC])?;
    } else {
        require_tools(&[JAVADOC, GPG])?;
    }

    release(tag, args, credentials, config).await
}

/// Fails on signing and portal options passed together with `main`.
fn reject_release_only_flags(args: &DeployArgs) -> Result<()> {
    let flag = if args.skip_signing {
        Some("--skip-signing")
    } else if args.endpoint != PORTAL_UPLOAD_URL {
        Some("--endpoint")
    } else if args.publishing_type != PublishingType::Automatic {
        Some("--publishing-type")
    } else {
        None
    };
    match flag {
        Some(flag) => Err(CliError::InvalidArguments {
            reason: format!("{flag} only applies to tagged releases, not `main`"),
        }
        .into()),
        None => Ok(()),
    }
}

async fn release(
    tag: TagVersion,
    args: &DeployArgs,
    credentials: Option<Credentials>,
    config: &RuntimeConfig,
) -> Result<i32> {
    let version = tag.release();
    let project = load_project(config.project())?;
    config.section(&format!("Releasing {}:{} {}", project.group_id, project.artifact_id, version))?;

    let staging = StagingArea::new(config.keep_staging())?;
    let builder = ArtifactBuilder::new(
        &project,
        version.clone(),
        &args.artifact_dir,
        &args.jdbc_root,
        staging.path(),
        MissingJarPolicy::Fail,
    );

    config.progress("Building artifacts")?;
    let artifacts = builder.build_all().await?;
    for artifact in &artifacts {
        config.verbose_println(&artifact.path.display().to_string())?;
    }

    if args.skip_signing {
        config.warn("Signing skipped; Maven Central rejects unsigned bundles")?;
    } else {
        config.progress("Signing artifacts and writing digests")?;
    }
    let signer = (!args.skip_signing).then(Signer::default);
    let bundle = write_central_bundle(
        staging.path(),
        builder.coordinates(),
        &artifacts,
        signer.as_ref(),
    )
    .await?;
    config.success(&format!("Bundle ready: {}", bundle.display()))?;

    match credentials {
        Some(credentials) => {
            config.progress(&format!("Uploading to {}", args.endpoint))?;
            let client = PortalClient::new(&args.endpoint, &credentials);
            let deployment = client
                .upload_bundle(&bundle, version.as_str(), args.publishing_type)
                .await?;
            config.success(&format!("Deployment {deployment} created for {version}"))?;
        }
        None => {
            config.success("Dry run: upload skipped")?;
            if !config.keep_staging() {
                config.indent("Pass --keep-staging to inspect the bundle")?;
            }
        }
    }

    if let Some(kept) = staging.finish() {
        config.indent(&format!("Staging directory kept at {}", kept.display()))?;
    }
    Ok(0)
}
