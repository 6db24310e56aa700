//! Snapshot deployment through `mvn deploy:deploy-file`.
//!
//! The snapshot repository needs neither signatures nor portal validation,
//! so each artifact is pushed individually with the stock Maven deploy
//! plugin. Credentials reach Maven through a private `settings.xml`.

use crate::maven::builder::tool_detection::MAVEN;
use crate::maven::credentials::Credentials;
use crate::maven::error::{ErrorExt, Result};
use crate::maven::utils::process::run_tool;
use handlebars::Handlebars;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Central snapshot repository.
pub const SNAPSHOT_REPO_URL: &str = "https://central.sonatype.com/repository/maven-snapshots/";

/// Server id tying `settings.xml` credentials to the deploy command.
pub const SNAPSHOT_REPOSITORY_ID: &str = "central-snapshots";

const SETTINGS_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<settings>
  <servers>
    <server>
      <id>{{id}}</id>
      <username>{{username}}</username>
      <password>{{password}}</password>
    </server>
  </servers>
</settings>
"#;

#[derive(Serialize)]
struct SettingsData<'a> {
    id: &'a str,
    username: &'a str,
    password: &'a str,
}

/// Renders the Maven `settings.xml` holding `credentials`.
pub fn render_settings_xml(credentials: &Credentials) -> Result<String> {
    let data = SettingsData {
        id: SNAPSHOT_REPOSITORY_ID,
        username: credentials.username(),
        password: credentials.password(),
    };
    Ok(Handlebars::new().render_template(SETTINGS_TEMPLATE, &data)?)
}

/// Writes `settings.xml` to `path`, readable and writable by the owner only.
pub async fn write_settings_xml(path: &Path, credentials: &Credentials) -> Result<()> {
    use tokio::io::AsyncWriteExt;

    let content = render_settings_xml(credentials)?;
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options
        .open(path)
        .await
        .fs_context("creating settings.xml", path)?;
    file.write_all(content.as_bytes())
        .await
        .fs_context("writing settings.xml", path)?;
    file.flush().await.fs_context("writing settings.xml", path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .fs_context("restricting settings.xml", path)?;
    }
    Ok(())
}

/// One `deploy:deploy-file` invocation.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    /// File to upload
    pub file: PathBuf,
    /// Maven classifier, `None` for the main artifact
    pub classifier: Option<String>,
    /// POM deployed together with the file
    pub pom: Option<PathBuf>,
}

/// Deploys files of one `group:artifact:version` to the snapshot repository.
#[derive(Debug, Clone)]
pub struct SnapshotDeployer {
    settings: PathBuf,
    group_id: String,
    artifact_id: String,
    version: String,
}

impl SnapshotDeployer {
    /// Creates a deployer using the credentials in `settings`.
    pub fn new(
        settings: PathBuf,
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            settings,
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Arguments passed to `mvn` for `request`.
    ///
    /// Deploying the main JAR together with its POM keeps both under one
    /// snapshot build number; deploying them separately breaks resolution in
    /// Coursier and sbt.
    pub fn deploy_args(&self, request: &DeployRequest) -> Vec<String> {
        let mut args = vec![
            "deploy:deploy-file".to_string(),
            format!("-DgroupId={}", self.group_id),
            format!("-DartifactId={}", self.artifact_id),
            format!("-Dversion={}", self.version),
            "-Dpackaging=jar".to_string(),
            format!("-Dfile={}", request.file.display()),
            format!("-DrepositoryId={SNAPSHOT_REPOSITORY_ID}"),
            format!("-Durl={SNAPSHOT_REPO_URL}"),
            "-s".to_string(),
            self.settings.display().to_string(),
        ];
        match &request.pom {
            Some(pom) => args.push(format!("-DpomFile={}", pom.display())),
            None => args.push("-DgeneratePom=false".to_string()),
        }
        if let Some(classifier) = &request.classifier {
            args.push(format!("-Dclassifier={classifier}"));
        }
        args
    }

    /// Runs `mvn deploy:deploy-file` for `request`; a non-zero exit is fatal.
    pub async fn deploy(&self, request: &DeployRequest) -> Result<()> {
        run_tool(MAVEN, self.deploy_args(request), None).await?;
        log::info!(
            "✓ Deployed {} ({})",
            request.file.display(),
            request.classifier.as_deref().unwrap_or("main")
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::from_lookup(|name| match name {
            "MAVEN_USERNAME" => Some("snap-user".to_string()),
            "MAVEN_PASSWORD" => Some("p<a>ss&word".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn deployer() -> SnapshotDeployer {
        SnapshotDeployer::new(
            PathBuf::from("/stage/settings.xml"),
            "org.duckdb",
            "duckdb_jdbc",
            "1.4.5.0-abc1234-SNAPSHOT",
        )
    }

    #[test]
    fn settings_xml_holds_escaped_credentials() {
        let xml = render_settings_xml(&credentials()).unwrap();
        assert!(xml.contains("<id>central-snapshots</id>"));
        assert!(xml.contains("<username>snap-user</username>"));
        assert!(xml.contains("<password>p&lt;a&gt;ss&amp;word</password>"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn settings_xml_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");
        write_settings_xml(&path, &credentials()).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(std::fs::read_to_string(&path).unwrap().contains("snap-user"));
    }

    #[test]
    fn main_jar_is_deployed_with_pom() {
        let args = deployer().deploy_args(&DeployRequest {
            file: PathBuf::from("/stage/duckdb_jdbc.jar"),
            classifier: None,
            pom: Some(PathBuf::from("/stage/duckdb_jdbc.pom")),
        });
        assert_eq!(args[0], "deploy:deploy-file");
        assert!(args.contains(&"-DgroupId=org.duckdb".to_string()));
        assert!(args.contains(&"-Dversion=1.4.5.0-abc1234-SNAPSHOT".to_string()));
        assert!(args.contains(&"-DpomFile=/stage/duckdb_jdbc.pom".to_string()));
        assert!(args.contains(&"-DrepositoryId=central-snapshots".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("-Dclassifier")));
        assert!(!args.contains(&"-DgeneratePom=false".to_string()));
    }

    #[test]
    fn classified_jar_skips_pom_generation() {
        let args = deployer().deploy_args(&DeployRequest {
            file: PathBuf::from("/stage/nolib.jar"),
            classifier: Some("nolib".to_string()),
            pom: None,
        });
        assert!(args.contains(&"-Dclassifier=nolib".to_string()));
        assert!(args.contains(&"-DgeneratePom=false".to_string()));
        let settings_flag = args.iter().position(|a| a == "-s").unwrap();
        assert_eq!(args[settings_flag + 1], "/stage/settings.xml");
    }

    #[test]
    fn credentials_never_appear_in_arguments() {
        let args = deployer().deploy_args(&DeployRequest {
            file: PathBuf::from("/stage/x.jar"),
            classifier: None,
            pom: None,
        });
        assert!(!args.iter().any(|a| a.contains("snap-user")));
    }
}
