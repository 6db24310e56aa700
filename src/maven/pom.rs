//! Project descriptor (POM) generation.
//!
//! The POM is only used for deployment: it carries coordinates and the
//! metadata Maven Central requires, never build instructions.

use crate::maven::error::{ErrorExt, Result};
use crate::maven::version::ReleaseVersion;
use crate::metadata::ProjectMetadata;
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

const POM_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
  <modelVersion>4.0.0</modelVersion>
  <groupId>{{project.group_id}}</groupId>
  <artifactId>{{project.artifact_id}}</artifactId>
  <version>{{version}}</version>
  <packaging>jar</packaging>
  <name>{{project.name}}</name>
  <description>{{project.description}}</description>
  <url>{{project.url}}</url>

  <licenses>
{{#each project.licenses}}
    <license>
      <name>{{name}}</name>
      <url>{{url}}</url>
      <distribution>{{distribution}}</distribution>
    </license>
{{/each}}
  </licenses>

  <developers>
{{#each project.developers}}
    <developer>
      <name>{{name}}</name>
      <email>{{email}}</email>
      <organization>{{organization}}</organization>
      <organizationUrl>{{organization_url}}</organizationUrl>
    </developer>
{{/each}}
  </developers>

  <scm>
    <connection>{{project.scm.connection}}</connection>
    <developerConnection>{{project.scm.developer_connection}}</developerConnection>
    <url>{{project.scm.url}}</url>
  </scm>
</project>
<!-- Note: this cannot be used to build the JDBC driver, it is only used to deploy -->
"#;

#[derive(Serialize)]
struct PomData<'a> {
    project: &'a ProjectMetadata,
    version: &'a str,
}

/// Renders the POM for `project` at `version`.
///
/// Values are XML-escaped.
pub fn render_pom(project: &ProjectMetadata, version: &ReleaseVersion) -> Result<String> {
    let handlebars = Handlebars::new();
    let data = PomData {
        project,
        version: version.as_str(),
    };
    Ok(handlebars.render_template(POM_TEMPLATE, &data)?)
}

/// Renders the POM and writes it to `dest`.
pub async fn write_pom(project: &ProjectMetadata, version: &ReleaseVersion, dest: &Path) -> Result<()> {
    let pom = render_pom(project, version)?;
    tokio::fs::write(dest, pom)
        .await
        .fs_context("writing POM", dest)?;
    log::info!("✓ Wrote {}", dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maven::version::TagVersion;

    fn version(tag: &str) -> ReleaseVersion {
        TagVersion::parse(tag).unwrap().release()
    }

    #[test]
    fn pom_carries_coordinates_and_version() {
        let pom = render_pom(&ProjectMetadata::default(), &version("v1.2.3.4")).unwrap();
        assert!(pom.contains("<groupId>org.duckdb</groupId>"));
        assert!(pom.contains("<artifactId>duckdb_jdbc</artifactId>"));
        assert!(pom.contains("<version>1.2.3.4</version>"));
        assert!(pom.contains("<packaging>jar</packaging>"));
        assert!(pom.contains("<name>DuckDB JDBC Driver</name>"));
    }

    #[test]
    fn pom_lists_every_developer_and_license() {
        let pom = render_pom(&ProjectMetadata::default(), &version("v1.2.3.4")).unwrap();
        assert_eq!(pom.matches("<developer>").count(), 2);
        assert_eq!(pom.matches("<license>").count(), 1);
        assert!(pom.contains("<email>hannes@duckdblabs.com</email>"));
        assert!(pom.contains("<distribution>repo</distribution>"));
        assert!(pom.contains("<developerConnection>scm:git:ssh://github.com:duckdb/duckdb-java.git</developerConnection>"));
    }

    #[test]
    fn snapshot_version_is_rendered_verbatim() {
        let snapshot = TagVersion::parse("v1.4.4.0")
            .unwrap()
            .next_snapshot(Some("abc1234"))
            .unwrap();
        let pom = render_pom(&ProjectMetadata::default(), &snapshot).unwrap();
        assert!(pom.contains("<version>1.4.5.0-abc1234-SNAPSHOT</version>"));
    }

    #[test]
    fn markup_in_values_is_escaped() {
        let project = ProjectMetadata {
            description: "Fast <analytical> & embedded".to_string(),
            ..ProjectMetadata::default()
        };
        let pom = render_pom(&project, &version("v1.0.0.0")).unwrap();
        assert!(pom.contains("Fast &lt;analytical&gt; &amp; embedded"));
        assert!(!pom.contains("<analytical>"));
    }

    #[tokio::test]
    async fn write_pom_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("duckdb_jdbc-1.2.3.4.pom");
        write_pom(&ProjectMetadata::default(), &version("v1.2.3.4"), &dest)
            .await
            .unwrap();
        assert!(std::fs::read_to_string(dest).unwrap().starts_with("<?xml"));
    }
}
