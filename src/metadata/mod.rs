//! Project metadata published in the POM.
//!
//! The driver's coordinates, license, developers and SCM details are compiled
//! in. A TOML file can override any of them; fields it omits keep the
//! built-in values.

use crate::error::{CliError, ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata describing the published Maven project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMetadata {
    /// Maven group id (e.g., "org.duckdb")
    pub group_id: String,

    /// Maven artifact id (e.g., "duckdb_jdbc")
    pub artifact_id: String,

    /// Human-readable project name
    pub name: String,

    /// One-line project description
    pub description: String,

    /// Project homepage
    pub url: String,

    /// Licenses the project is distributed under
    pub licenses: Vec<License>,

    /// People responsible for the project
    pub developers: Vec<Developer>,

    /// Source control coordinates
    pub scm: Scm,
}

/// A POM `<license>` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// License name
    pub name: String,
    /// License text URL
    pub url: String,
    /// Distribution mode, usually "repo"
    #[serde(default = "default_distribution")]
    pub distribution: String,
}

/// A POM `<developer>` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Developer {
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Organization name
    pub organization: String,
    /// Organization homepage
    pub organization_url: String,
}

/// The POM `<scm>` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scm {
    /// Read-only connection URL
    pub connection: String,
    /// Developer (read-write) connection URL
    pub developer_connection: String,
    /// Browsable repository URL
    pub url: String,
}

fn default_distribution() -> String {
    "repo".to_string()
}

fn duckdb_labs_developer(name: &str, email: &str) -> Developer {
    Developer {
        name: name.to_string(),
        email: email.to_string(),
        organization: "DuckDB Labs".to_string(),
        organization_url: "https://www.duckdblabs.com".to_string(),
    }
}

impl Default for Scm {
    fn default() -> Self {
        Self {
            connection: "scm:git:git://github.com/duckdb/duckdb-java.git".to_string(),
            developer_connection: "scm:git:ssh://github.com:duckdb/duckdb-java.git".to_string(),
            url: "https://github.com/duckdb/duckdb-java".to_string(),
        }
    }
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            group_id: "org.duckdb".to_string(),
            artifact_id: "duckdb_jdbc".to_string(),
            name: "DuckDB JDBC Driver".to_string(),
            description: "A JDBC-Compliant driver for the DuckDB data management system"
                .to_string(),
            url: "https://www.duckdb.org".to_string(),
            licenses: vec![License {
                name: "MIT License".to_string(),
                url: "https://raw.githubusercontent.com/duckdb/duckdb/main/LICENSE".to_string(),
                distribution: default_distribution(),
            }],
            developers: vec![
                duckdb_labs_developer("Mark Raasveldt", "mark@duckdblabs.com"),
                duckdb_labs_developer("Hannes Muehleisen", "hannes@duckdblabs.com"),
            ],
            scm: Scm::default(),
        }
    }
}

impl ProjectMetadata {
    /// Parses metadata overrides from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let metadata: Self = toml::from_str(text)?;
        metadata.validate()?;
        Ok(metadata)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("group_id", &self.group_id),
            ("artifact_id", &self.artifact_id),
            ("name", &self.name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ReleaseError::Cli(CliError::InvalidArguments {
                    reason: format!("project metadata field '{field}' must not be empty"),
                }));
            }
        }
        if self.group_id.split('.').any(str::is_empty) {
            return Err(ReleaseError::Cli(CliError::InvalidArguments {
                reason: format!("invalid group_id '{}'", self.group_id),
            }));
        }
        Ok(())
    }
}

/// Loads project metadata, falling back to the built-in values when `path` is `None`.
pub fn load_project(path: Option<&Path>) -> Result<ProjectMetadata> {
    let Some(path) = path else {
        return Ok(ProjectMetadata::default());
    };

    let text = std::fs::read_to_string(path).map_err(|e| {
        ReleaseError::Cli(CliError::ExecutionFailed {
            command: "read_project_metadata".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;
    log::info!("Loaded project metadata from {}", path.display());
    ProjectMetadata::from_toml(&text)
}
