//! Detached GPG signatures for published artifacts.
//!
//! The signing key is whatever the invoking environment's default GPG key is;
//! CI imports it before running the release.

use crate::maven::error::{Context, Error, Result};
use crate::maven::utils::process::run_tool;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use super::tool_detection::GPG;

/// Extension gpg uses for ASCII-armored detached signatures.
pub const SIGNATURE_EXTENSION: &str = "asc";

/// Produces `<artifact>.asc` with a gpg-compatible program.
#[derive(Debug, Clone)]
pub struct Signer {
    program: PathBuf,
}

impl Default for Signer {
    fn default() -> Self {
        Self::new(GPG)
    }
}

impl Signer {
    /// Signer running `program` instead of `gpg` from `PATH`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Signs `artifact` with `<program> --sign -ab`, writing `<artifact>.asc` next to it.
    ///
    /// The program runs inside the artifact's directory with the bare file
    /// name so the signature lands alongside it. The exit status is always
    /// checked and the signature file must exist afterwards.
    pub async fn sign_detached(&self, artifact: &Path) -> Result<PathBuf> {
        let dir = artifact
            .parent()
            .context(format!("{} has no parent directory", artifact.display()))?;
        let file_name = artifact
            .file_name()
            .context(format!("{} has no file name", artifact.display()))?;

        run_tool(
            &self.program,
            [OsStr::new("--sign"), OsStr::new("-ab"), file_name],
            Some(dir),
        )
        .await?;

        let signature = signature_path(artifact);
        if !signature.is_file() {
            return Err(Error::MissingArtifact(signature));
        }
        log::info!("✓ Signed {}", artifact.display());
        Ok(signature)
    }
}

/// Path of the detached signature for `artifact`.
pub fn signature_path(artifact: &Path) -> PathBuf {
    let mut name = artifact.as_os_str().to_os_string();
    name.push(".");
    name.push(SIGNATURE_EXTENSION);
    PathBuf::from(name)
}

/// Writes an executable shell script standing in for gpg.
#[cfg(all(test, unix))]
pub(crate) fn fake_gpg(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("gpg");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_sits_next_to_artifact() {
        assert_eq!(
            signature_path(Path::new("/bundle/duckdb_jdbc-1.2.3.4.pom")),
            Path::new("/bundle/duckdb_jdbc-1.2.3.4.pom.asc")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_gpg_aborts_signing() {
        let tools = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let artifact = staging.path().join("duckdb_jdbc-1.2.3.4.jar");
        std::fs::write(&artifact, "jar").unwrap();
        let signer = Signer::new(fake_gpg(tools.path(), "echo 'no secret key' >&2; exit 2"));

        let err = signer.sign_detached(&artifact).await.unwrap_err();

        match err {
            Error::ToolFailed { stderr, .. } => assert!(stderr.contains("no secret key")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!signature_path(&artifact).exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn gpg_without_signature_output_is_an_error() {
        let tools = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let artifact = staging.path().join("duckdb_jdbc-1.2.3.4.pom");
        std::fs::write(&artifact, "<project/>").unwrap();
        let signer = Signer::new(fake_gpg(tools.path(), "exit 0"));

        let err = signer.sign_detached(&artifact).await.unwrap_err();

        assert!(matches!(err, Error::MissingArtifact(ref p) if p == &signature_path(&artifact)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn signature_is_written_beside_artifact() {
        let tools = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let artifact = staging.path().join("duckdb_jdbc-1.2.3.4.pom");
        std::fs::write(&artifact, "<project/>").unwrap();
        let signer = Signer::new(fake_gpg(tools.path(), r#"echo signed > "$3.asc""#));

        let signature = signer.sign_detached(&artifact).await.unwrap();

        assert_eq!(signature, signature_path(&artifact));
        assert_eq!(std::fs::read_to_string(signature).unwrap().trim(), "signed");
    }
}
