//! Artifact digest calculation.
//!
//! Maven repositories expect `.md5`, `.sha1` and `.sha256` siblings next to
//! every published file, each holding the lowercase hex digest and nothing else.

use crate::maven::error::{ErrorExt, Result};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Digest algorithms published for every artifact.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DigestAlgorithm {
    /// MD5
    Md5,
    /// SHA-1
    Sha1,
    /// SHA-256
    Sha256,
}

impl DigestAlgorithm {
    /// Algorithms in the order their sibling files are written.
    pub const ALL: [DigestAlgorithm; 3] = [
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha256,
    ];

    /// File extension appended to the artifact name.
    pub fn extension(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }
}

/// Hex digests of one artifact.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileDigests {
    /// MD5 hex digest (32 characters)
    pub md5: String,
    /// SHA-1 hex digest (40 characters)
    pub sha1: String,
    /// SHA-256 hex digest (64 characters)
    pub sha256: String,
}

impl FileDigests {
    /// Computes all digests over `bytes`.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self {
            md5: format!("{:x}", md5::compute(bytes)),
            sha1: hex::encode(Sha1::digest(bytes)),
            sha256: hex::encode(Sha256::digest(bytes)),
        }
    }

    /// Digest for one algorithm.
    pub fn get(&self, algorithm: DigestAlgorithm) -> &str {
        match algorithm {
            DigestAlgorithm::Md5 => &self.md5,
            DigestAlgorithm::Sha1 => &self.sha1,
            DigestAlgorithm::Sha256 => &self.sha256,
        }
    }
}

/// Reads `path` and computes its digests.
pub async fn calculate_digests(path: &Path) -> Result<FileDigests> {
    let bytes = tokio::fs::read(path)
        .await
        .fs_context("reading file for hash calculation", path)?;
    Ok(FileDigests::of_bytes(&bytes))
}

/// Path of the digest sibling for `artifact`, e.g. `x.jar` → `x.jar.sha1`.
pub fn digest_path(artifact: &Path, algorithm: DigestAlgorithm) -> PathBuf {
    let mut name = artifact.as_os_str().to_os_string();
    name.push(".");
    name.push(algorithm.extension());
    PathBuf::from(name)
}

/// Writes the three digest siblings for `artifact` and returns their paths.
pub async fn write_digest_files(artifact: &Path) -> Result<Vec<PathBuf>> {
    let digests = calculate_digests(artifact).await?;
    let mut written = Vec::with_capacity(DigestAlgorithm::ALL.len());
    for algorithm in DigestAlgorithm::ALL {
        let path = digest_path(artifact, algorithm);
        tokio::fs::write(&path, digests.get(algorithm))
            .await
            .fs_context("writing digest", &path)?;
        written.push(path);
    }
    log::debug!("sha256 {} {}", digests.sha256, artifact.display());
    Ok(written)
}
