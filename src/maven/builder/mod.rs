//! Artifact staging, signing and bundle orchestration.
//!
//! The builder:
//! 1. Stages the POM and every JAR for one version ([`ArtifactBuilder`])
//! 2. Copies them into the Central repository layout
//! 3. Signs each file and writes md5/sha1/sha256 siblings
//! 4. Zips the layout into the upload bundle
//!
//! # Module Organization
//!
//! - [`checksum`] - Digest sibling files
//! - [`orchestrator`] - [`ArtifactBuilder`], [`StagingArea`] and bundle layout
//! - [`signing`] - Detached GPG signatures
//! - [`tool_detection`] - External tool availability checking

pub mod checksum;
pub mod orchestrator;
pub mod signing;
pub mod tool_detection;

pub use orchestrator::{
    ArtifactBuilder, ArtifactCoordinates, ArtifactKind, MissingJarPolicy, StagedArtifact,
    StagingArea, write_central_bundle,
};
pub use signing::Signer;
