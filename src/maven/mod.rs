//! Maven artifact pipeline for the JDBC driver.
//!
//! Everything between "CI produced a JAR per platform" and "the release is on
//! Maven Central": version resolution, JAR assembly, POM and documentation
//! generation, signing, digests and upload.

pub mod archive;
pub mod assembler;
pub mod builder;
pub mod credentials;
pub mod docs;
pub mod error;
pub mod git;
pub mod platform;
pub mod pom;
pub mod upload;
pub mod utils;
pub mod version;

pub use builder::{ArtifactBuilder, ArtifactCoordinates, MissingJarPolicy, StagingArea};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use platform::Platform;
pub use version::{ReleaseRef, ReleaseVersion, TagVersion};
