//! Publishing staged artifacts.
//!
//! - [`portal`] - release bundles to the Sonatype Central Portal
//! - [`snapshot`] - snapshot artifacts through the Maven deploy plugin

pub mod portal;
pub mod snapshot;

pub use portal::{PORTAL_UPLOAD_URL, PortalClient, PublishingType};
pub use snapshot::{DeployRequest, SNAPSHOT_REPO_URL, SnapshotDeployer, write_settings_xml};
