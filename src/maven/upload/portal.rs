//! Sonatype Central Portal bundle upload.
//!
//! See <https://central.sonatype.org/publish/publish-portal-api/>. A release
//! is published by POSTing one ZIP bundle in repository layout; the portal
//! validates it and, for automatic publishing, releases it to Maven Central.

use crate::maven::credentials::Credentials;
use crate::maven::error::{Error, ErrorExt, Result};
use reqwest::multipart::{Form, Part};
use std::path::Path;

/// Portal endpoint accepting bundle uploads.
pub const PORTAL_UPLOAD_URL: &str = "https://central.sonatype.com/api/v1/publisher/upload";

/// How the portal should proceed once the bundle validates.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default, clap::ValueEnum)]
pub enum PublishingType {
    /// Release to Maven Central as soon as validation passes
    #[default]
    Automatic,
    /// Wait for a manual release in the portal UI
    UserManaged,
}

impl PublishingType {
    /// Value of the `publishingType` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            PublishingType::Automatic => "AUTOMATIC",
            PublishingType::UserManaged => "USER_MANAGED",
        }
    }
}

/// Authenticated client for the portal upload endpoint.
pub struct PortalClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl std::fmt::Debug for PortalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl PortalClient {
    /// Creates a client posting to `endpoint` with a bearer token derived from `credentials`.
    pub fn new(endpoint: impl Into<String>, credentials: &Credentials) -> Self {
        Self::with_http_client(reqwest::Client::new(), endpoint, credentials)
    }

    /// Same as [`PortalClient::new`] with a preconfigured HTTP client.
    pub fn with_http_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        credentials: &Credentials,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: credentials.bearer_token(),
        }
    }

    /// Uploads `bundle` as deployment `name` and returns the portal's response body
    /// (the deployment id).
    ///
    /// Any non-success status is fatal; there is no retry.
    pub async fn upload_bundle(
        &self,
        bundle: &Path,
        name: &str,
        publishing_type: PublishingType,
    ) -> Result<String> {
        let bytes = tokio::fs::read(bundle)
            .await
            .fs_context("reading upload bundle", bundle)?;
        let file_name = bundle
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "central-bundle.zip".to_string());

        log::info!(
            "Uploading {} ({} bytes) to {}",
            bundle.display(),
            bytes.len(),
            self.endpoint
        );

        let form = Form::new()
            .text("name", name.to_string())
            .text("publishingType", publishing_type.as_str())
            .part(
                "bundle",
                Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("application/octet-stream")?,
            );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Upload {
                status: status.as_u16(),
                body,
            });
        }

        log::info!("✓ Portal accepted deployment {}", body.trim());
        Ok(body.trim().to_string())
    }
}
