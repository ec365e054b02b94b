//! IMDSv2 instance metadata client
//!
//! Talks to the link-local instance metadata endpoint. Every read first
//! obtains a session token (IMDSv2), then fetches the requested path with
//! the token attached. Tokens are not cached; one disco run makes only a
//! handful of metadata reads.

use async_trait::async_trait;
use disco_core::error::{Error, Result};
use disco_core::traits::MetadataApi;
use disco_core::types::AddressKind;
use serde::Deserialize;
use std::time::Duration;

/// Link-local metadata endpoint
const DEFAULT_IMDS_BASE: &str = "http://169.254.169.254";

/// Session token lifetime requested from the endpoint
const TOKEN_TTL_SECS: &str = "21600";

/// HTTP timeout for metadata requests
const IMDS_TIMEOUT: Duration = Duration::from_secs(10);

/// The region field of the instance identity document
#[derive(Debug, Deserialize)]
struct IdentityDocument {
    region: String,
}

/// IMDSv2 client implementing [`MetadataApi`]
pub struct ImdsClient {
    base: String,
    client: reqwest::Client,
}

impl Default for ImdsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ImdsClient {
    pub fn new() -> Self {
        Self::with_base(DEFAULT_IMDS_BASE)
    }

    /// Point the client at a different endpoint, for local stubs
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            client: reqwest::Client::builder()
                .timeout(IMDS_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    async fn session_token(&self) -> Result<String> {
        let response = self
            .client
            .put(format!("{}/latest/api/token", self.base))
            .header("X-aws-ec2-metadata-token-ttl-seconds", TOKEN_TTL_SECS)
            .send()
            .await
            .map_err(|e| Error::metadata(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::metadata(format!(
                "token request returned {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::metadata(format!("unable to read token: {e}")))
    }

    async fn fetch(&self, path: &str) -> Result<String> {
        let token = self.session_token().await?;
        let response = self
            .client
            .get(format!("{}/{}", self.base, path))
            .header("X-aws-ec2-metadata-token", token)
            .send()
            .await
            .map_err(|e| Error::metadata(format!("metadata request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::metadata(format!(
                "metadata path {path} returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::metadata(format!("unable to read metadata response: {e}")))?;
        Ok(body.trim().to_string())
    }
}

/// Metadata path for an address kind
fn address_path(kind: AddressKind) -> &'static str {
    match kind {
        AddressKind::PrivateIp => "latest/meta-data/local-ipv4",
        AddressKind::PublicIp => "latest/meta-data/public-ipv4",
        AddressKind::PrivateDns => "latest/meta-data/local-hostname",
        AddressKind::PublicDns => "latest/meta-data/public-hostname",
    }
}

#[async_trait]
impl MetadataApi for ImdsClient {
    async fn instance_id(&self) -> Result<String> {
        self.fetch("latest/meta-data/instance-id").await
    }

    async fn region(&self) -> Result<String> {
        let body = self
            .fetch("latest/dynamic/instance-identity/document")
            .await?;
        let document: IdentityDocument = serde_json::from_str(&body)
            .map_err(|e| Error::metadata(format!("malformed identity document: {e}")))?;
        Ok(document.region)
    }

    async fn address(&self, kind: AddressKind) -> Result<String> {
        let value = self.fetch(address_path(kind)).await?;
        if value.is_empty() {
            return Err(Error::metadata(format!("metadata has no {kind} field")));
        }
        Ok(value)
    }
}
