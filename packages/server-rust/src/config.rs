//! Top-level configuration for the gatekeeper process.

use std::time::Duration;

use crate::logging::LogConfig;
use crate::network::NetworkConfig;

/// Everything the gatekeeper needs to start.
#[derive(Debug, Clone, Default)]
pub struct GatekeeperConfig {
    pub network: NetworkConfig,
    pub downstream: DownstreamConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
}

impl GatekeeperConfig {
    /// Rejects configurations the process cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error if the downstream URL is empty, or if authentication
    /// is enabled without a signing secret.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.downstream.base_url.trim().is_empty() {
            anyhow::bail!("downstream API base URL must not be empty");
        }
        if !self.auth.allow_anonymous && self.auth.secret.as_deref().unwrap_or_default().is_empty() {
            anyhow::bail!("an auth secret is required unless anonymous access is allowed");
        }
        if self.downstream.timeout.is_zero() {
            anyhow::bail!("downstream API timeout must be greater than zero");
        }
        Ok(())
    }
}

/// Where and how to reach the DMX core API.
#[derive(Debug, Clone)]
pub struct DownstreamConfig {
    /// Base URL, e.g. `https://dmx-core.example.net`. A trailing slash is ignored.
    pub base_url: String,
    /// Sent as the `x-access-key` header on every request when present.
    pub access_key: Option<String>,
    /// Whole-request timeout. Expiry surfaces as a connectivity failure.
    pub timeout: Duration,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            access_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Bearer-token validation at the HTTP edge.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// HS256 shared secret used to verify tokens.
    pub secret: Option<String>,
    /// Expected `aud` claim. Not checked when `None`.
    pub audience: Option<String>,
    /// Scopes granting read-only access. Any one suffices.
    pub read_scopes: Vec<String>,
    /// Scopes granting read-write access. Any one suffices.
    pub write_scopes: Vec<String>,
    /// Skips token validation entirely. Development only.
    pub allow_anonymous: bool,
}
