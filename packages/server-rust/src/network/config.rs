//! Listener configuration for the HTTP edge.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub host: String,
    /// 0 lets the OS pick a port.
    pub port: u16,
    /// Serve HTTPS when set.
    pub tls: Option<TlsConfig>,
    /// Allowed CORS origins. `"*"` allows any origin.
    pub cors_origins: Vec<String>,
    /// Upper bound on handling one request, downstream call included.
    pub request_timeout: Duration,
    /// How long shutdown waits for in-flight requests before giving up.
    pub drain_timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            tls: None,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(60),
            drain_timeout: Duration::from_secs(30),
        }
    }
}

/// PEM certificate and key paths. No `Default`: there is no sensible path.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}
