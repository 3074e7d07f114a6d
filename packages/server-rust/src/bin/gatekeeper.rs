//! DMX Gatekeeper binary.
//!
//! Every flag falls back to an environment variable so the same image runs
//! unchanged across environments.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use dmx_gatekeeper_server::network::{NetworkConfig, TlsConfig};
use dmx_gatekeeper_server::{
    init_logging, AuthConfig, DmxApiBroker, DownstreamConfig, GatekeeperConfig, LogConfig,
    LogFormat, NetworkModule, ResourceServices, TracingLoggingBroker,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "dmx-gatekeeper")]
#[command(about = "Authenticated gateway in front of the DMX core API", long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, env = "GATEKEEPER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind
    #[arg(short, long, env = "GATEKEEPER_PORT", default_value_t = 8080)]
    port: u16,

    /// PEM certificate; serves HTTPS together with --tls-key
    #[arg(long, env = "GATEKEEPER_TLS_CERT", requires = "tls_key")]
    tls_cert: Option<PathBuf>,

    /// PEM private key
    #[arg(long, env = "GATEKEEPER_TLS_KEY", requires = "tls_cert")]
    tls_key: Option<PathBuf>,

    /// Base URL of the DMX core API
    #[arg(long, env = "DMX_API_URL", default_value = "http://localhost:5000")]
    dmx_api_url: String,

    /// Access key sent to the DMX core API
    #[arg(long, env = "DMX_API_ACCESS_KEY", hide_env_values = true)]
    dmx_api_access_key: Option<String>,

    /// Downstream request timeout in milliseconds
    #[arg(long, env = "DMX_API_TIMEOUT_MS", default_value_t = 30_000)]
    dmx_api_timeout_ms: u64,

    /// HS256 secret used to verify bearer tokens
    #[arg(long, env = "GATEKEEPER_AUTH_SECRET", hide_env_values = true)]
    auth_secret: Option<String>,

    /// Expected token audience
    #[arg(long, env = "GATEKEEPER_AUTH_AUDIENCE")]
    auth_audience: Option<String>,

    /// Scopes granting read access, comma or space separated
    #[arg(long, env = "GATEKEEPER_READ_SCOPES", default_value = "")]
    read_scopes: String,

    /// Scopes granting write access, comma or space separated
    #[arg(long, env = "GATEKEEPER_WRITE_SCOPES", default_value = "")]
    write_scopes: String,

    /// Accept requests without a token (development only)
    #[arg(long, env = "GATEKEEPER_ALLOW_ANONYMOUS")]
    allow_anonymous: bool,

    /// Log format: pretty, compact or json
    #[arg(long, env = "GATEKEEPER_LOG_FORMAT", default_value = "compact")]
    log_format: LogFormat,
}

fn split_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|scope| !scope.is_empty())
        .map(str::to_string)
        .collect()
}

impl Args {
    fn into_config(self) -> GatekeeperConfig {
        let tls = match (self.tls_cert, self.tls_key) {
            (Some(cert_path), Some(key_path)) => Some(TlsConfig {
                cert_path,
                key_path,
            }),
            _ => None,
        };

        GatekeeperConfig {
            network: NetworkConfig {
                host: self.host,
                port: self.port,
                tls,
                ..NetworkConfig::default()
            },
            downstream: DownstreamConfig {
                base_url: self.dmx_api_url,
                access_key: self.dmx_api_access_key,
                timeout: Duration::from_millis(self.dmx_api_timeout_ms),
            },
            auth: AuthConfig {
                secret: self.auth_secret,
                audience: self.auth_audience,
                read_scopes: split_scopes(&self.read_scopes),
                write_scopes: split_scopes(&self.write_scopes),
                allow_anonymous: self.allow_anonymous,
            },
            log: LogConfig {
                format: self.log_format,
                ..LogConfig::default()
            },
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config();
    config.validate()?;
    init_logging(config.log.clone())?;

    info!(downstream = %config.downstream.base_url, "Starting DMX Gatekeeper");
    if config.auth.allow_anonymous {
        tracing::warn!("Anonymous access is enabled; tokens are not checked");
    }

    let broker = Arc::new(DmxApiBroker::new(&config.downstream)?);
    let logging = Arc::new(TracingLoggingBroker);
    let services = ResourceServices::from_brokers(&broker, &logging);

    let mut module = NetworkModule::new(config.network, config.auth, services);
    let port = module.start().await?;
    info!(port, "DMX Gatekeeper listening");

    module.serve(shutdown_signal()).await?;
    info!("DMX Gatekeeper stopped");
    Ok(())
}
