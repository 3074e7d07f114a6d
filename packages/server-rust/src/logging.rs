//! Process-wide `tracing` subscriber setup.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Default directive when neither `LogConfig::filter` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "info,dmx_gatekeeper_server=debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, human-readable.
    Pretty,
    /// Single-line, human-readable.
    #[default]
    Compact,
    /// One JSON object per event, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty, compact or json)")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives. Falls back to `RUST_LOG`, then [`DEFAULT_FILTER`].
    pub filter: Option<String>,
    /// Include source file and line in each event.
    pub include_location: bool,
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if the filter directives do not parse or a global
/// subscriber is already installed.
pub fn init_logging(config: LogConfig) -> anyhow::Result<()> {
    let env_filter = match config.filter {
        Some(filter) => EnvFilter::try_new(filter)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    match config.format {
        LogFormat::Pretty => subscriber
            .pretty()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize pretty logger: {e}"))?,
        LogFormat::Compact => subscriber
            .compact()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize compact logger: {e}"))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize JSON logger: {e}"))?,
    }

    tracing::info!(format = ?config.format, "logging initialized");
    Ok(())
}
