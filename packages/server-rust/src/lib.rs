//! DMX Gatekeeper server: foundation services for labs, lab commands, and
//! lab workflows, the downstream DMX API broker, and the authenticated HTTP
//! edge in front of them.

pub mod brokers;
pub mod config;
pub mod logging;
pub mod network;
pub mod service;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use brokers::{DmxApiBroker, TracingLoggingBroker};
pub use config::{AuthConfig, DownstreamConfig, GatekeeperConfig};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use network::{NetworkModule, ResourceServices};
pub use service::{
    FoundationService, LabCommandService, LabService, LabWorkflowService, ResourceService,
};
pub use traits::{LoggingBroker, ResourceBroker};
