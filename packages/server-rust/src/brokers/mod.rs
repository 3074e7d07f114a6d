//! Broker implementations: the downstream API transport and the logging sink.

pub mod dmx_api;
pub mod logging;

pub use dmx_api::DmxApiBroker;
pub use logging::TracingLoggingBroker;
