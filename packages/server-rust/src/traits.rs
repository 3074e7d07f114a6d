use async_trait::async_trait;
use dmx_gatekeeper_core::{BrokerError, FoundationError, Resource};
use uuid::Uuid;

/// Transport to the downstream DMX core API for one resource type.
///
/// Implementations map every HTTP outcome onto a `TransportError` and
/// report anything else as `BrokerError::Unexpected`. Brokers hold no
/// per-call state.
/// Implementations: `DmxApiBroker` (reqwest), recording stubs (tests).
#[async_trait]
pub trait ResourceBroker<R: Resource>: Send + Sync {
    /// Create a resource. Returns the stored resource as the API echoes it.
    async fn post(&self, resource: &R) -> Result<R, BrokerError>;

    /// Fetch one resource by identifier.
    async fn get(&self, id: Uuid) -> Result<R, BrokerError>;

    /// Fetch every resource in the collection.
    async fn get_all(&self) -> Result<Vec<R>, BrokerError>;

    /// Replace a resource. The identifier travels inside the body.
    async fn put(&self, resource: &R) -> Result<R, BrokerError>;

    /// Delete a resource by identifier. Returns the removed resource.
    async fn delete(&self, id: Uuid) -> Result<R, BrokerError>;
}

/// Sink for classified errors. Infallible: logging never fails an operation.
pub trait LoggingBroker: Send + Sync {
    fn log_error(&self, error: &FoundationError);

    fn log_critical(&self, error: &FoundationError);
}
