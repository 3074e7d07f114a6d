//! Foundation services: the only layer that sees raw broker failures.
//!
//! 1. **Validation** (`dmx_gatekeeper_core::validation`): violations per operation
//! 2. **Orchestration** (`foundation`): at most one broker call per operation
//! 3. **Classification** (`dmx_gatekeeper_core::classify`): failure -> `FoundationError`
//! 4. **Logging**: exactly one entry per failure, at the error's severity

pub mod foundation;

use async_trait::async_trait;
use dmx_gatekeeper_core::{FoundationError, Resource};
use uuid::Uuid;

pub use foundation::{
    orchestrate, FoundationService, LabCommandService, LabService, LabWorkflowService,
};

use crate::traits::{LoggingBroker, ResourceBroker};

/// Object-safe view of a foundation service, as held by the HTTP edge.
#[async_trait]
pub trait ResourceService<R: Resource>: Send + Sync {
    async fn add(&self, resource: R) -> Result<R, FoundationError>;

    async fn retrieve_by_id(&self, id: Uuid) -> Result<R, FoundationError>;

    async fn retrieve_all(&self) -> Result<Vec<R>, FoundationError>;

    async fn modify(&self, resource: R) -> Result<R, FoundationError>;

    async fn remove(&self, id: Uuid) -> Result<R, FoundationError>;
}

#[async_trait]
impl<R, B, L> ResourceService<R> for FoundationService<R, B, L>
where
    R: Resource,
    B: ResourceBroker<R> + ?Sized + 'static,
    L: LoggingBroker + ?Sized + 'static,
{
    async fn add(&self, resource: R) -> Result<R, FoundationError> {
        FoundationService::add(self, resource).await
    }

    async fn retrieve_by_id(&self, id: Uuid) -> Result<R, FoundationError> {
        FoundationService::retrieve_by_id(self, id).await
    }

    async fn retrieve_all(&self) -> Result<Vec<R>, FoundationError> {
        FoundationService::retrieve_all(self).await
    }

    async fn modify(&self, resource: R) -> Result<R, FoundationError> {
        FoundationService::modify(self, resource).await
    }

    async fn remove(&self, id: Uuid) -> Result<R, FoundationError> {
        FoundationService::remove(self, id).await
    }
}
