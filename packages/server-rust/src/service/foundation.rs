//! Generic foundation service: validate, call the broker once, classify and
//! log any failure exactly once.

use std::future::Future;
use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use dmx_gatekeeper_core::models::{Lab, LabCommand, LabWorkflow};
use dmx_gatekeeper_core::validation;
use dmx_gatekeeper_core::{
    classify, BrokerError, Failure, FoundationError, OperationKind, Resource, ResourceKind,
    ServiceFault, Severity, Violations,
};
use futures_util::FutureExt;
use uuid::Uuid;

use crate::brokers::{DmxApiBroker, TracingLoggingBroker};
use crate::traits::{LoggingBroker, ResourceBroker};

/// Runs one foundation operation.
///
/// A non-empty `violations` set fails the operation with a validation error
/// before `call` is ever invoked. Otherwise `call` runs once; a panic inside
/// it is caught and treated as a service fault. Success is returned verbatim
/// without touching `logging`. Every failure is classified, logged exactly
/// once at its severity, and returned.
///
/// # Errors
///
/// Returns the classified [`FoundationError`] for any failure.
pub async fn orchestrate<T, L, F, Fut>(
    logging: &L,
    resource: ResourceKind,
    operation: OperationKind,
    violations: Violations,
    call: F,
) -> Result<T, FoundationError>
where
    L: LoggingBroker + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, BrokerError>>,
{
    let failure = if violations.is_empty() {
        match AssertUnwindSafe(async move { call().await })
            .catch_unwind()
            .await
        {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => Failure::from(err),
            Err(payload) => Failure::Unexpected(ServiceFault::from_panic(payload)),
        }
    } else {
        Failure::Classified(FoundationError::validation(resource, operation, violations))
    };

    let err = classify(failure, resource, operation);
    match err.severity() {
        Severity::Critical => logging.log_critical(&err),
        Severity::Error => logging.log_error(&err),
    }
    Err(err)
}

/// The five foundation operations for one resource type.
///
/// Holds only shared handles to stateless brokers, so clones are cheap and
/// concurrent calls never contend.
pub struct FoundationService<R, B: ?Sized, L: ?Sized> {
    broker: Arc<B>,
    logging: Arc<L>,
    _resource: PhantomData<fn() -> R>,
}

pub type LabService<B = DmxApiBroker, L = TracingLoggingBroker> = FoundationService<Lab, B, L>;
pub type LabCommandService<B = DmxApiBroker, L = TracingLoggingBroker> =
    FoundationService<LabCommand, B, L>;
pub type LabWorkflowService<B = DmxApiBroker, L = TracingLoggingBroker> =
    FoundationService<LabWorkflow, B, L>;

impl<R, B: ?Sized, L: ?Sized> Clone for FoundationService<R, B, L> {
    fn clone(&self) -> Self {
        Self {
            broker: Arc::clone(&self.broker),
            logging: Arc::clone(&self.logging),
            _resource: PhantomData,
        }
    }
}

impl<R, B, L> FoundationService<R, B, L>
where
    R: Resource,
    B: ResourceBroker<R> + ?Sized,
    L: LoggingBroker + ?Sized,
{
    #[must_use]
    pub fn new(broker: Arc<B>, logging: Arc<L>) -> Self {
        Self {
            broker,
            logging,
            _resource: PhantomData,
        }
    }

    /// Creates `resource` downstream. The identifier must not be set.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; see [`orchestrate`].
    pub async fn add(&self, resource: R) -> Result<R, FoundationError> {
        let violations = validation::on_add(&resource);
        orchestrate(&*self.logging, R::KIND, OperationKind::Add, violations, || {
            self.broker.post(&resource)
        })
        .await
    }

    /// # Errors
    ///
    /// Returns the classified failure; see [`orchestrate`].
    pub async fn retrieve_by_id(&self, id: Uuid) -> Result<R, FoundationError> {
        let violations = validation::on_id(id);
        orchestrate(&*self.logging, R::KIND, OperationKind::RetrieveById, violations, || {
            self.broker.get(id)
        })
        .await
    }

    /// # Errors
    ///
    /// Returns the classified failure; see [`orchestrate`].
    pub async fn retrieve_all(&self) -> Result<Vec<R>, FoundationError> {
        orchestrate(
            &*self.logging,
            R::KIND,
            OperationKind::RetrieveAll,
            Violations::new(),
            || self.broker.get_all(),
        )
        .await
    }

    /// Replaces `resource` downstream. The identifier must be set.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; see [`orchestrate`].
    pub async fn modify(&self, resource: R) -> Result<R, FoundationError> {
        let violations = validation::on_modify(&resource);
        orchestrate(&*self.logging, R::KIND, OperationKind::Modify, violations, || {
            self.broker.put(&resource)
        })
        .await
    }

    /// # Errors
    ///
    /// Returns the classified failure; see [`orchestrate`].
    pub async fn remove(&self, id: Uuid) -> Result<R, FoundationError> {
        let violations = validation::on_id(id);
        orchestrate(&*self.logging, R::KIND, OperationKind::Remove, violations, || {
            self.broker.delete(id)
        })
        .await
    }
}
