//! Recording stubs for unit tests, plus the core crate's resource fixtures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
pub use dmx_gatekeeper_core::fixtures::{
    new_lab, new_lab_command, new_lab_workflow, stored_lab, stored_lab_command,
    stored_lab_workflow,
};
use dmx_gatekeeper_core::models::{Lab, LabCommand, LabWorkflow};
use dmx_gatekeeper_core::{BrokerError, FoundationError, Resource, Severity, TransportError};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::network::{AppState, ResourceServices, ShutdownController};
use crate::service::FoundationService;
use crate::traits::{LoggingBroker, ResourceBroker};

// ---------------------------------------------------------------------------
// Recording stubs
// ---------------------------------------------------------------------------

/// What a [`StubBroker`] does on every call.
#[derive(Debug, Clone)]
pub enum Behavior<R> {
    Succeed(R),
    Fail(TransportError),
    Unexpected(&'static str),
    Panic,
}

/// Broker stub that counts calls and answers with a fixed [`Behavior`].
pub struct StubBroker<R> {
    behavior: Behavior<R>,
    calls: AtomicUsize,
}

impl<R: Resource> StubBroker<R> {
    pub fn new(behavior: Behavior<R>) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self) -> Result<R, BrokerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Succeed(resource) => Ok(resource.clone()),
            Behavior::Fail(cause) => Err(cause.clone().into()),
            Behavior::Unexpected(message) => Err(anyhow::anyhow!(*message).into()),
            Behavior::Panic => panic!("broker stub exploded"),
        }
    }
}

#[async_trait]
impl<R: Resource> ResourceBroker<R> for StubBroker<R> {
    async fn post(&self, _resource: &R) -> Result<R, BrokerError> {
        self.respond()
    }

    async fn get(&self, _id: Uuid) -> Result<R, BrokerError> {
        self.respond()
    }

    async fn get_all(&self) -> Result<Vec<R>, BrokerError> {
        self.respond().map(|resource| vec![resource])
    }

    async fn put(&self, _resource: &R) -> Result<R, BrokerError> {
        self.respond()
    }

    async fn delete(&self, _id: Uuid) -> Result<R, BrokerError> {
        self.respond()
    }
}

/// Logging sink that records every entry with the severity it was logged at.
#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(Severity, FoundationError)>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<(Severity, FoundationError)> {
        self.entries.lock().clone()
    }
}

impl LoggingBroker for RecordingLogger {
    fn log_error(&self, error: &FoundationError) {
        self.entries.lock().push((Severity::Error, error.clone()));
    }

    fn log_critical(&self, error: &FoundationError) {
        self.entries.lock().push((Severity::Critical, error.clone()));
    }
}

/// One stub-backed service per resource type. Only labs vary per test.
pub fn stub_services(labs: Behavior<Lab>) -> ResourceServices {
    let logger = Arc::new(RecordingLogger::default());
    ResourceServices {
        labs: Arc::new(FoundationService::<Lab, _, _>::new(
            Arc::new(StubBroker::new(labs)),
            Arc::clone(&logger),
        )),
        lab_commands: Arc::new(FoundationService::<LabCommand, _, _>::new(
            Arc::new(StubBroker::new(Behavior::Succeed(stored_lab_command()))),
            Arc::clone(&logger),
        )),
        lab_workflows: Arc::new(FoundationService::<LabWorkflow, _, _>::new(
            Arc::new(StubBroker::new(Behavior::Succeed(stored_lab_workflow()))),
            logger,
        )),
    }
}

/// Handler state over succeeding stubs.
pub fn stub_state() -> AppState {
    let services = stub_services(Behavior::Succeed(stored_lab()));
    AppState {
        labs: services.labs,
        lab_commands: services.lab_commands,
        lab_workflows: services.lab_workflows,
        shutdown: Arc::new(ShutdownController::new()),
        start_time: Instant::now(),
    }
}
