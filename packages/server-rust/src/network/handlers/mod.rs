//! HTTP handlers and the shared state they extract.

pub mod error;
pub mod health;
pub mod resources;

pub use error::ApiError;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use resources::{
    delete_resource, get_all_resources, get_resource, post_resource, put_resource,
};

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use dmx_gatekeeper_core::models::{Lab, LabCommand, LabWorkflow};

use super::ShutdownController;
use crate::service::ResourceService;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Every field is an `Arc` (or `Copy`), so cloning per request is cheap.
/// Resource handlers extract only the service they need through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub labs: Arc<dyn ResourceService<Lab>>,
    pub lab_commands: Arc<dyn ResourceService<LabCommand>>,
    pub lab_workflows: Arc<dyn ResourceService<LabWorkflow>>,
    pub shutdown: Arc<ShutdownController>,
    /// Process start, for uptime reporting.
    pub start_time: Instant,
}

impl FromRef<AppState> for Arc<dyn ResourceService<Lab>> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.labs)
    }
}

impl FromRef<AppState> for Arc<dyn ResourceService<LabCommand>> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.lab_commands)
    }
}

impl FromRef<AppState> for Arc<dyn ResourceService<LabWorkflow>> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.lab_workflows)
    }
}
