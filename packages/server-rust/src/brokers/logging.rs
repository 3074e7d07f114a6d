//! `tracing`-backed logging sink for classified errors.

use std::error::Error;
use std::fmt::Write as _;

use dmx_gatekeeper_core::FoundationError;
use tracing::error;

use crate::traits::LoggingBroker;

/// Emits one `tracing` error event per classified failure.
///
/// `tracing` has no level above `ERROR`, so critical entries are error
/// events tagged `severity = "critical"` for alerting rules to match on.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLoggingBroker;

impl LoggingBroker for TracingLoggingBroker {
    fn log_error(&self, err: &FoundationError) {
        error!(
            resource = %err.resource,
            operation = %err.operation,
            category = %err.category(),
            error = %err.qualified_name(),
            cause = %cause_chain(err),
            "{}",
            err.kind
        );
    }

    fn log_critical(&self, err: &FoundationError) {
        error!(
            severity = "critical",
            resource = %err.resource,
            operation = %err.operation,
            category = %err.category(),
            error = %err.qualified_name(),
            cause = %cause_chain(err),
            "{}",
            err.kind
        );
    }
}

/// Renders the `source()` chain below the error's own category, joined by `": "`.
fn cause_chain(err: &FoundationError) -> String {
    let mut rendered = String::new();
    let mut next = err.kind.source();
    while let Some(cause) = next {
        if !rendered.is_empty() {
            rendered.push_str(": ");
        }
        let _ = write!(rendered, "{cause}");
        next = cause.source();
    }
    rendered
}
