//! The foundation-layer error taxonomy.
//!
//! Every failure surfacing from a foundation service is a [`FoundationError`]:
//! the resource and operation that produced it plus exactly one of four
//! categories, each wrapping the original cause so `source()` walks back to
//! what the broker (or validation stage) actually reported.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::resource::ResourceKind;
use crate::transport::TransportError;
use crate::violations::Violations;

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// The five operation shapes every resource type supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Add,
    RetrieveById,
    RetrieveAll,
    Modify,
    Remove,
}

impl OperationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::RetrieveById => "retrieve_by_id",
            Self::RetrieveAll => "retrieve_all",
            Self::Modify => "modify",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Input rejected by the gateway before any downstream call.
    Validation,
    /// Input rejected by the downstream API, or the target resource is absent.
    DependencyValidation,
    /// The downstream API is unreachable, refused the gateway, or failed.
    Dependency,
    /// A fault inside the gateway itself.
    Service,
}

impl ErrorCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::DependencyValidation => "dependency_validation",
            Self::Dependency => "dependency",
            Self::Service => "service",
        }
    }

    fn type_suffix(self) -> &'static str {
        match self {
            Self::Validation => "ValidationError",
            Self::DependencyValidation => "DependencyValidationError",
            Self::Dependency => "DependencyError",
            Self::Service => "ServiceError",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity a classified error is logged at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Critical,
}

// ---------------------------------------------------------------------------
// Inner causes
// ---------------------------------------------------------------------------

/// The validation stage rejected the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid input: {violations}")]
pub struct InvalidResource {
    pub violations: Violations,
}

/// The downstream API rejected the input or could not find its target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DependencyValidationFailure {
    #[error("invalid input reported by the downstream API: {violations}")]
    Invalid {
        #[source]
        cause: TransportError,
        violations: Violations,
    },
    #[error("resource not found")]
    NotFound {
        #[source]
        cause: TransportError,
    },
}

/// An unanticipated fault: an error the broker did not classify as a
/// transport outcome, or a panic caught around the broker call.
///
/// Holds the original error behind an `Arc` so classified errors stay
/// cheaply cloneable while keeping the full chain for diagnostics.
#[derive(Debug, Clone)]
pub struct ServiceFault(Arc<anyhow::Error>);

impl ServiceFault {
    #[must_use]
    pub fn new(error: anyhow::Error) -> Self {
        Self(Arc::new(error))
    }

    /// Builds a fault from the payload of a caught panic.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::new(anyhow::anyhow!("panicked: {message}"))
    }

    #[must_use]
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl fmt::Display for ServiceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ServiceFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl PartialEq for ServiceFault {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || format!("{:#}", self.0) == format!("{:#}", other.0)
    }
}

// ---------------------------------------------------------------------------
// FoundationError
// ---------------------------------------------------------------------------

/// Category plus wrapped cause.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FoundationErrorKind {
    #[error("validation error occurred, fix the errors and try again")]
    Validation(#[source] InvalidResource),
    #[error("dependency validation error occurred, fix the errors and try again")]
    DependencyValidation(#[source] DependencyValidationFailure),
    #[error("dependency error occurred, contact support")]
    Dependency(#[source] TransportError),
    #[error("service error occurred, contact support")]
    Service(#[source] ServiceFault),
}

/// A classified failure of one foundation-service operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{resource} {operation}: {kind}")]
pub struct FoundationError {
    pub resource: ResourceKind,
    pub operation: OperationKind,
    #[source]
    pub kind: FoundationErrorKind,
}

impl FoundationError {
    #[must_use]
    pub fn new(resource: ResourceKind, operation: OperationKind, kind: FoundationErrorKind) -> Self {
        Self {
            resource,
            operation,
            kind,
        }
    }

    #[must_use]
    pub fn validation(
        resource: ResourceKind,
        operation: OperationKind,
        violations: Violations,
    ) -> Self {
        Self::new(
            resource,
            operation,
            FoundationErrorKind::Validation(InvalidResource { violations }),
        )
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self.kind {
            FoundationErrorKind::Validation(_) => ErrorCategory::Validation,
            FoundationErrorKind::DependencyValidation(_) => ErrorCategory::DependencyValidation,
            FoundationErrorKind::Dependency(_) => ErrorCategory::Dependency,
            FoundationErrorKind::Service(_) => ErrorCategory::Service,
        }
    }

    /// `Critical` only for dependency failures that mean the downstream API
    /// cannot be used at all; everything else is `Error`.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match &self.kind {
            FoundationErrorKind::Dependency(cause) if cause.is_critical() => Severity::Critical,
            _ => Severity::Error,
        }
    }

    /// Stable, searchable name such as `LabDependencyValidationError`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}{}", self.resource, self.category().type_suffix())
    }

    /// Field errors carried by the error, from either side of the boundary.
    #[must_use]
    pub fn violations(&self) -> Option<&Violations> {
        match &self.kind {
            FoundationErrorKind::Validation(InvalidResource { violations })
            | FoundationErrorKind::DependencyValidation(DependencyValidationFailure::Invalid {
                violations,
                ..
            }) => Some(violations),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            FoundationErrorKind::DependencyValidation(DependencyValidationFailure::NotFound { .. })
        )
    }
}
