//! Maps every failure a foundation operation can observe onto the closed
//! error taxonomy.
//!
//! Priority is fixed: an already-classified validation error passes through
//! untouched, then transport outcomes are matched by variant, and anything
//! left over is a gateway fault.

use crate::error::{
    DependencyValidationFailure, FoundationError, FoundationErrorKind, OperationKind,
    ServiceFault,
};
use crate::resource::ResourceKind;
use crate::transport::{BrokerError, TransportError};

/// Everything the classifier accepts.
#[derive(Debug)]
pub enum Failure {
    /// An error some layer already classified.
    Classified(FoundationError),
    /// A failure the broker mapped to a transport outcome.
    Transport(TransportError),
    /// Anything else: unexpected broker errors and caught panics.
    Unexpected(ServiceFault),
}

impl From<BrokerError> for Failure {
    fn from(err: BrokerError) -> Self {
        match err {
            BrokerError::Transport(cause) => Self::Transport(cause),
            BrokerError::Unexpected(cause) => Self::Unexpected(ServiceFault::new(cause)),
        }
    }
}

impl From<FoundationError> for Failure {
    fn from(err: FoundationError) -> Self {
        Self::Classified(err)
    }
}

impl From<TransportError> for Failure {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

/// Classifies `failure` as the outcome of `operation` on `resource`.
#[must_use]
pub fn classify(
    failure: Failure,
    resource: ResourceKind,
    operation: OperationKind,
) -> FoundationError {
    let kind = match failure {
        Failure::Classified(err) => match err.kind {
            FoundationErrorKind::Validation(_) | FoundationErrorKind::DependencyValidation(_) => {
                return err;
            }
            // A dependency or service error arriving from another layer was
            // not anticipated by this one.
            FoundationErrorKind::Dependency(_) | FoundationErrorKind::Service(_) => {
                FoundationErrorKind::Service(ServiceFault::new(anyhow::Error::new(err)))
            }
        },
        Failure::Transport(cause) => classify_transport(cause),
        Failure::Unexpected(fault) => FoundationErrorKind::Service(fault),
    };
    FoundationError::new(resource, operation, kind)
}

fn classify_transport(cause: TransportError) -> FoundationErrorKind {
    match cause {
        TransportError::BadRequest { ref errors, .. } => {
            let violations = errors.clone();
            FoundationErrorKind::DependencyValidation(DependencyValidationFailure::Invalid {
                cause,
                violations,
            })
        }
        TransportError::NotFound { .. } => {
            FoundationErrorKind::DependencyValidation(DependencyValidationFailure::NotFound {
                cause,
            })
        }
        // Severity is derived from the cause; critical and non-critical
        // transport failures share the category.
        TransportError::Connectivity { .. }
        | TransportError::Unauthorized { .. }
        | TransportError::Forbidden { .. }
        | TransportError::UrlNotFound { .. }
        | TransportError::Status { .. }
        | TransportError::Serialization { .. } => FoundationErrorKind::Dependency(cause),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::{ErrorCategory, Severity};
    use crate::violations::Violations;

    fn classify_lab_add(failure: impl Into<Failure>) -> FoundationError {
        classify(failure.into(), ResourceKind::Lab, OperationKind::Add)
    }

    #[test]
    fn bad_request_keeps_field_errors_unmodified() {
        let errors: Violations = [("Name", "Name already taken"), ("Name", "Name too long")]
            .into_iter()
            .collect();
        let err = classify_lab_add(TransportError::BadRequest {
            message: "one or more validation errors occurred".into(),
            errors: errors.clone(),
        });

        assert_eq!(err.category(), ErrorCategory::DependencyValidation);
        assert_eq!(err.severity(), Severity::Error);
        assert_eq!(err.violations(), Some(&errors));
    }

    #[test]
    fn not_found_is_dependency_validation() {
        let err = classify(
            TransportError::NotFound {
                message: "no such command".into(),
            }
            .into(),
            ResourceKind::LabCommand,
            OperationKind::Modify,
        );

        assert!(err.is_not_found());
        assert_eq!(err.qualified_name(), "LabCommandDependencyValidationError");
        assert_eq!(err.operation, OperationKind::Modify);
    }

    #[test]
    fn unreachable_or_refused_dependency_is_critical() {
        for cause in [
            TransportError::Connectivity { message: "connection refused".into() },
            TransportError::Unauthorized { message: String::new() },
            TransportError::Forbidden { message: String::new() },
            TransportError::UrlNotFound { url: "http://dmx/api/labs".into() },
        ] {
            let err = classify_lab_add(cause.clone());
            assert_eq!(err.category(), ErrorCategory::Dependency);
            assert_eq!(err.severity(), Severity::Critical);
            assert_eq!(err.kind, FoundationErrorKind::Dependency(cause));
        }
    }

    #[test]
    fn other_transport_failures_are_plain_dependency_errors() {
        for cause in [
            TransportError::Status { status: 500, message: "boom".into() },
            TransportError::Serialization { message: "expected value".into() },
        ] {
            let err = classify_lab_add(cause);
            assert_eq!(err.category(), ErrorCategory::Dependency);
            assert_eq!(err.severity(), Severity::Error);
        }
    }

    #[test]
    fn unexpected_broker_errors_are_service_errors() {
        let err = classify_lab_add(BrokerError::Unexpected(anyhow::anyhow!("null reference")));
        assert_eq!(err.category(), ErrorCategory::Service);
        assert_eq!(err.severity(), Severity::Error);
        assert_eq!(err.qualified_name(), "LabServiceError");
    }

    #[test]
    fn classified_validation_errors_pass_through() {
        let violations: Violations = [("Name", "Name is required")].into_iter().collect();
        let original = FoundationError::validation(
            ResourceKind::LabWorkflow,
            OperationKind::Add,
            violations,
        );

        // Tags of the original survive even when reclassified under others.
        let again = classify(original.clone().into(), ResourceKind::Lab, OperationKind::Remove);
        assert_eq!(again, original);
    }

    #[test]
    fn classified_dependency_errors_become_service_errors() {
        let dependency = classify_lab_add(TransportError::Status {
            status: 502,
            message: String::new(),
        });
        let err = classify_lab_add(dependency);
        assert_eq!(err.category(), ErrorCategory::Service);
        assert_eq!(err.severity(), Severity::Error);
    }

    fn transport_error() -> impl Strategy<Value = TransportError> {
        let text = "[a-z ]{0,12}";
        prop_oneof![
            text.prop_map(|message| TransportError::Connectivity { message }),
            text.prop_map(|message| TransportError::Unauthorized { message }),
            text.prop_map(|message| TransportError::Forbidden { message }),
            text.prop_map(|url| TransportError::UrlNotFound { url }),
            text.prop_map(|message| TransportError::NotFound { message }),
            (text, "[A-Z][a-z]{0,6}", text).prop_map(|(message, field, msg)| {
                TransportError::BadRequest {
                    message,
                    errors: [(field, msg)].into_iter().collect(),
                }
            }),
            (400u16..600, text).prop_map(|(status, message)| TransportError::Status {
                status,
                message,
            }),
            text.prop_map(|message| TransportError::Serialization { message }),
        ]
    }

    proptest! {
        #[test]
        fn classification_of_dependency_validation_is_identity(cause in transport_error()) {
            let first = classify_lab_add(cause);
            if first.category() == ErrorCategory::DependencyValidation {
                let second = classify(first.clone().into(), ResourceKind::LabCommand, OperationKind::RetrieveAll);
                prop_assert_eq!(second, first);
            }
        }

        #[test]
        fn critical_severity_tracks_cause(cause in transport_error()) {
            let critical = cause.is_critical();
            let err = classify_lab_add(cause);
            prop_assert_eq!(err.severity() == Severity::Critical, critical);
            if critical {
                prop_assert_eq!(err.category(), ErrorCategory::Dependency);
            }
        }
    }
}
