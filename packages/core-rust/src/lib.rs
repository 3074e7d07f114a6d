//! DMX Gatekeeper core: lab resource models, validation rules, and the
//! classifier that maps transport failures onto foundation errors.

pub mod classify;
pub mod error;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
pub mod models;
pub mod resource;
pub mod transport;
pub mod validation;
pub mod violations;

pub use classify::{classify, Failure};
pub use error::{
    DependencyValidationFailure, ErrorCategory, FoundationError, FoundationErrorKind,
    InvalidResource, OperationKind, ServiceFault, Severity,
};
pub use models::{Lab, LabCommand, LabDevice, LabWorkflow};
pub use resource::{Resource, ResourceKind};
pub use transport::{BrokerError, TransportError};
pub use validation::Validate;
pub use violations::Violations;
