//! The `Resource` seam shared by every resource type the gateway proxies.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::validation::Validate;

/// Tag identifying which resource type an operation or error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Lab,
    LabCommand,
    LabWorkflow,
}

impl ResourceKind {
    /// Type name used to qualify error names and log entries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lab => "Lab",
            Self::LabCommand => "LabCommand",
            Self::LabWorkflow => "LabWorkflow",
        }
    }

    /// Relative collection path of this resource on the DMX core API.
    #[must_use]
    pub fn collection_path(self) -> &'static str {
        match self {
            Self::Lab => "api/labs",
            Self::LabCommand => "api/labcommands",
            Self::LabWorkflow => "api/labworkflows",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource owned by the downstream API and proxied by the gateway.
///
/// The gateway never assigns or rewrites `id`; it only checks that the
/// identifier is absent or present as each operation requires.
pub trait Resource:
    Validate + Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: ResourceKind;

    /// Identifier assigned by the downstream API. Nil until created.
    fn id(&self) -> Uuid;
}
