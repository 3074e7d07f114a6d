use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resource::{Resource, ResourceKind};

wire_enum!(
    /// Interpreter the lab runs a command with.
    CommandType {
        Shell => "Shell",
        PowerShell => "PowerShell",
    }
);

wire_enum!(
    /// Execution state of a command.
    CommandStatus {
        Pending => "Pending",
        Running => "Running",
        Completed => "Completed",
        Error => "Error",
    }
);

/// A command scheduled against a lab, optionally as part of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabCommand {
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub id: Uuid,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub lab_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_workflow_id: Option<Uuid>,
    #[serde(default, rename = "Type")]
    pub command_type: CommandType,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub arguments: String,
    #[serde(default)]
    pub status: CommandStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<String>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub created_by: u64,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub updated_by: u64,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub created_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub updated_date: DateTime<Utc>,
}

impl Resource for LabCommand {
    const KIND: ResourceKind = ResourceKind::LabCommand;

    fn id(&self) -> Uuid {
        self.id
    }
}
