use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LabCommand;
use crate::resource::{Resource, ResourceKind};

wire_enum!(
    /// Execution state of a workflow.
    WorkflowStatus {
        Pending => "Pending",
        Running => "Running",
        Completed => "Completed",
        Error => "Error",
    }
);

/// An ordered set of lab commands executed together.
///
/// `commands` is `None` when the caller sent `null` or omitted the field;
/// the validation stage rejects that rather than the deserializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabWorkflow {
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_workflow_execution_id: Option<Uuid>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub owner: String,
    #[serde(default)]
    pub commands: Option<Vec<LabCommand>>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub created_by: u64,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub updated_by: u64,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub created_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub updated_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<String>,
}

impl Resource for LabWorkflow {
    const KIND: ResourceKind = ResourceKind::LabWorkflow;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_commands_deserialize_to_none() {
        let json = serde_json::json!({
            "Name": "nightly",
            "Owner": "dmx",
            "Commands": null,
            "Status": "Pending"
        });
        let workflow: LabWorkflow = serde_json::from_value(json).unwrap();
        assert!(workflow.commands.is_none());
        assert!(workflow.variables.is_empty());
    }

    #[test]
    fn variables_keep_their_keys() {
        let json = serde_json::json!({
            "Name": "nightly",
            "Owner": "dmx",
            "Commands": [],
            "Variables": { "build": "1.2.3", "ring": "canary" },
            "Status": "Running"
        });
        let workflow: LabWorkflow = serde_json::from_value(json).unwrap();
        assert_eq!(workflow.variables.get("ring").map(String::as_str), Some("canary"));
        assert_eq!(workflow.commands, Some(Vec::new()));
    }

    #[test]
    fn null_strings_and_embedded_nulls_still_decode() {
        let json = serde_json::json!({
            "Name": null,
            "Owner": null,
            "Variables": null,
            "Commands": [{ "Arguments": null, "Status": null }]
        });
        let workflow: LabWorkflow = serde_json::from_value(json).unwrap();
        assert!(workflow.name.is_empty() && workflow.owner.is_empty());
        assert!(workflow.variables.is_empty());
        assert_eq!(workflow.status, WorkflowStatus::default());

        let commands = workflow.commands.unwrap();
        assert!(commands[0].arguments.is_empty());
        assert!(!commands[0].command_type.is_recognized());
    }
}
