//! Well-formed resources for tests, here and in dependent crates through
//! the `test-fixtures` feature.
//!
//! `new_*` values pass `on_add`; `stored_*` values carry an identifier and
//! pass `on_modify`.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::models::{
    CommandStatus, CommandType, DeviceType, Lab, LabCommand, LabDevice, LabDeviceStatus,
    LabStatus, LabWorkflow, WorkflowStatus,
};

pub fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, 15, 9, 26)
        .single()
        .unwrap_or_default()
}

/// A lab ready to be added: no identifier, every required field set.
pub fn new_lab() -> Lab {
    Lab {
        id: Uuid::nil(),
        external_id: "lab-042".to_string(),
        name: "Building 44 lab".to_string(),
        description: Some("Phones and PCs for ring testing".to_string()),
        status: LabStatus::Available,
        devices: vec![LabDevice {
            id: Uuid::new_v4(),
            name: "Surface Pro".to_string(),
            device_type: DeviceType::Pc,
            status: LabDeviceStatus::Online,
        }],
        created_by: 11,
        updated_by: 11,
        created_date: timestamp(),
        updated_date: timestamp(),
    }
}

pub fn new_lab_command() -> LabCommand {
    LabCommand {
        id: Uuid::nil(),
        lab_id: Uuid::new_v4(),
        lab_workflow_id: None,
        command_type: CommandType::PowerShell,
        arguments: "Get-ComputerInfo".to_string(),
        status: CommandStatus::Pending,
        notes: None,
        results: None,
        created_by: 11,
        updated_by: 11,
        created_date: timestamp(),
        updated_date: timestamp(),
    }
}

pub fn new_lab_workflow() -> LabWorkflow {
    LabWorkflow {
        id: Uuid::nil(),
        lab_workflow_execution_id: None,
        name: "Nightly smoke".to_string(),
        owner: "dmx-team".to_string(),
        commands: Some(vec![new_lab_command(), new_lab_command()]),
        variables: BTreeMap::from([("ring".to_string(), "canary".to_string())]),
        status: WorkflowStatus::Pending,
        notes: None,
        created_by: 11,
        updated_by: 11,
        created_date: timestamp(),
        updated_date: timestamp(),
        results: None,
    }
}

/// A lab as the downstream API returns it.
pub fn stored_lab() -> Lab {
    Lab {
        id: Uuid::new_v4(),
        ..new_lab()
    }
}

pub fn stored_lab_command() -> LabCommand {
    LabCommand {
        id: Uuid::new_v4(),
        ..new_lab_command()
    }
}

pub fn stored_lab_workflow() -> LabWorkflow {
    LabWorkflow {
        id: Uuid::new_v4(),
        ..new_lab_workflow()
    }
}
