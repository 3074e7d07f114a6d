use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resource::{Resource, ResourceKind};

wire_enum!(
    /// Availability of a lab as reported by the DMX core API.
    LabStatus {
        Available => "Available",
        Offline => "Offline",
        Unregistered => "Unregistered",
    }
);

wire_enum!(
    /// Kind of device attached to a lab.
    DeviceType {
        Phone => "Phone",
        Pc => "PC",
    }
);

wire_enum!(
    /// Connectivity of a single lab device.
    LabDeviceStatus {
        Online => "Online",
        Offline => "Offline",
    }
);

/// A physical lab registered with DMX.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lab {
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub id: Uuid,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub external_id: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: LabStatus,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub devices: Vec<LabDevice>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub created_by: u64,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub updated_by: u64,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub created_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub updated_date: DateTime<Utc>,
}

/// A device embedded in a [`Lab`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabDevice {
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub id: Uuid,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub name: String,
    #[serde(default, rename = "Type")]
    pub device_type: DeviceType,
    #[serde(default)]
    pub status: LabDeviceStatus,
}

impl Resource for Lab {
    const KIND: ResourceKind = ResourceKind::Lab;

    fn id(&self) -> Uuid {
        self.id
    }
}
