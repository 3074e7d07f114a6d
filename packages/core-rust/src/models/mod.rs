//! Resource models exchanged with callers and the downstream DMX core API.
//!
//! All structs use `#[serde(rename_all = "PascalCase")]` to match the field
//! names produced by the downstream API. Identifiers are UUIDs where the nil
//! UUID means "not assigned yet"; timestamps are UTC where the Unix epoch
//! (`DateTime::default()`) means "not set".

// ---------------------------------------------------------------------------
// Macro for string-backed wire enums
// ---------------------------------------------------------------------------

/// Generate a string-backed enum that tolerates unknown wire values.
///
/// Known strings (matched case-insensitively) map to their variant; anything
/// else is preserved in `Unrecognized` so the validation stage can report it
/// instead of failing deserialization of the whole resource. `null` and an
/// absent field both land in `Unrecognized("")`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "Option<String>", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value outside the known set, kept verbatim.
            Unrecognized(String),
        }

        impl $name {
            /// Wire representation of this value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Unrecognized(raw) => raw.as_str(),
                }
            }

            /// `false` only for `Unrecognized`.
            #[must_use]
            pub fn is_recognized(&self) -> bool {
                !matches!(self, Self::Unrecognized(_))
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                $(
                    if raw.eq_ignore_ascii_case($wire) {
                        return Self::$variant;
                    }
                )+
                Self::Unrecognized(raw)
            }
        }

        impl From<Option<String>> for $name {
            fn from(raw: Option<String>) -> Self {
                Self::from(raw.unwrap_or_default())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::Unrecognized(String::new())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Unrecognized(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod lab;
pub mod lab_command;
pub mod lab_workflow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

pub use lab::{DeviceType, Lab, LabDevice, LabDeviceStatus, LabStatus};
pub use lab_command::{CommandStatus, CommandType, LabCommand};
pub use lab_workflow::{LabWorkflow, WorkflowStatus};

/// Returns `true` when a timestamp still holds its default (unset) value.
#[must_use]
pub fn is_unset_timestamp(value: &DateTime<Utc>) -> bool {
    *value == DateTime::<Utc>::default()
}

/// Reads an explicit `null` as the field's unset default, so required values
/// sent as `null` reach the validation stage instead of failing the decode.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
