//! Field-keyed rule violations collected by the validation stage.
//!
//! The same shape is used for field errors reported by the downstream API
//! in a bad-request response, so both sides of a failure can be compared
//! key by key.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mapping of field name to the human-readable rules that field violates.
///
/// Keys are PascalCase field names as they appear on the wire. Embedded
/// items are addressed as `Commands[0].Arguments`. Uses `BTreeMap` so
/// serialized output and `Display` are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations(BTreeMap<String, Vec<String>>);

impl Violations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one violation for `field`. Repeated calls for the same field
    /// accumulate in insertion order.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Records `message` for `field` when `violated` is true.
    pub fn check(&mut self, violated: bool, field: &str, message: impl Into<String>) {
        if violated {
            self.add(field, message);
        }
    }

    /// Merges another violation set into this one, field by field.
    pub fn merge(&mut self, other: Violations) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Merges another violation set, prefixing each of its keys.
    ///
    /// Used for embedded items: merging `{"Name": [..]}` with prefix
    /// `Devices[2]` yields `{"Devices[2].Name": [..]}`.
    pub fn merge_prefixed(&mut self, prefix: &str, other: Violations) {
        for (field, messages) in other.0 {
            self.0
                .entry(format!("{prefix}.{field}"))
                .or_default()
                .extend(messages);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one violation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl From<BTreeMap<String, Vec<String>>> for Violations {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Violations
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut violations = Self::new();
        for (field, message) in iter {
            violations.add(field, message);
        }
        violations
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}
