//! Validation stage: structural checks run before any downstream call.
//!
//! Every rule is evaluated and every violation accumulated; nothing stops at
//! the first failure. The stage is pure: it never touches the network and
//! never mutates the resource, so running it twice yields the same result.

mod lab;
mod lab_command;
mod lab_workflow;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::is_unset_timestamp;
use crate::resource::Resource;
use crate::violations::Violations;

/// Operation-independent rules of a resource type.
///
/// Identifier rules depend on the operation and live in [`on_add`] and
/// [`on_modify`]; everything else a resource requires of itself goes here.
/// Embedded items reuse their own `structural_violations` so composite
/// resources validate recursively.
pub trait Validate {
    fn structural_violations(&self) -> Violations;
}

/// Rules for creating a resource: the identifier must not be set yet.
#[must_use]
pub fn on_add<R: Resource>(resource: &R) -> Violations {
    let mut violations = resource.structural_violations();
    violations.check(!resource.id().is_nil(), "Id", "Id must not be set");
    violations
}

/// Rules for replacing a resource: the identifier must name an existing one.
#[must_use]
pub fn on_modify<R: Resource>(resource: &R) -> Violations {
    let mut violations = resource.structural_violations();
    require_id(&mut violations, "Id", resource.id());
    violations
}

/// Rules for operations addressed by identifier alone (retrieve, remove).
#[must_use]
pub fn on_id(id: Uuid) -> Violations {
    let mut violations = Violations::new();
    require_id(&mut violations, "Id", id);
    violations
}

// ---------------------------------------------------------------------------
// Rule helpers
// ---------------------------------------------------------------------------

pub(crate) fn require_text(violations: &mut Violations, field: &str, value: &str) {
    violations.check(
        value.trim().is_empty(),
        field,
        format!("{field} is required"),
    );
}

pub(crate) fn require_id(violations: &mut Violations, field: &str, id: Uuid) {
    violations.check(id.is_nil(), field, format!("{field} is required"));
}

pub(crate) fn require_user(violations: &mut Violations, field: &str, user: u64) {
    violations.check(user == 0, field, format!("{field} is required"));
}

pub(crate) fn require_recognized(violations: &mut Violations, field: &str, recognized: bool) {
    violations.check(
        !recognized,
        field,
        format!("{field} is not a recognized value"),
    );
}

/// Audit block shared by every top-level resource.
pub(crate) fn require_audit(
    violations: &mut Violations,
    created_by: u64,
    updated_by: u64,
    created_date: &DateTime<Utc>,
    updated_date: &DateTime<Utc>,
) {
    require_user(violations, "CreatedBy", created_by);
    require_user(violations, "UpdatedBy", updated_by);

    let created_unset = is_unset_timestamp(created_date);
    let updated_unset = is_unset_timestamp(updated_date);
    violations.check(created_unset, "CreatedDate", "CreatedDate is required");
    violations.check(updated_unset, "UpdatedDate", "UpdatedDate is required");

    if !created_unset && !updated_unset {
        violations.check(
            updated_date < created_date,
            "UpdatedDate",
            "UpdatedDate must not be earlier than CreatedDate",
        );
    }
}
