use super::{require_audit, require_id, require_recognized, require_text, Validate};
use crate::models::LabCommand;
use crate::violations::Violations;

impl Validate for LabCommand {
    fn structural_violations(&self) -> Violations {
        let mut violations = Violations::new();
        require_id(&mut violations, "LabId", self.lab_id);
        require_text(&mut violations, "Arguments", &self.arguments);
        require_recognized(&mut violations, "Type", self.command_type.is_recognized());
        require_recognized(&mut violations, "Status", self.status.is_recognized());
        require_audit(
            &mut violations,
            self.created_by,
            self.updated_by,
            &self.created_date,
            &self.updated_date,
        );
        violations
    }
}
