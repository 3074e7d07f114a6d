use super::{require_audit, require_recognized, require_text, Validate};
use crate::models::LabWorkflow;
use crate::violations::Violations;

impl Validate for LabWorkflow {
    fn structural_violations(&self) -> Violations {
        let mut violations = Violations::new();
        require_text(&mut violations, "Name", &self.name);
        require_text(&mut violations, "Owner", &self.owner);
        require_recognized(&mut violations, "Status", self.status.is_recognized());
        require_audit(
            &mut violations,
            self.created_by,
            self.updated_by,
            &self.created_date,
            &self.updated_date,
        );

        match &self.commands {
            None => violations.add("Commands", "Commands is required"),
            Some(commands) => {
                for (index, command) in commands.iter().enumerate() {
                    violations.merge_prefixed(
                        &format!("Commands[{index}]"),
                        command.structural_violations(),
                    );
                }
            }
        }

        violations
    }
}
