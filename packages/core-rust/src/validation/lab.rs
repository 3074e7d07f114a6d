use super::{require_audit, require_recognized, require_text, Validate};
use crate::models::{Lab, LabDevice};
use crate::violations::Violations;

impl Validate for Lab {
    fn structural_violations(&self) -> Violations {
        let mut violations = Violations::new();
        require_text(&mut violations, "ExternalId", &self.external_id);
        require_text(&mut violations, "Name", &self.name);
        require_recognized(&mut violations, "Status", self.status.is_recognized());
        require_audit(
            &mut violations,
            self.created_by,
            self.updated_by,
            &self.created_date,
            &self.updated_date,
        );

        for (index, device) in self.devices.iter().enumerate() {
            violations.merge_prefixed(&format!("Devices[{index}]"), device.structural_violations());
        }

        violations
    }
}

impl Validate for LabDevice {
    fn structural_violations(&self) -> Violations {
        let mut violations = Violations::new();
        require_text(&mut violations, "Name", &self.name);
        require_recognized(&mut violations, "Type", self.device_type.is_recognized());
        require_recognized(&mut violations, "Status", self.status.is_recognized());
        violations
    }
}
