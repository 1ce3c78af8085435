//! Employee contract

use cp_core::error::ValidationErrors;
use cp_models::Employee;

use crate::base::{validate_hours, Contract, ValidationResult};
use crate::MAX_WEEKLY_HOURS;

/// Contract applied when an employee is created or edited
#[derive(Debug, Default)]
pub struct EmployeeContract;

impl EmployeeContract {
    pub fn new() -> Self {
        Self
    }

    fn validate_name(&self, name: &str, errors: &mut ValidationErrors) {
        if name.trim().is_empty() {
            errors.add("name", "can't be blank");
        } else if name.len() > 255 {
            errors.add("name", "is too long (maximum is 255 characters)");
        }
    }

    fn validate_weekly_hours(&self, hours: f64, errors: &mut ValidationErrors) {
        validate_hours("weekly_hours", hours, MAX_WEEKLY_HOURS, errors);
        if hours == 0.0 {
            errors.add("weekly_hours", "must be greater than 0");
        }
    }
}

impl Contract<Employee> for EmployeeContract {
    fn validate(&self, entity: &Employee) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        self.validate_name(&entity.name, &mut errors);
        self.validate_weekly_hours(entity.weekly_hours, &mut errors);

        errors.into_result()
    }
}
