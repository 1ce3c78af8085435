//! Contract for per-date exception edits

use cp_core::error::ValidationErrors;
use cp_models::{AssigneeOverride, EditChange, ExceptionEdit, Roster, Task};

use crate::base::{validate_hours, Contract, ValidationResult};
use crate::MAX_HOURS_PER_DAY;

/// Validates edits a scheduler wants to merge into one task
pub struct ExceptionEditContract<'a> {
    task: &'a Task,
    roster: &'a Roster,
}

impl<'a> ExceptionEditContract<'a> {
    pub fn new(task: &'a Task, roster: &'a Roster) -> Self {
        Self { task, roster }
    }
}

impl<'a> Contract<ExceptionEdit> for ExceptionEditContract<'a> {
    fn validate(&self, entity: &ExceptionEdit) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        let Some(rule) = self.task.weekly_rule() else {
            errors.add_base("only weekly tasks have per-date exceptions");
            return errors.into_result();
        };

        if !self.task.window.contains(entity.date) {
            errors.add("date", format!("is outside the task window {}", self.task.window));
        } else if !rule.repeat_days.includes(entity.date) {
            errors.add("date", "is not one of the task's repeat days");
        }

        if let EditChange::Override {
            estimated_time,
            assignee,
        } = entity.change
        {
            if let Some(hours) = estimated_time {
                validate_hours("estimated_time", hours, MAX_HOURS_PER_DAY, &mut errors);
            }
            if let AssigneeOverride::Employee(id) = assignee {
                if self.roster.get(id).is_none() {
                    errors.add("assigned_employee_id", format!("{} is not a known employee", id));
                }
            }
        }

        errors.into_result()
    }
}
