//! Task contract

use std::collections::HashSet;

use chrono::NaiveDate;
use cp_core::calendar::format_date;
use cp_core::error::ValidationErrors;
use cp_models::{AssigneeOverride, Roster, Task, WeeklyRule};

use crate::base::{validate_hours, Contract, ValidationResult};
use crate::MAX_HOURS_PER_DAY;

/// Tolerance when comparing the stored estimate with the weekly rule
const ESTIMATE_EPSILON: f64 = 1e-6;

/// Contract applied when a task is created or edited
///
/// With a roster attached, assignees (including per-date reassignments)
/// must be known employees.
#[derive(Debug, Default)]
pub struct TaskContract<'a> {
    roster: Option<&'a Roster>,
}

impl<'a> TaskContract<'a> {
    pub fn new() -> Self {
        Self { roster: None }
    }

    pub fn with_roster(roster: &'a Roster) -> Self {
        Self {
            roster: Some(roster),
        }
    }

    /// Validate title is present and within length
    pub fn validate_title(&self, title: &str, errors: &mut ValidationErrors) {
        if title.trim().is_empty() {
            errors.add("title", "can't be blank");
        } else if title.len() > 255 {
            errors.add("title", "is too long (maximum is 255 characters)");
        }
    }

    fn validate_assignee(&self, field: &str, assignee: Option<cp_models::Id>, errors: &mut ValidationErrors) {
        if let (Some(roster), Some(id)) = (self.roster, assignee) {
            if roster.get(id).is_none() {
                errors.add(field, format!("{} is not a known employee", id));
            }
        }
    }

    fn validate_weekly(&self, task: &Task, rule: &WeeklyRule, errors: &mut ValidationErrors) {
        match rule.hours_per_day {
            Some(hours) => validate_hours("hours_per_day", hours, MAX_HOURS_PER_DAY, errors),
            None => errors.add("hours_per_day", "can't be blank for a weekly task"),
        }

        let derived = task.derived_estimated_time();
        if (task.estimated_time - derived).abs() > ESTIMATE_EPSILON {
            errors.add(
                "estimated_time",
                format!("must equal repeat days x hours per day ({})", derived),
            );
        }

        let mut seen = HashSet::new();
        for (index, exception) in rule.exceptions.iter().enumerate() {
            let field = format!("exceptions[{}]", index);
            if !seen.insert(exception.date) {
                errors.add(
                    format!("{}.date", field),
                    format!("{} appears more than once", format_date(exception.date)),
                );
            }
            if exception.is_removed {
                continue;
            }
            if let Some(hours) = exception.estimated_time {
                validate_hours(&format!("{}.estimated_time", field), hours, MAX_HOURS_PER_DAY, errors);
            }
            if let AssigneeOverride::Employee(id) = exception.assignee {
                self.validate_assignee(&format!("{}.assigned_employee_id", field), Some(id), errors);
            }
        }
    }

    /// Exception dates the expander will never consult: outside the window
    /// or on a weekday the task does not repeat on.
    pub fn dead_exceptions(task: &Task) -> Vec<NaiveDate> {
        task.weekly_rule()
            .map(|rule| {
                rule.exceptions
                    .iter()
                    .filter(|e| !task.window.contains(e.date) || !rule.repeat_days.includes(e.date))
                    .map(|e| e.date)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl<'a> Contract<Task> for TaskContract<'a> {
    fn validate(&self, entity: &Task) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        self.validate_title(&entity.title, &mut errors);
        self.validate_assignee("assigned_employee_id", entity.assigned_employee_id, &mut errors);

        match entity.weekly_rule() {
            Some(rule) => self.validate_weekly(entity, rule, &mut errors),
            None => validate_hours("estimated_time", entity.estimated_time, f64::MAX, &mut errors),
        }

        errors.into_result()
    }
}
