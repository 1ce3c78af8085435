//! Merging per-date edits into a weekly task's exception list

use cp_core::error::PlanError;
use cp_core::result::PlanResult;
use cp_models::{AssigneeOverride, EditChange, ExceptionEdit, OccurrenceDefaults, Task, TaskException};
use tracing::debug;

/// Apply `edits` in order to `existing` and return the new exception list.
///
/// - an edit for a date without a record is appended
/// - an edit for a date with a record replaces it in place
/// - override values equal to `defaults` are dropped; an edit left with
///   nothing to override deletes the record for its date
/// - a removal is always stored as a bare `{date, is_removed: true}`
pub fn merge_exceptions(
    existing: &[TaskException],
    edits: &[ExceptionEdit],
    defaults: OccurrenceDefaults,
) -> Vec<TaskException> {
    let mut merged = existing.to_vec();

    for edit in edits {
        match materialize(edit, defaults) {
            Some(exception) => {
                match merged.iter().position(|e| e.date == edit.date) {
                    Some(position) => {
                        merged[position] = exception;
                        let mut index = 0;
                        merged.retain(|e| {
                            let keep = index <= position || e.date != edit.date;
                            index += 1;
                            keep
                        });
                    }
                    None => merged.push(exception),
                }
            }
            None => merged.retain(|e| e.date != edit.date),
        }
    }

    merged
}

/// Merge `edits` into a weekly task, returning the updated task
pub fn apply_exception_edits(task: &Task, edits: &[ExceptionEdit]) -> PlanResult<Task> {
    let mut updated = task.clone();
    let defaults = updated.occurrence_defaults();
    let (Some(defaults), Some(rule)) = (defaults, updated.weekly_rule_mut()) else {
        return Err(PlanError::invalid(
            "exceptions",
            "can only be edited on a weekly task",
        ));
    };

    let before = rule.exceptions.len();
    rule.exceptions = merge_exceptions(&rule.exceptions, edits, defaults);
    debug!(
        task_id = %task.id,
        edits = edits.len(),
        before,
        after = rule.exceptions.len(),
        "Exception edits merged"
    );

    Ok(updated)
}

/// The record an edit should produce, or `None` if it matches the defaults
fn materialize(edit: &ExceptionEdit, defaults: OccurrenceDefaults) -> Option<TaskException> {
    match edit.change {
        EditChange::Remove => Some(TaskException::removed(edit.date)),
        EditChange::Override {
            estimated_time,
            assignee,
        } => {
            let default_hours = defaults.hours_per_day.unwrap_or(0.0);
            let hours = estimated_time.filter(|hours| *hours != default_hours);
            let assignee = match assignee {
                AssigneeOverride::Employee(id) if defaults.assigned_employee_id == Some(id) => {
                    AssigneeOverride::Inherit
                }
                AssigneeOverride::Unassigned if defaults.assigned_employee_id.is_none() => {
                    AssigneeOverride::Inherit
                }
                other => other,
            };

            if hours.is_none() && assignee.is_inherit() {
                None
            } else {
                Some(TaskException::overriding(edit.date, hours, assignee))
            }
        }
    }
}
