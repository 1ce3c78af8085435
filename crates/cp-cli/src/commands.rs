//! What each subcommand computes, independent of how it is printed

use chrono::NaiveDate;
use cp_contracts::{Contract, ExceptionEditContract};
use cp_core::calendar::DateRange;
use cp_core::config::{LimitsConfig, PlannerConfig};
use cp_core::error::PlanError;
use cp_core::result::PlanResult;
use cp_core::traits::Id;
use cp_models::{ExceptionEdit, Task, TaskInstance};
use cp_schedule::{
    apply_exception_edits, daily_workload, instances_for_date, next_occurrences, GridCell,
    GridRow, ViewWindow, WorkloadGrid,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::snapshot::Snapshot;

/// Upcoming occurrences of one task
#[derive(Debug, Clone, Serialize)]
pub struct OccurrenceReport {
    pub task_id: Id,
    pub title: String,
    pub from: NaiveDate,
    pub instances: Vec<TaskInstance>,
}

/// Per-day workload of one employee or the team over a range
#[derive(Debug, Clone, Serialize)]
pub struct WorkloadReport {
    pub range: DateRange,
    #[serde(flatten)]
    pub row: GridRow,
}

pub fn occurrences(
    snapshot: &Snapshot,
    task_id: Id,
    from: NaiveDate,
    limit: Option<usize>,
    limits: &LimitsConfig,
) -> PlanResult<OccurrenceReport> {
    let task = snapshot.task(task_id)?;
    let limit = limit.unwrap_or(limits.default_occurrence_limit);
    let instances = next_occurrences(task, from, limit, &snapshot.roster);

    Ok(OccurrenceReport {
        task_id,
        title: task.title.clone(),
        from,
        instances,
    })
}

#[instrument(skip_all, fields(range = %range, employee = ?employee_id))]
pub fn workload(
    snapshot: &Snapshot,
    range: DateRange,
    employee_id: Option<Id>,
    limits: &LimitsConfig,
) -> PlanResult<WorkloadReport> {
    limits.check_range(range)?;

    let label = match employee_id {
        Some(id) => snapshot
            .roster
            .get(id)
            .map(|employee| employee.name.clone())
            .ok_or_else(|| PlanError::not_found("employee", id))?,
        None => "Team".to_string(),
    };

    let cells = range
        .days()
        .map(|date| {
            let instances = instances_for_date(&snapshot.tasks, date, &snapshot.roster);
            let workload = daily_workload(date, &instances, &snapshot.roster, employee_id);
            GridCell {
                date,
                workload,
                utilization: workload.utilization(),
            }
        })
        .collect();

    Ok(WorkloadReport {
        range,
        row: GridRow {
            employee_id,
            label,
            cells,
        },
    })
}

pub fn grid(
    snapshot: &Snapshot,
    reference: NaiveDate,
    view: ViewWindow,
    config: &PlannerConfig,
) -> PlanResult<WorkloadGrid> {
    let range = view.resolve(reference, &config.calendar);
    WorkloadGrid::build(range, &snapshot.tasks, &snapshot.roster, &config.limits)
}

/// Validate one per-date edit and merge it into its task
///
/// The snapshot is updated in place; the edited task is returned.
pub fn edit_exception(snapshot: &mut Snapshot, task_id: Id, edit: ExceptionEdit) -> PlanResult<Task> {
    let task = snapshot.task(task_id)?;
    ExceptionEditContract::new(task, &snapshot.roster).validate(&edit)?;
    let updated = apply_exception_edits(task, &[edit])?;

    info!(task_id = %task_id, date = %edit.date, "Exception recorded");
    *snapshot.task_mut(task_id)? = updated.clone();
    Ok(updated)
}
