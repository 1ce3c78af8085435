//! Snapshot files: the employees and tasks a command runs against

use std::fs;
use std::path::Path;

use cp_contracts::{Contract, EmployeeContract, TaskContract};
use cp_core::calendar::format_date;
use cp_core::error::{PlanError, ValidationErrors};
use cp_core::result::PlanResult;
use cp_core::traits::{position_of, Id};
use cp_models::{Employee, EmployeeRecord, Roster, Task, TaskRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// On-disk shape, `{ "employees": [...], "tasks": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub employees: Vec<EmployeeRecord>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

/// Validated employees and tasks
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub roster: Roster,
    pub tasks: Vec<Task>,
}

impl Snapshot {
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> PlanResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| PlanError::Snapshot(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Parse and convert every record, reporting all record errors at once
    pub fn from_json(text: &str) -> PlanResult<Self> {
        let file: SnapshotFile =
            serde_json::from_str(text).map_err(|e| PlanError::Snapshot(e.to_string()))?;
        Self::from_file(file)
    }

    pub fn from_file(file: SnapshotFile) -> PlanResult<Self> {
        let mut errors = ValidationErrors::new();
        let employees = convert_all::<_, Employee>("employees", file.employees, &mut errors);
        let tasks = convert_all::<_, Task>("tasks", file.tasks, &mut errors);
        errors.into_result()?;

        debug!(employees = employees.len(), tasks = tasks.len(), "Snapshot loaded");
        Ok(Self {
            roster: Roster::new(employees),
            tasks,
        })
    }

    pub fn task(&self, id: Id) -> PlanResult<&Task> {
        let position = self.task_position(id)?;
        Ok(&self.tasks[position])
    }

    pub fn task_mut(&mut self, id: Id) -> PlanResult<&mut Task> {
        let position = self.task_position(id)?;
        Ok(&mut self.tasks[position])
    }

    fn task_position(&self, id: Id) -> PlanResult<usize> {
        position_of(&self.tasks, id).ok_or_else(|| PlanError::not_found("task", id))
    }

    /// Data-quality findings that do not stop a calculation
    ///
    /// Runs the employee and task contracts against the snapshot and lists
    /// exceptions the expander can never reach.
    pub fn audit(&self) -> Vec<String> {
        let mut findings = Vec::new();

        let employees: Vec<Employee> = self.roster.iter().cloned().collect();
        if let Err(errors) = EmployeeContract::new().validate_all("employees", &employees) {
            findings.extend(errors.full_messages());
        }
        if let Err(errors) = TaskContract::with_roster(&self.roster).validate_all("tasks", &self.tasks) {
            findings.extend(errors.full_messages());
        }
        for task in &self.tasks {
            for date in TaskContract::dead_exceptions(task) {
                findings.push(format!(
                    "task {} has an exception on {} that never applies",
                    task.id,
                    format_date(date)
                ));
            }
        }

        findings
    }

    pub fn to_file(&self) -> SnapshotFile {
        SnapshotFile {
            employees: self.roster.iter().cloned().map(EmployeeRecord::from).collect(),
            tasks: self.tasks.iter().cloned().map(TaskRecord::from).collect(),
        }
    }
}

fn convert_all<R, T>(label: &str, records: Vec<R>, errors: &mut ValidationErrors) -> Vec<T>
where
    T: TryFrom<R, Error = PlanError>,
{
    let mut converted = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match T::try_from(record) {
            Ok(value) => converted.push(value),
            Err(PlanError::Validation(nested)) => {
                errors.merge_prefixed(&format!("{}[{}]", label, index), nested)
            }
            Err(other) => errors.add(format!("{}[{}]", label, index), other.to_string()),
        }
    }
    converted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::from_json("{}").unwrap();
        assert!(snapshot.roster.is_empty());
        assert!(snapshot.tasks.is_empty());
    }

    #[test]
    fn test_malformed_json_is_a_snapshot_error() {
        let err = Snapshot::from_json("{\"tasks\": [").unwrap_err();
        assert_eq!(err.error_code(), "snapshot_error");
    }

    #[test]
    fn test_record_errors_are_collected_with_their_index() {
        let text = json!({
            "employees": [
                { "id": Uuid::new_v4(), "name": "Ada", "weekly_hours": 40, "working_days": ["funday"] }
            ],
            "tasks": [
                { "id": Uuid::new_v4(), "start_date": "2024-01-01", "end_date": "2024-01-02" },
                { "id": Uuid::new_v4(), "start_date": "01/02/2024", "end_date": "2024-01-02" }
            ]
        })
        .to_string();

        let PlanError::Validation(errors) = Snapshot::from_json(&text).unwrap_err() else {
            panic!("expected validation errors");
        };
        assert!(errors.has_error("employees[0].working_days"));
        assert!(errors.has_error("tasks[1].start_date"));
        assert!(!errors.has_error("tasks[0].start_date"));
    }

    #[test]
    fn test_unknown_task_is_not_found() {
        let err = Snapshot::default().task(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.error_code(), "not_found");
    }

    #[test]
    fn test_audit_reports_unknown_assignee_and_dead_exception() {
        let text = json!({
            "tasks": [{
                "id": Uuid::new_v4(),
                "title": "Standup",
                "start_date": "2024-01-01",
                "end_date": "2024-01-07",
                "estimated_time": 4,
                "assigned_employee_id": Uuid::new_v4(),
                "repeats_weekly": true,
                "repeat_days": ["monday", "wednesday"],
                "hours_per_day": 2,
                "exceptions": [{ "date": "2024-01-02", "is_removed": true }]
            }]
        })
        .to_string();

        let findings = Snapshot::from_json(&text).unwrap().audit();
        assert!(findings.iter().any(|f| f.contains("2024-01-02")));
        assert!(findings.iter().any(|f| f.contains("assigned_employee_id")));
    }
}
