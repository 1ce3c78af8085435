//! Per-date exceptions to a weekly task's default schedule

use chrono::NaiveDate;
use cp_core::calendar::{format_date, parse_date};
use cp_core::error::PlanError;
use cp_core::traits::Id;
use serde::{Deserialize, Serialize};

use crate::serde_util::double_option;

/// Exception as stored alongside its task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExceptionRecord {
    pub date: String,
    #[serde(default, alias = "hours_per_day", skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<f64>,
    /// Absent => inherit, `null` => unassigned on this date
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub assigned_employee_id: Option<Option<Id>>,
    #[serde(default)]
    pub is_removed: bool,
}

/// How an exception changes the assignee of one occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssigneeOverride {
    /// Keep the task's assignee
    #[default]
    Inherit,
    /// Nobody works on this occurrence
    Unassigned,
    Employee(Id),
}

impl AssigneeOverride {
    /// Resolve against the task's own assignee
    pub fn resolve(self, task_assignee: Option<Id>) -> Option<Id> {
        match self {
            AssigneeOverride::Inherit => task_assignee,
            AssigneeOverride::Unassigned => None,
            AssigneeOverride::Employee(id) => Some(id),
        }
    }

    pub fn is_inherit(&self) -> bool {
        matches!(self, AssigneeOverride::Inherit)
    }

    fn from_wire(value: Option<Option<Id>>) -> Self {
        match value {
            None => AssigneeOverride::Inherit,
            Some(None) => AssigneeOverride::Unassigned,
            Some(Some(id)) => AssigneeOverride::Employee(id),
        }
    }

    fn into_wire(self) -> Option<Option<Id>> {
        match self {
            AssigneeOverride::Inherit => None,
            AssigneeOverride::Unassigned => Some(None),
            AssigneeOverride::Employee(id) => Some(Some(id)),
        }
    }
}

/// Override or suppression of a single occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExceptionRecord", into = "ExceptionRecord")]
pub struct TaskException {
    pub date: NaiveDate,
    pub estimated_time: Option<f64>,
    pub assignee: AssigneeOverride,
    pub is_removed: bool,
}

impl TaskException {
    /// Suppress the occurrence on `date`
    pub fn removed(date: NaiveDate) -> Self {
        Self {
            date,
            estimated_time: None,
            assignee: AssigneeOverride::Inherit,
            is_removed: true,
        }
    }

    pub fn overriding(date: NaiveDate, estimated_time: Option<f64>, assignee: AssigneeOverride) -> Self {
        Self {
            date,
            estimated_time,
            assignee,
            is_removed: false,
        }
    }

    /// Hours for the occurrence, falling back to the task default
    pub fn hours_or(&self, default_hours: Option<f64>) -> f64 {
        self.estimated_time.or(default_hours).unwrap_or(0.0)
    }
}

impl TryFrom<ExceptionRecord> for TaskException {
    type Error = PlanError;

    fn try_from(record: ExceptionRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            date: parse_date("date", &record.date)?,
            estimated_time: record.estimated_time,
            assignee: AssigneeOverride::from_wire(record.assigned_employee_id),
            is_removed: record.is_removed,
        })
    }
}

impl From<TaskException> for ExceptionRecord {
    fn from(exception: TaskException) -> Self {
        if exception.is_removed {
            return Self {
                date: format_date(exception.date),
                estimated_time: None,
                assigned_employee_id: None,
                is_removed: true,
            };
        }
        Self {
            date: format_date(exception.date),
            estimated_time: exception.estimated_time,
            assigned_employee_id: exception.assignee.into_wire(),
            is_removed: false,
        }
    }
}

/// What a user did to one occurrence (e.g. by dragging it in a scheduler)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditChange {
    /// Delete this occurrence only
    Remove,
    /// Change hours and/or assignee; `None` hours keeps the default
    Override {
        estimated_time: Option<f64>,
        assignee: AssigneeOverride,
    },
}

/// A per-date edit to be merged into a task's exceptions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExceptionEdit {
    pub date: NaiveDate,
    pub change: EditChange,
}

impl ExceptionEdit {
    pub fn remove(date: NaiveDate) -> Self {
        Self {
            date,
            change: EditChange::Remove,
        }
    }

    pub fn set_hours(date: NaiveDate, hours: f64) -> Self {
        Self {
            date,
            change: EditChange::Override {
                estimated_time: Some(hours),
                assignee: AssigneeOverride::Inherit,
            },
        }
    }

    pub fn reassign(date: NaiveDate, employee: Option<Id>) -> Self {
        Self {
            date,
            change: EditChange::Override {
                estimated_time: None,
                assignee: match employee {
                    Some(id) => AssigneeOverride::Employee(id),
                    None => AssigneeOverride::Unassigned,
                },
            },
        }
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        if let EditChange::Override { estimated_time, .. } = &mut self.change {
            *estimated_time = Some(hours);
        }
        self
    }
}
