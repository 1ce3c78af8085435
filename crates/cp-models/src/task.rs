//! Task model
//!
//! A task is either a one-off piece of work spread over its date window, or a
//! weekly rule producing one occurrence per matching weekday. The wire record
//! keeps the flat `repeats_weekly` shape; the model splits it into
//! [`Schedule`] so weekly-only fields cannot be read off a one-off task.

use std::collections::HashMap;

use chrono::NaiveDate;
use cp_core::calendar::{format_date, parse_date, DateRange, WeekdaySet};
use cp_core::error::{PlanError, ValidationErrors};
use cp_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};

use crate::exception::{ExceptionRecord, TaskException};

/// Task as stored by the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskRecord {
    pub id: Id,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Id>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub estimated_time: f64,
    #[serde(default)]
    pub assigned_employee_id: Option<Id>,
    #[serde(default)]
    pub repeats_weekly: bool,
    #[serde(default)]
    pub repeat_days: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_per_day: Option<f64>,
    #[serde(default)]
    pub exceptions: Vec<ExceptionRecord>,
}

/// Weekly recurrence of a task
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyRule {
    /// Never empty
    pub repeat_days: WeekdaySet,
    /// Default hours of each occurrence
    pub hours_per_day: Option<f64>,
    /// In insertion order; for a repeated date the later record wins
    pub exceptions: Vec<TaskException>,
}

impl WeeklyRule {
    pub fn new(repeat_days: WeekdaySet, hours_per_day: f64) -> Self {
        Self {
            repeat_days,
            hours_per_day: Some(hours_per_day),
            exceptions: Vec::new(),
        }
    }

    pub fn with_exception(mut self, exception: TaskException) -> Self {
        self.exceptions.push(exception);
        self
    }

    /// The effective exception for `date`
    pub fn exception_on(&self, date: NaiveDate) -> Option<&TaskException> {
        self.exceptions.iter().rev().find(|e| e.date == date)
    }

    /// Date-indexed view of the effective exceptions
    pub fn exception_index(&self) -> HashMap<NaiveDate, &TaskException> {
        self.exceptions.iter().map(|e| (e.date, e)).collect()
    }

    pub fn default_hours(&self) -> f64 {
        self.hours_per_day.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Schedule {
    /// `estimated_time` is the total over the window
    Once,
    Weekly(WeeklyRule),
}

/// The values an occurrence gets when no exception applies
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OccurrenceDefaults {
    pub hours_per_day: Option<f64>,
    pub assigned_employee_id: Option<Id>,
}

/// Task entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub id: Id,
    pub title: String,
    pub project_id: Option<Id>,
    /// Inclusive validity window
    pub window: DateRange,
    /// Stored estimate; derived for weekly tasks, see [`Task::derived_estimated_time`]
    pub estimated_time: f64,
    pub assigned_employee_id: Option<Id>,
    pub schedule: Schedule,
}

impl Task {
    /// One-off task spreading `estimated_time` over `window`
    pub fn once(id: Id, title: impl Into<String>, window: DateRange, estimated_time: f64) -> Self {
        Self {
            id,
            title: title.into(),
            project_id: None,
            window,
            estimated_time,
            assigned_employee_id: None,
            schedule: Schedule::Once,
        }
    }

    /// Weekly task; `estimated_time` is derived from the rule
    pub fn weekly(id: Id, title: impl Into<String>, window: DateRange, rule: WeeklyRule) -> Self {
        let mut task = Self {
            id,
            title: title.into(),
            project_id: None,
            window,
            estimated_time: 0.0,
            assigned_employee_id: None,
            schedule: Schedule::Weekly(rule),
        };
        task.estimated_time = task.derived_estimated_time();
        task
    }

    pub fn assigned_to(mut self, employee_id: Id) -> Self {
        self.assigned_employee_id = Some(employee_id);
        self
    }

    pub fn start_date(&self) -> NaiveDate {
        self.window.start
    }

    pub fn end_date(&self) -> NaiveDate {
        self.window.end
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self.schedule, Schedule::Weekly(_))
    }

    pub fn weekly_rule(&self) -> Option<&WeeklyRule> {
        match &self.schedule {
            Schedule::Weekly(rule) => Some(rule),
            Schedule::Once => None,
        }
    }

    pub fn weekly_rule_mut(&mut self) -> Option<&mut WeeklyRule> {
        match &mut self.schedule {
            Schedule::Weekly(rule) => Some(rule),
            Schedule::Once => None,
        }
    }

    /// `|repeat_days| * hours_per_day` for weekly tasks, the stored value otherwise
    pub fn derived_estimated_time(&self) -> f64 {
        match &self.schedule {
            Schedule::Weekly(rule) => f64::from(rule.repeat_days.len()) * rule.default_hours(),
            Schedule::Once => self.estimated_time,
        }
    }

    /// Defaults an exception is compared against; `None` for one-off tasks
    pub fn occurrence_defaults(&self) -> Option<OccurrenceDefaults> {
        self.weekly_rule().map(|rule| OccurrenceDefaults {
            hours_per_day: rule.hours_per_day,
            assigned_employee_id: self.assigned_employee_id,
        })
    }
}

impl Identifiable for Task {
    fn id(&self) -> Id {
        self.id
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = PlanError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let start = collect(&mut errors, parse_date("start_date", &record.start_date));
        let end = collect(&mut errors, parse_date("end_date", &record.end_date));
        let window = match (start, end) {
            (Some(start), Some(end)) => collect(&mut errors, DateRange::new(start, end)),
            _ => None,
        };

        let schedule = if record.repeats_weekly {
            let repeat_days = collect(
                &mut errors,
                WeekdaySet::parse("repeat_days", &record.repeat_days),
            );
            if record.repeat_days.is_empty() {
                errors.add("repeat_days", "can't be blank for a weekly task");
            }

            let mut exceptions = Vec::with_capacity(record.exceptions.len());
            for (index, exception) in record.exceptions.into_iter().enumerate() {
                match TaskException::try_from(exception) {
                    Ok(exception) => exceptions.push(exception),
                    Err(PlanError::Validation(nested)) => {
                        errors.merge_prefixed(&format!("exceptions[{}]", index), nested)
                    }
                    Err(other) => errors.add(format!("exceptions[{}]", index), other.to_string()),
                }
            }

            repeat_days.map(|repeat_days| {
                Schedule::Weekly(WeeklyRule {
                    repeat_days,
                    hours_per_day: record.hours_per_day,
                    exceptions,
                })
            })
        } else {
            Some(Schedule::Once)
        };

        match (window, schedule) {
            (Some(window), Some(schedule)) if errors.is_empty() => Ok(Self {
                id: record.id,
                title: record.title,
                project_id: record.project_id,
                window,
                estimated_time: record.estimated_time,
                assigned_employee_id: record.assigned_employee_id,
                schedule,
            }),
            _ => Err(PlanError::Validation(errors)),
        }
    }
}

/// Keep the value, or fold its validation errors into `errors`
fn collect<T>(errors: &mut ValidationErrors, result: Result<T, PlanError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(PlanError::Validation(nested)) => {
            errors.merge(nested);
            None
        }
        Err(other) => {
            errors.add_base(other.to_string());
            None
        }
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        let (repeats_weekly, repeat_days, hours_per_day, exceptions) = match task.schedule {
            Schedule::Once => (false, Vec::new(), None, Vec::new()),
            Schedule::Weekly(rule) => (
                true,
                rule.repeat_days.names().into_iter().map(String::from).collect(),
                rule.hours_per_day,
                rule.exceptions.into_iter().map(ExceptionRecord::from).collect(),
            ),
        };
        Self {
            id: task.id,
            title: task.title,
            project_id: task.project_id,
            start_date: format_date(task.window.start),
            end_date: format_date(task.window.end),
            estimated_time: task.estimated_time,
            assigned_employee_id: task.assigned_employee_id,
            repeats_weekly,
            repeat_days,
            hours_per_day,
            exceptions,
        }
    }
}
