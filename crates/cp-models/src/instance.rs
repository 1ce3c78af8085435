//! Dated task instances produced by the occurrence expander

use chrono::NaiveDate;
use cp_core::calendar::{format_date, DateRange, WeekdaySet};
use cp_core::traits::{Assignable, Id};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Where an instance came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceKind {
    /// A one-off task touching this date; hours are the task total
    OneOff,
    /// A weekly occurrence with default values
    Recurring,
    /// A weekly occurrence shaped by an exception record
    Exception,
}

/// One task on one concrete date. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskInstance {
    pub task_id: Id,
    pub title: String,
    pub project_id: Option<Id>,
    /// The parent task's window
    pub window: DateRange,
    pub instance_date: NaiveDate,
    /// Per-occurrence hours for recurring instances, task total for one-offs
    pub estimated_time: f64,
    pub assigned_employee_id: Option<Id>,
    /// Working days of the resolved assignee (Mon..Fri when unknown)
    pub assignee_working_days: WeekdaySet,
    pub kind: InstanceKind,
}

impl TaskInstance {
    pub fn is_recurring_instance(&self) -> bool {
        !matches!(self.kind, InstanceKind::OneOff)
    }

    pub fn is_exception(&self) -> bool {
        matches!(self.kind, InstanceKind::Exception)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.window.start
    }

    pub fn end_date(&self) -> NaiveDate {
        self.window.end
    }
}

impl Assignable for TaskInstance {
    fn assigned_employee_id(&self) -> Option<Id> {
        self.assigned_employee_id
    }
}

impl Serialize for TaskInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TaskInstance", 11)?;
        state.serialize_field("task_id", &self.task_id)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("project_id", &self.project_id)?;
        state.serialize_field("start_date", &format_date(self.window.start))?;
        state.serialize_field("end_date", &format_date(self.window.end))?;
        state.serialize_field("instance_date", &format_date(self.instance_date))?;
        state.serialize_field("estimated_time", &self.estimated_time)?;
        state.serialize_field("assigned_employee_id", &self.assigned_employee_id)?;
        state.serialize_field("assignee_working_days", &self.assignee_working_days)?;
        state.serialize_field("is_recurring_instance", &self.is_recurring_instance())?;
        state.serialize_field("is_exception", &self.is_exception())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_flags_follow_kind() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut instance = TaskInstance {
            task_id: Uuid::new_v4(),
            title: "Review".into(),
            project_id: None,
            window: DateRange::single(date),
            instance_date: date,
            estimated_time: 3.0,
            assigned_employee_id: None,
            assignee_working_days: WeekdaySet::WORK_WEEK,
            kind: InstanceKind::OneOff,
        };
        assert!(!instance.is_recurring_instance());
        assert!(!instance.is_exception());

        instance.kind = InstanceKind::Exception;
        assert!(instance.is_recurring_instance());
        assert!(instance.is_exception());

        let json = serde_json::to_value(&instance).unwrap();
        assert_eq!(json["instance_date"], "2024-01-01");
        assert_eq!(json["is_recurring_instance"], true);
        assert_eq!(json["is_exception"], true);
        assert_eq!(json["assignee_working_days"][0], "monday");
    }
}
