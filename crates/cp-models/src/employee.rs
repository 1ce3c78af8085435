//! Employee model

use cp_core::calendar::WeekdaySet;
use cp_core::error::{PlanError, ValidationErrors};
use cp_core::traits::{Id, Identifiable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Employee as stored by the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeRecord {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    pub weekly_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_days: Option<Vec<String>>,
}

/// Employee entity
///
/// `working_days` is never empty: an absent or empty list in the record
/// falls back to Monday..Friday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EmployeeRecord", into = "EmployeeRecord")]
pub struct Employee {
    pub id: Id,
    pub name: String,
    pub weekly_hours: f64,
    pub working_days: WeekdaySet,
}

impl Employee {
    pub fn new(id: Id, name: impl Into<String>, weekly_hours: f64) -> Self {
        Self {
            id,
            name: name.into(),
            weekly_hours,
            working_days: WeekdaySet::WORK_WEEK,
        }
    }

    pub fn with_working_days(mut self, days: WeekdaySet) -> Self {
        self.working_days = days.or_work_week();
        self
    }

    /// Hours available on one working day
    pub fn daily_capacity(&self) -> f64 {
        self.weekly_hours / f64::from(self.working_days.len().max(1))
    }

    pub fn works_on(&self, date: NaiveDate) -> bool {
        self.working_days.includes(date)
    }
}

impl Identifiable for Employee {
    fn id(&self) -> Id {
        self.id
    }
}

impl TryFrom<EmployeeRecord> for Employee {
    type Error = PlanError;

    fn try_from(record: EmployeeRecord) -> Result<Self, Self::Error> {
        let working_days = match record.working_days.as_deref() {
            None | Some([]) => WeekdaySet::WORK_WEEK,
            Some(names) => WeekdaySet::parse("working_days", names)?.or_work_week(),
        };

        if !record.weekly_hours.is_finite() {
            let mut errors = ValidationErrors::new();
            errors.add("weekly_hours", "must be a finite number");
            return Err(errors.into());
        }

        Ok(Self {
            id: record.id,
            name: record.name,
            weekly_hours: record.weekly_hours,
            working_days,
        })
    }
}

impl From<Employee> for EmployeeRecord {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            weekly_hours: employee.weekly_hours,
            working_days: Some(
                employee
                    .working_days
                    .names()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use uuid::Uuid;

    #[test]
    fn test_daily_capacity() {
        let employee = Employee::new(Uuid::new_v4(), "Ada", 40.0);
        assert_eq!(employee.daily_capacity(), 8.0);

        let part_time = Employee::new(Uuid::new_v4(), "Grace", 24.0)
            .with_working_days(WeekdaySet::from_days([Weekday::Mon, Weekday::Tue, Weekday::Wed]));
        assert_eq!(part_time.daily_capacity(), 8.0);

        // 2024-01-04 is a Thursday
        let thursday = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        assert!(!part_time.works_on(thursday));
        assert!(employee.works_on(thursday));
    }

    #[test]
    fn test_record_defaults_working_days() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"id":"{}","name":"Ada","weekly_hours":32}}"#, id);
        let employee: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee.working_days, WeekdaySet::WORK_WEEK);

        let json = format!(r#"{{"id":"{}","weekly_hours":32,"working_days":[]}}"#, id);
        let employee: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee.working_days, WeekdaySet::WORK_WEEK);
    }

    #[test]
    fn test_record_with_unknown_weekday_is_rejected() {
        let record = EmployeeRecord {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            weekly_hours: 40.0,
            working_days: Some(vec!["monday".into(), "caturday".into()]),
        };
        let err = Employee::try_from(record).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_negative_hours_are_accepted() {
        let record = EmployeeRecord {
            id: Uuid::new_v4(),
            name: String::new(),
            weekly_hours: -10.0,
            working_days: None,
        };
        let employee = Employee::try_from(record).unwrap();
        assert_eq!(employee.daily_capacity(), -2.0);
    }
}
