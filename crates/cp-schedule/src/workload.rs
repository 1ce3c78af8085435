//! Workload and capacity calculation
//!
//! Hours of a weekly occurrence are already a one-day figure. A one-off task
//! carries its total, which is spread evenly over the working days of its
//! assignee inside the task window, so a 40 hour task over a Monday..Friday
//! week shows as 8 hours on each of those days.

use std::fmt;

use chrono::NaiveDate;
use cp_core::calendar::{DateRange, WeekdaySet};
use cp_core::traits::Id;
use cp_models::{Assignable, Roster, TaskInstance};
use serde::Serialize;
use tracing::debug;

/// Hours, capacity and utilization of one cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyWorkload {
    pub hours: f64,
    pub capacity: f64,
    pub percentage: f64,
}

impl DailyWorkload {
    pub const ZERO: DailyWorkload = DailyWorkload {
        hours: 0.0,
        capacity: 0.0,
        percentage: 0.0,
    };

    /// Percentage is 0 whenever capacity is not positive
    pub fn new(hours: f64, capacity: f64) -> Self {
        let percentage = if capacity > 0.0 {
            hours / capacity * 100.0
        } else {
            0.0
        };
        Self {
            hours,
            capacity,
            percentage,
        }
    }

    pub fn utilization(&self) -> Utilization {
        Utilization::classify(self.percentage)
    }
}

/// Severity bucket every calendar cell is colored by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Utilization {
    /// Above 100%
    Overloaded,
    /// 50% to 100%, both ends included
    Optimal,
    /// Below 50%
    UnderUtilized,
}

impl Utilization {
    pub fn classify(percentage: f64) -> Self {
        if percentage > 100.0 {
            Utilization::Overloaded
        } else if percentage >= 50.0 {
            Utilization::Optimal
        } else {
            Utilization::UnderUtilized
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Utilization::Overloaded => "overloaded",
            Utilization::Optimal => "optimal",
            Utilization::UnderUtilized => "under-utilized",
        }
    }
}

impl fmt::Display for Utilization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Working days of `working_days` inside `range`, never less than 1
pub fn working_days_in_range(range: DateRange, working_days: WeekdaySet) -> u32 {
    range.count_weekdays(working_days).max(1)
}

/// Hours an instance puts on its own date
///
/// One-off instances are prorated over the working days of the assignee
/// resolved at expansion time.
pub fn instance_hours(instance: &TaskInstance) -> f64 {
    prorated_hours(instance, instance.assignee_working_days)
}

fn prorated_hours(instance: &TaskInstance, working_days: WeekdaySet) -> f64 {
    if instance.is_recurring_instance() {
        instance.estimated_time
    } else {
        instance.estimated_time / f64::from(working_days_in_range(instance.window, working_days))
    }
}

/// Sum of the daily capacity of everyone working on `date`
pub fn roster_capacity_on(date: NaiveDate, roster: &Roster) -> f64 {
    total(roster.working_on(date).map(|employee| employee.daily_capacity()))
}

/// Sum starting from `+0.0`; `Iterator::sum` yields `-0.0` for no items
pub(crate) fn total(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, value| acc + value)
}

/// Workload of one date, for one employee or (with `None`) the whole roster
///
/// `instances` are the instances relevant to `date`, typically from
/// [`instances_for_date`](crate::expander::instances_for_date).
pub fn daily_workload(
    date: NaiveDate,
    instances: &[TaskInstance],
    roster: &Roster,
    employee_id: Option<Id>,
) -> DailyWorkload {
    match employee_id {
        Some(id) => employee_workload(date, instances, roster, id),
        None => team_workload(date, instances, roster),
    }
}

fn employee_workload(
    date: NaiveDate,
    instances: &[TaskInstance],
    roster: &Roster,
    employee_id: Id,
) -> DailyWorkload {
    let Some(employee) = roster.get(employee_id) else {
        debug!(%employee_id, %date, "Workload requested for unknown employee");
        return DailyWorkload::ZERO;
    };
    if !employee.works_on(date) {
        return DailyWorkload::ZERO;
    }

    let hours = total(
        instances
            .iter()
            .filter(|instance| instance.is_assigned_to(employee_id))
            .map(|instance| prorated_hours(instance, employee.working_days)),
    );

    DailyWorkload::new(hours, employee.daily_capacity())
}

fn team_workload(date: NaiveDate, instances: &[TaskInstance], roster: &Roster) -> DailyWorkload {
    let hours = total(instances.iter().map(instance_hours));
    DailyWorkload::new(hours, roster_capacity_on(date, roster))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use cp_models::{Employee, InstanceKind};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instance(
        on: NaiveDate,
        window: DateRange,
        hours: f64,
        assignee: Option<&Employee>,
        kind: InstanceKind,
    ) -> TaskInstance {
        TaskInstance {
            task_id: Uuid::new_v4(),
            title: "Work".into(),
            project_id: None,
            window,
            instance_date: on,
            estimated_time: hours,
            assigned_employee_id: assignee.map(|e| e.id),
            assignee_working_days: assignee
                .map(|e| e.working_days)
                .unwrap_or(WeekdaySet::WORK_WEEK),
            kind,
        }
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(Utilization::classify(50.0), Utilization::Optimal);
        assert_eq!(Utilization::classify(100.0), Utilization::Optimal);
        assert_eq!(Utilization::classify(100.01), Utilization::Overloaded);
        assert_eq!(Utilization::classify(49.99), Utilization::UnderUtilized);
        assert_eq!(Utilization::classify(0.0), Utilization::UnderUtilized);
        assert_eq!(Utilization::UnderUtilized.to_string(), "under-utilized");
        assert_eq!(
            serde_json::to_value(Utilization::UnderUtilized).unwrap(),
            serde_json::json!("under-utilized")
        );
    }

    #[test]
    fn test_zero_capacity_gives_zero_percentage() {
        let workload = DailyWorkload::new(5.0, 0.0);
        assert_eq!(workload.percentage, 0.0);
        assert!(workload.percentage.is_finite());
    }

    #[test]
    fn test_working_days_in_range_floor() {
        let weekend = DateRange::new(date(2024, 1, 6), date(2024, 1, 7)).unwrap();
        assert_eq!(working_days_in_range(weekend, WeekdaySet::WORK_WEEK), 1);
        let week = DateRange::new(date(2024, 1, 1), date(2024, 1, 7)).unwrap();
        assert_eq!(working_days_in_range(week, WeekdaySet::WORK_WEEK), 5);
    }

    #[test]
    fn test_one_off_on_weekend_only_window_is_finite() {
        let ada = Employee::new(Uuid::new_v4(), "Ada", 40.0);
        let weekend = DateRange::new(date(2024, 1, 6), date(2024, 1, 7)).unwrap();
        let item = instance(date(2024, 1, 6), weekend, 10.0, Some(&ada), InstanceKind::OneOff);
        assert_eq!(instance_hours(&item), 10.0);

        // Still team demand, even with nobody on shift
        let roster = Roster::new(vec![ada.clone()]);
        let workload = daily_workload(date(2024, 1, 6), &[item], &roster, None);
        assert_eq!(workload, DailyWorkload::new(10.0, 0.0));
        assert_eq!(workload.percentage, 0.0);
    }

    #[test]
    fn test_team_counts_one_off_on_assignee_day_off() {
        let ada = Employee::new(Uuid::new_v4(), "Ada", 40.0);
        let sam = Employee::new(Uuid::new_v4(), "Sam", 16.0)
            .with_working_days(WeekdaySet::from_days([Weekday::Sat, Weekday::Sun]));
        let roster = Roster::new(vec![ada.clone(), sam]);

        // Friday..Saturday; Ada works only the Friday, so the divisor is 1
        let window = DateRange::new(date(2024, 1, 5), date(2024, 1, 6)).unwrap();
        let saturday = date(2024, 1, 6);
        let item = instance(saturday, window, 8.0, Some(&ada), InstanceKind::OneOff);

        let team = daily_workload(saturday, &[item.clone()], &roster, None);
        assert_eq!(team, DailyWorkload { hours: 8.0, capacity: 8.0, percentage: 100.0 });
        assert_eq!(team.utilization(), Utilization::Optimal);

        let for_ada = daily_workload(saturday, &[item], &roster, Some(ada.id));
        assert_eq!(for_ada, DailyWorkload::ZERO);
    }

    #[test]
    fn test_idle_day_is_positive_zero() {
        let ada = Employee::new(Uuid::new_v4(), "Ada", 40.0);
        let roster = Roster::new(vec![ada.clone()]);
        let monday = date(2024, 1, 1);

        let for_ada = daily_workload(monday, &[], &roster, Some(ada.id));
        assert!(for_ada.hours.is_sign_positive());
        assert!(for_ada.percentage.is_sign_positive());
        assert_eq!(
            serde_json::to_string(&for_ada).unwrap(),
            r#"{"hours":0.0,"capacity":8.0,"percentage":0.0}"#
        );

        let team = daily_workload(monday, &[], &Roster::default(), None);
        assert!(team.hours.is_sign_positive());
        assert!(team.capacity.is_sign_positive());
        assert_eq!(
            serde_json::to_string(&team).unwrap(),
            r#"{"hours":0.0,"capacity":0.0,"percentage":0.0}"#
        );
    }

    #[test]
    fn test_employee_scope_filters_by_assignee() {
        let ada = Employee::new(Uuid::new_v4(), "Ada", 40.0);
        let bob = Employee::new(Uuid::new_v4(), "Bob", 20.0);
        let roster = Roster::new(vec![ada.clone(), bob.clone()]);
        let day = date(2024, 1, 3);
        let window = DateRange::single(day);

        let instances = vec![
            instance(day, window, 3.0, Some(&ada), InstanceKind::Recurring),
            instance(day, window, 2.0, Some(&bob), InstanceKind::Exception),
            instance(day, window, 1.0, None, InstanceKind::Recurring),
        ];

        let for_ada = daily_workload(day, &instances, &roster, Some(ada.id));
        assert_eq!(for_ada, DailyWorkload::new(3.0, 8.0));

        let for_bob = daily_workload(day, &instances, &roster, Some(bob.id));
        assert_eq!(for_bob.percentage, 50.0);

        // Unassigned work still counts as demand for the team
        let team = daily_workload(day, &instances, &roster, None);
        assert_eq!(team.hours, 6.0);
        assert_eq!(team.capacity, 12.0);
        assert_eq!(team.percentage, 50.0);
    }

    #[test]
    fn test_team_capacity_skips_people_off_that_day() {
        let full_time = Employee::new(Uuid::new_v4(), "Ada", 40.0);
        let part_time = Employee::new(Uuid::new_v4(), "Sam", 24.0)
            .with_working_days(WeekdaySet::from_days([Weekday::Mon, Weekday::Tue, Weekday::Wed]));
        let roster = Roster::new(vec![full_time, part_time]);

        assert_eq!(roster_capacity_on(date(2024, 1, 1), &roster), 16.0);
        assert_eq!(roster_capacity_on(date(2024, 1, 4), &roster), 8.0);
        assert_eq!(roster_capacity_on(date(2024, 1, 6), &roster), 0.0);
    }

    #[test]
    fn test_unknown_employee_is_zero() {
        let roster = Roster::default();
        let workload = daily_workload(date(2024, 1, 1), &[], &roster, Some(Uuid::new_v4()));
        assert_eq!(workload, DailyWorkload::ZERO);
    }

    #[test]
    fn test_negative_hours_are_not_validated() {
        let ada = Employee::new(Uuid::new_v4(), "Ada", 40.0);
        let roster = Roster::new(vec![ada.clone()]);
        let day = date(2024, 1, 1);
        let item = instance(day, DateRange::single(day), -4.0, Some(&ada), InstanceKind::Recurring);

        let workload = daily_workload(day, &[item], &roster, Some(ada.id));
        assert_eq!(workload.hours, -4.0);
        assert_eq!(workload.percentage, -50.0);
        assert_eq!(workload.utilization(), Utilization::UnderUtilized);
    }
}
