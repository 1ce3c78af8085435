//! Occurrence expansion
//!
//! A one-off task yields one instance for every date of its window that is
//! asked about. A weekly task yields one instance per date that lies in its
//! window and falls on one of its repeat days, shaped by the exception for
//! that date if there is one.

use std::iter::FusedIterator;

use chrono::NaiveDate;
use cp_core::calendar::DateRange;
use cp_models::{InstanceKind, Roster, Schedule, Task, TaskException, TaskInstance, WeeklyRule};
use tracing::{instrument, trace};

/// A single date or an inclusive range of dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpan {
    Day(NaiveDate),
    Range(DateRange),
}

impl DateSpan {
    pub fn as_range(&self) -> DateRange {
        match self {
            DateSpan::Day(date) => DateRange::single(*date),
            DateSpan::Range(range) => *range,
        }
    }
}

impl From<NaiveDate> for DateSpan {
    fn from(date: NaiveDate) -> Self {
        DateSpan::Day(date)
    }
}

impl From<DateRange> for DateSpan {
    fn from(range: DateRange) -> Self {
        DateSpan::Range(range)
    }
}

/// All instances of `task` inside `span`, in date order
#[instrument(level = "trace", skip_all, fields(task_id = %task.id))]
pub fn expand(task: &Task, span: impl Into<DateSpan>, roster: &Roster) -> Vec<TaskInstance> {
    let Some(range) = task.window.intersect(&span.into().as_range()) else {
        return Vec::new();
    };

    match &task.schedule {
        Schedule::Once => range
            .days()
            .map(|date| one_off_instance(task, date, roster))
            .collect(),
        Schedule::Weekly(rule) => {
            let exceptions = rule.exception_index();
            range
                .days()
                .filter_map(|date| {
                    weekly_instance(task, rule, exceptions.get(&date).copied(), date, roster)
                })
                .collect()
        }
    }
}

/// The instance of `task` on `date`, if it has one
pub fn expand_on(task: &Task, date: NaiveDate, roster: &Roster) -> Option<TaskInstance> {
    if !task.window.contains(date) {
        return None;
    }
    match &task.schedule {
        Schedule::Once => Some(one_off_instance(task, date, roster)),
        Schedule::Weekly(rule) => weekly_instance(task, rule, rule.exception_on(date), date, roster),
    }
}

/// Lazily walk the instances of `task` on or after `from`
pub fn occurrences<'a>(task: &'a Task, from: NaiveDate, roster: &'a Roster) -> Occurrences<'a> {
    Occurrences {
        task,
        roster,
        cursor: Some(from.max(task.start_date())),
    }
}

/// The next `limit` instances of `task` on or after `from`
pub fn next_occurrences(
    task: &Task,
    from: NaiveDate,
    limit: usize,
    roster: &Roster,
) -> Vec<TaskInstance> {
    occurrences(task, from, roster).take(limit).collect()
}

/// Every instance of every task on one calendar date
pub fn instances_for_date(tasks: &[Task], date: NaiveDate, roster: &Roster) -> Vec<TaskInstance> {
    tasks
        .iter()
        .filter_map(|task| expand_on(task, date, roster))
        .collect()
}

/// Every instance of every task in `range`, grouped by task
pub fn instances_in_range(tasks: &[Task], range: DateRange, roster: &Roster) -> Vec<TaskInstance> {
    tasks
        .iter()
        .flat_map(|task| expand(task, range, roster))
        .collect()
}

/// Iterator returned by [`occurrences`]
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    task: &'a Task,
    roster: &'a Roster,
    cursor: Option<NaiveDate>,
}

impl Iterator for Occurrences<'_> {
    type Item = TaskInstance;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(date) = self.cursor {
            if date > self.task.end_date() {
                self.cursor = None;
                break;
            }
            self.cursor = date.succ_opt();
            if let Some(instance) = expand_on(self.task, date, self.roster) {
                return Some(instance);
            }
        }
        None
    }
}

impl FusedIterator for Occurrences<'_> {}

fn one_off_instance(task: &Task, date: NaiveDate, roster: &Roster) -> TaskInstance {
    TaskInstance {
        task_id: task.id,
        title: task.title.clone(),
        project_id: task.project_id,
        window: task.window,
        instance_date: date,
        estimated_time: task.estimated_time,
        assigned_employee_id: task.assigned_employee_id,
        assignee_working_days: roster.working_days_of(task.assigned_employee_id),
        kind: InstanceKind::OneOff,
    }
}

fn weekly_instance(
    task: &Task,
    rule: &WeeklyRule,
    exception: Option<&TaskException>,
    date: NaiveDate,
    roster: &Roster,
) -> Option<TaskInstance> {
    if !rule.repeat_days.includes(date) {
        return None;
    }

    let (hours, assignee, kind) = match exception {
        Some(exception) if exception.is_removed => {
            trace!(task_id = %task.id, %date, "Occurrence removed by exception");
            return None;
        }
        Some(exception) => (
            exception.hours_or(rule.hours_per_day),
            exception.assignee.resolve(task.assigned_employee_id),
            InstanceKind::Exception,
        ),
        None => (
            rule.default_hours(),
            task.assigned_employee_id,
            InstanceKind::Recurring,
        ),
    };

    Some(TaskInstance {
        task_id: task.id,
        title: task.title.clone(),
        project_id: task.project_id,
        window: task.window,
        instance_date: date,
        estimated_time: hours,
        assigned_employee_id: assignee,
        assignee_working_days: roster.working_days_of(assignee),
        kind,
    })
}
