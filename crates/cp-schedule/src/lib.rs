//! # cp-schedule
//!
//! The scheduling engine of Capacity Planner.
//!
//! - [`expander`] turns a task into dated [`TaskInstance`]s for a date or range
//! - [`workload`] turns the instances of one date into hours, capacity and a
//!   utilization percentage, for one employee or the whole roster
//! - [`exceptions`] merges per-date edits into a weekly task's exceptions
//! - [`window`] resolves day/week/month views around an explicit reference date
//! - [`grid`] builds the employee x date workload matrix shown by schedulers
//!
//! Everything here is pure: no I/O, no clock, no shared state. Callers pass
//! a snapshot of tasks and employees and may call in parallel freely.
//!
//! [`TaskInstance`]: cp_models::TaskInstance

pub mod exceptions;
pub mod expander;
pub mod grid;
pub mod window;
pub mod workload;

pub use exceptions::{apply_exception_edits, merge_exceptions};
pub use expander::{
    expand, expand_on, instances_for_date, instances_in_range, next_occurrences, occurrences,
    DateSpan, Occurrences,
};
pub use grid::{GridCell, GridRow, WorkloadGrid};
pub use window::{days_starting, month_containing, week_containing, ViewWindow};
pub use workload::{
    daily_workload, instance_hours, roster_capacity_on, working_days_in_range, DailyWorkload,
    Utilization,
};
