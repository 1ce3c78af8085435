//! # cp-models
//!
//! Domain models for Capacity Planner.
//!
//! Every entity has two shapes: a flat wire record (`*Record`) exactly as the
//! persistence layer stores it, and a validated model built from it with
//! `TryFrom`. Models deserialize through their record, so malformed dates or
//! weekday names never make it past the boundary.

pub use cp_core::traits::{Assignable, Id, Identifiable};

pub mod employee;
pub mod exception;
pub mod instance;
pub mod roster;
pub mod task;

mod serde_util;

pub use employee::{Employee, EmployeeRecord};
pub use exception::{AssigneeOverride, EditChange, ExceptionEdit, ExceptionRecord, TaskException};
pub use instance::{InstanceKind, TaskInstance};
pub use roster::Roster;
pub use task::{OccurrenceDefaults, Schedule, Task, TaskRecord, WeeklyRule};
