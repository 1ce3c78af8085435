//! # cp-contracts
//!
//! Contract validation for Capacity Planner.
//!
//! Records that parse into models are already well-formed enough for the
//! scheduling engine. Contracts add the stricter checks an editing form
//! applies before anything is written: sane hour ranges, known assignees,
//! a stored estimate that agrees with the weekly rule.

pub mod base;
pub mod employees;
pub mod exceptions;
pub mod tasks;

pub use base::*;
pub use employees::EmployeeContract;
pub use exceptions::ExceptionEditContract;
pub use tasks::TaskContract;

/// Upper bound for any single-day hour figure
pub const MAX_HOURS_PER_DAY: f64 = 24.0;

/// Upper bound for weekly capacity
pub const MAX_WEEKLY_HOURS: f64 = 168.0;
