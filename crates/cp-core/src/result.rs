//! Result type aliases

use crate::error::{PlanError, ValidationErrors};

/// Standard Result type for planner operations
pub type PlanResult<T> = Result<T, PlanError>;

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;
