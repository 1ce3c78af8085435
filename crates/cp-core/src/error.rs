//! Core error types for Capacity Planner
//!
//! The scheduling engine itself never fails on arithmetic; every error here
//! originates at a boundary (record parsing, configuration, snapshot loading).

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Core error type for all planner operations
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Not found: {entity} with id={value}")]
    NotFound { entity: &'static str, value: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl PlanError {
    /// Shorthand for a validation failure on a single field
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        PlanError::Validation(errors)
    }

    pub fn not_found(entity: &'static str, value: impl ToString) -> Self {
        PlanError::NotFound {
            entity,
            value: value.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PlanError::Validation(_) => "validation_failed",
            PlanError::NotFound { .. } => "not_found",
            PlanError::Config(_) => "configuration_error",
            PlanError::Snapshot(_) => "snapshot_error",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, PlanError::Validation(_))
    }
}

/// Validation errors collection
///
/// Field names are kept ordered so that `full_messages` is stable.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: BTreeMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    /// Nest another collection under a field prefix, e.g. `exceptions[2].date`
    pub fn merge_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors
                .entry(format!("{}.{}", prefix, field))
                .or_default()
                .extend(messages);
        }
        for message in other.base_errors {
            self.add(prefix, message);
        }
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// `Ok(())` when empty, otherwise the collected errors
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_messages_are_ordered() {
        let mut errors = ValidationErrors::new();
        errors.add("start_date", "is not a valid date");
        errors.add("end_date", "must be on or after start_date");
        errors.add_base("task is invalid");

        assert_eq!(
            errors.full_messages(),
            vec![
                "task is invalid".to_string(),
                "end_date must be on or after start_date".to_string(),
                "start_date is not a valid date".to_string(),
            ]
        );
    }

    #[test]
    fn test_merge_prefixed() {
        let mut inner = ValidationErrors::new();
        inner.add("date", "is not a valid date");
        inner.add_base("is broken");

        let mut outer = ValidationErrors::new();
        outer.merge_prefixed("exceptions[1]", inner);

        assert!(outer.has_error("exceptions[1].date"));
        assert_eq!(outer.get("exceptions[1]").unwrap(), &vec!["is broken".to_string()]);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(PlanError::invalid("x", "bad").error_code(), "validation_failed");
        assert_eq!(PlanError::not_found("task", 7).error_code(), "not_found");
        assert!(PlanError::invalid("x", "bad").is_validation());
        assert!(!PlanError::Config("oops".into()).is_validation());
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add("repeat_days", "can't be blank");
        assert!(errors.into_result().is_err());
    }
}
