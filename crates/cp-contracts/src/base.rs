//! Base contract system

use cp_core::error::ValidationErrors;
pub use cp_core::result::ValidationResult;

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Validate the entity
    fn validate(&self, entity: &T) -> ValidationResult;

    /// Validate a batch, nesting each entity's errors under `label[index]`
    fn validate_all(&self, label: &str, entities: &[T]) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        for (index, entity) in entities.iter().enumerate() {
            if let Err(nested) = self.validate(entity) {
                errors.merge_prefixed(&format!("{}[{}]", label, index), nested);
            }
        }
        errors.into_result()
    }
}

/// Check an hour figure is finite and within `0..=max`
pub(crate) fn validate_hours(field: &str, hours: f64, max: f64, errors: &mut ValidationErrors) {
    if !hours.is_finite() {
        errors.add(field, "must be a number");
    } else if hours < 0.0 {
        errors.add(field, "must be greater than or equal to 0");
    } else if hours > max {
        errors.add(field, format!("must be less than or equal to {}", max));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NonNegative;

    impl Contract<f64> for NonNegative {
        fn validate(&self, entity: &f64) -> ValidationResult {
            let mut errors = ValidationErrors::new();
            validate_hours("hours", *entity, 24.0, &mut errors);
            errors.into_result()
        }
    }

    #[test]
    fn test_validate_all_prefixes_errors() {
        let result = NonNegative.validate_all("values", &[1.0, -1.0, 30.0]);
        let errors = result.unwrap_err();
        assert!(!errors.has_error("values[0].hours"));
        assert!(errors.has_error("values[1].hours"));
        assert!(errors.has_error("values[2].hours"));
    }

    #[test]
    fn test_validate_hours_rejects_nan() {
        let mut errors = ValidationErrors::new();
        validate_hours("hours", f64::NAN, 24.0, &mut errors);
        assert_eq!(errors.get("hours").unwrap(), &vec!["must be a number".to_string()]);
    }
}
