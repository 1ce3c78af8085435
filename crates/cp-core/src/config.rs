//! Configuration types and loading
//!
//! Defaults are compiled in; a TOML/YAML/JSON file and `PLANNER__*`
//! environment variables may override them.

use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::calendar::DateRange;
use crate::error::PlanError;
use crate::result::PlanResult;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PlannerConfig {
    /// Calendar conventions for windows and display
    pub calendar: CalendarConfig,

    /// Caps applied to caller queries
    pub limits: LimitsConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CalendarConfig {
    /// First day of week (0 = Sunday, 1 = Monday)
    pub first_day_of_week: u8,
    /// Display format for dates in tables
    pub date_format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LimitsConfig {
    /// Number of upcoming occurrences listed when the caller gives no limit
    pub default_occurrence_limit: usize,
    /// Longest date range a workload grid may span
    pub max_range_days: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            calendar: CalendarConfig {
                first_day_of_week: 1,
                date_format: "%Y-%m-%d".to_string(),
            },
            limits: LimitsConfig {
                default_occurrence_limit: 10,
                max_range_days: 366,
            },
            logging: LoggingConfig {
                filter: "info,cp_schedule=debug".to_string(),
                json: false,
            },
        }
    }
}

impl LimitsConfig {
    /// Reject ranges longer than `max_range_days`
    pub fn check_range(&self, range: DateRange) -> PlanResult<()> {
        if range.num_days() > i64::from(self.max_range_days) {
            return Err(PlanError::invalid(
                "range",
                format!(
                    "spans {} days, more than the maximum of {}",
                    range.num_days(),
                    self.max_range_days
                ),
            ));
        }
        Ok(())
    }
}

impl CalendarConfig {
    /// The configured first day of the week
    pub fn week_start(&self) -> Weekday {
        match self.first_day_of_week {
            0 => Weekday::Sun,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            _ => Weekday::Mon,
        }
    }
}

impl PlannerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> PlanResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with variables read through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PlanResult<Self> {
        let mut config = Self::default();

        if let Some(day) = parse_var(&lookup, "PLANNER_FIRST_DAY_OF_WEEK")? {
            config.calendar.first_day_of_week = day;
        }
        if let Some(format) = lookup("PLANNER_DATE_FORMAT") {
            config.calendar.date_format = format;
        }
        if let Some(limit) = parse_var(&lookup, "PLANNER_OCCURRENCE_LIMIT")? {
            config.limits.default_occurrence_limit = limit;
        }
        if let Some(days) = parse_var(&lookup, "PLANNER_MAX_RANGE_DAYS")? {
            config.limits.max_range_days = days;
        }

        let parse_bool = |v: String| v == "true" || v == "1" || v == "yes";
        if let Some(v) = lookup("PLANNER_LOG_JSON") {
            config.logging.json = parse_bool(v);
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.logging.filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    /// Layer defaults, an optional config file and `PLANNER__SECTION__KEY`
    /// environment variables.
    pub fn load(path: Option<&str>) -> PlanResult<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .map_err(|e| PlanError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("PLANNER")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| PlanError::Config(e.to_string()))?;

        config.validate()?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> PlanResult<()> {
        if self.calendar.first_day_of_week > 6 {
            return Err(PlanError::Config(format!(
                "calendar.first_day_of_week must be 0..=6, got {}",
                self.calendar.first_day_of_week
            )));
        }
        if self.limits.max_range_days == 0 {
            return Err(PlanError::Config("limits.max_range_days must be positive".into()));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> PlanResult<Option<T>> {
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| PlanError::Config(format!("{} is not a valid number: {}", name, value)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.calendar.first_day_of_week, 1);
        assert_eq!(config.calendar.week_start(), Weekday::Mon);
        assert_eq!(config.limits.max_range_days, 366);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_week_start() {
        let mut config = PlannerConfig::default();
        config.calendar.first_day_of_week = 0;
        assert_eq!(config.calendar.week_start(), Weekday::Sun);
        config.calendar.first_day_of_week = 6;
        assert_eq!(config.calendar.week_start(), Weekday::Sat);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PlannerConfig::default();
        config.calendar.first_day_of_week = 9;
        assert!(matches!(config.validate(), Err(PlanError::Config(_))));

        let mut config = PlannerConfig::default();
        config.limits.max_range_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup_reads_variables() {
        let vars = HashMap::from([
            ("PLANNER_FIRST_DAY_OF_WEEK", "0"),
            ("PLANNER_OCCURRENCE_LIMIT", "25"),
            ("PLANNER_MAX_RANGE_DAYS", " 31 "),
            ("PLANNER_LOG_JSON", "yes"),
        ]);
        let config = PlannerConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(config.calendar.week_start(), Weekday::Sun);
        assert_eq!(config.limits.default_occurrence_limit, 25);
        assert_eq!(config.limits.max_range_days, 31);
        assert!(config.logging.json);
    }

    #[test]
    fn test_from_lookup_rejects_malformed_numbers() {
        for name in [
            "PLANNER_FIRST_DAY_OF_WEEK",
            "PLANNER_OCCURRENCE_LIMIT",
            "PLANNER_MAX_RANGE_DAYS",
        ] {
            let err = PlannerConfig::from_lookup(|var| (var == name).then(|| "ten".to_string()))
                .unwrap_err();
            assert!(matches!(&err, PlanError::Config(message) if message.contains(name)));
        }
    }

    #[test]
    fn test_check_range() {
        let limits = LimitsConfig {
            default_occurrence_limit: 10,
            max_range_days: 7,
        };
        let week = DateRange::parse("2024-01-01", "2024-01-07").unwrap();
        assert!(limits.check_range(week).is_ok());

        let eight_days = DateRange::parse("2024-01-01", "2024-01-08").unwrap();
        let err = limits.check_range(eight_days).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = PlannerConfig::load(None).unwrap();
        assert_eq!(config.limits.default_occurrence_limit, 10);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = PlannerConfig::load(Some("/nonexistent/planner-config")).unwrap_err();
        assert_eq!(err.error_code(), "configuration_error");
    }
}
