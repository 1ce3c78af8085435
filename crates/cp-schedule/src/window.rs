//! Visible date windows around an explicit reference date
//!
//! Schedulers default to "this week" or "this month". The reference date is
//! always a parameter; nothing in this crate reads the clock.

use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use cp_core::calendar::DateRange;
use cp_core::config::CalendarConfig;
use cp_core::error::PlanError;
use serde::{Deserialize, Serialize};

/// The seven days starting on the last `first_day` on or before `reference`
pub fn week_containing(reference: NaiveDate, first_day: Weekday) -> DateRange {
    let offset = (reference.weekday().num_days_from_sunday() + 7
        - first_day.num_days_from_sunday())
        % 7;
    let start = shift(reference, -i64::from(offset));
    DateRange {
        start,
        end: shift(start, 6),
    }
}

/// The calendar month of `reference`
pub fn month_containing(reference: NaiveDate) -> DateRange {
    let start = reference.with_day(1).unwrap_or(reference);
    let end = start
        .iter_days()
        .take_while(|day| day.month() == start.month())
        .last()
        .unwrap_or(start);
    DateRange { start, end }
}

/// `days` consecutive days starting at `reference` (at least one)
pub fn days_starting(reference: NaiveDate, days: u32) -> DateRange {
    DateRange {
        start: reference,
        end: shift(reference, i64::from(days.max(1) - 1)),
    }
}

/// `date` moved by `days`, clamped to the representable calendar
fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    let moved = if days < 0 {
        date.checked_sub_signed(Duration::days(-days))
    } else {
        date.checked_add_signed(Duration::days(days))
    };
    moved.unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Named views offered by schedulers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewWindow {
    Day,
    #[default]
    Week,
    Month,
}

impl ViewWindow {
    pub fn resolve(self, reference: NaiveDate, calendar: &CalendarConfig) -> DateRange {
        match self {
            ViewWindow::Day => DateRange::single(reference),
            ViewWindow::Week => week_containing(reference, calendar.week_start()),
            ViewWindow::Month => month_containing(reference),
        }
    }
}

impl FromStr for ViewWindow {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(ViewWindow::Day),
            "week" => Ok(ViewWindow::Week),
            "month" => Ok(ViewWindow::Month),
            other => Err(PlanError::invalid(
                "view",
                format!("'{}' is not one of day, week, month", other),
            )),
        }
    }
}
