//! Calendar primitives
//!
//! All dates in the planner are UTC calendar dates (`NaiveDate`) exchanged as
//! `YYYY-MM-DD`. There is no time-of-day anywhere in the engine, so weekday
//! boundaries can never shift with the host timezone.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PlanError;
use crate::result::PlanResult;

/// Wire format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date.
///
/// Datetimes (with a time or offset component) are rejected rather than
/// truncated.
pub fn parse_date(field: &str, value: &str) -> PlanResult<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.len() != 10 {
        return Err(PlanError::invalid(field, format!("'{}' is not a YYYY-MM-DD date", value)));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| PlanError::invalid(field, format!("'{}' is not a valid date", value)))
}

/// Format a date the way it is exchanged at every boundary
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Lowercase English weekday name (`"monday"` ...)
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "sunday",
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
    }
}

/// Parse a weekday name, case-insensitive
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim().to_ascii_lowercase().as_str() {
        "sunday" => Some(Weekday::Sun),
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        _ => None,
    }
}

/// A set of weekdays stored as a bitmask (bit 0 = Sunday).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);
    /// Monday through Friday
    pub const WORK_WEEK: WeekdaySet = WeekdaySet(0b0011_1110);
    pub const ALL: WeekdaySet = WeekdaySet(0b0111_1111);

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_sunday()
    }

    pub fn from_days(days: impl IntoIterator<Item = Weekday>) -> Self {
        days.into_iter().fold(Self::EMPTY, |set, day| set.with(day))
    }

    /// Parse a list of weekday names, reporting every unknown name
    pub fn parse<S: AsRef<str>>(field: &str, names: &[S]) -> PlanResult<Self> {
        let mut set = Self::EMPTY;
        let mut unknown = Vec::new();
        for name in names {
            match parse_weekday(name.as_ref()) {
                Some(day) => set = set.with(day),
                None => unknown.push(name.as_ref().to_string()),
            }
        }
        if unknown.is_empty() {
            Ok(set)
        } else {
            Err(PlanError::invalid(
                field,
                format!("contains unknown weekday(s): {}", unknown.join(", ")),
            ))
        }
    }

    /// Working days with the Monday..Friday fallback for an empty set
    pub fn or_work_week(self) -> Self {
        if self.is_empty() {
            Self::WORK_WEEK
        } else {
            self
        }
    }

    pub fn with(self, day: Weekday) -> Self {
        WeekdaySet(self.0 | Self::bit(day))
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    /// Whether the weekday of `date` is in the set
    pub fn includes(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Days in Sunday-first order
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        let mut day = Weekday::Sun;
        (0..7).filter_map(move |_| {
            let current = day;
            day = day.succ();
            self.contains(current).then_some(current)
        })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(weekday_name).collect()
    }
}

impl fmt::Debug for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        Self::from_days(iter)
    }
}

impl Serialize for WeekdaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

impl<'de> Deserialize<'de> for WeekdaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        let mut set = Self::EMPTY;
        for name in &names {
            let day = parse_weekday(name)
                .ok_or_else(|| de::Error::custom(format!("unknown weekday '{}'", name)))?;
            set = set.with(day);
        }
        Ok(set)
    }
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `end < start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> PlanResult<Self> {
        if end < start {
            return Err(PlanError::invalid(
                "end_date",
                format!(
                    "{} must be on or after start_date {}",
                    format_date(end),
                    format_date(start)
                ),
            ));
        }
        Ok(Self { start, end })
    }

    /// Parse both ends from `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> PlanResult<Self> {
        let start = parse_date("start_date", start)?;
        let end = parse_date("end_date", end)?;
        Self::new(start, end)
    }

    pub fn single(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Overlap of two ranges, `None` when disjoint
    pub fn intersect(&self, other: &DateRange) -> Option<DateRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(DateRange { start, end })
    }

    /// Number of calendar days, both ends included
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    /// Count days in the range whose weekday is in `days`
    pub fn count_weekdays(&self, days: WeekdaySet) -> u32 {
        self.days().filter(|day| days.includes(*day)).count() as u32
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", format_date(self.start), format_date(self.end))
    }
}
