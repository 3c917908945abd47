//! Business-day boundary resolution.
//!
//! The store runs on Manila time, a fixed UTC+8 offset with no daylight
//! saving. Every date-scoped read in the crate (sales, expenses, grid
//! partitioning, movement statistics) resolves its `[start, end]` bounds
//! through this module so independently maintained read paths can never
//! drift across a day boundary.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::errors::ServiceError;

/// Fixed offset of the business timezone from UTC, in hours.
pub const BUSINESS_UTC_OFFSET_HOURS: i64 = 8;

/// A closed interval of UTC instants covering one business day:
/// local `00:00:00.000` through local `23:59:59.999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayBounds {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Resolves an optional `YYYY-MM-DD` date string into UTC day bounds.
///
/// `None` means "today" as observed at UTC+8. An unparsable string is a
/// caller error and never silently falls back to today. Resolving the same
/// date twice yields identical bounds.
pub fn business_day_bounds(date: Option<&str>) -> Result<DayBounds, ServiceError> {
    let day = match date {
        Some(raw) => parse_date(raw)?,
        None => current_business_date(),
    };
    Ok(bounds_for_date(day))
}

/// Bounds for an already-parsed calendar date.
pub fn bounds_for_date(day: NaiveDate) -> DayBounds {
    let offset = Duration::hours(BUSINESS_UTC_OFFSET_HOURS);

    // Both timestamps are valid for every calendar date chrono can represent.
    let local_midnight = day.and_hms_opt(0, 0, 0).expect("midnight is always valid");
    let local_day_end = day
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("end of day is always valid");

    DayBounds {
        start: DateTime::<Utc>::from_naive_utc_and_offset(local_midnight - offset, Utc),
        end: DateTime::<Utc>::from_naive_utc_and_offset(local_day_end - offset, Utc),
    }
}

/// The calendar date currently in effect at UTC+8.
pub fn current_business_date() -> NaiveDate {
    (Utc::now() + Duration::hours(BUSINESS_UTC_OFFSET_HOURS)).date_naive()
}

fn parse_date(raw: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| ServiceError::ValidationError(format!("Invalid date '{}': {}", raw, e)))
}
