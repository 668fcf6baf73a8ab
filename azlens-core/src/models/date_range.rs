//! `YYYY-MM-DD` query windows.

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Date format used on every external surface.
const DATE_FMT: &str = "%Y-%m-%d";

/// Number of trailing days in the default range.
const DEFAULT_TRAILING_DAYS: u64 = 30;

/// An inclusive date range in `YYYY-MM-DD` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range.
    pub start: String,
    /// Last day of the range.
    pub end: String,
}

impl DateRange {
    /// Creates a range after validating both dates and their order.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self, CoreError> {
        let start = start.into();
        let end = end.into();

        let start_date = parse_date(&start)?;
        let end_date = parse_date(&end)?;

        if start_date > end_date {
            return Err(CoreError::InvalidRange { start, end });
        }

        Ok(Self { start, end })
    }

    /// The default range: the trailing 30 days ending today.
    pub fn trailing_30_days() -> Self {
        Self::trailing_days(DEFAULT_TRAILING_DAYS)
    }

    /// The trailing `days` days ending today.
    pub fn trailing_days(days: u64) -> Self {
        let end = Utc::now().date_naive();
        let start = end.checked_sub_days(Days::new(days)).unwrap_or(end);
        Self {
            start: start.format(DATE_FMT).to_string(),
            end: end.format(DATE_FMT).to_string(),
        }
    }

    /// The cache key for this range: `"<start>_<end>"`.
    pub fn cache_key(&self) -> String {
        format!("{}_{}", self.start, self.end)
    }

    /// Range start as an ISO-8601 date-time at midnight UTC.
    pub fn start_datetime(&self) -> String {
        format!("{}T00:00:00+00:00", self.start)
    }

    /// Range end as an ISO-8601 date-time at the end of the day UTC.
    pub fn end_datetime(&self) -> String {
        format!("{}T23:59:59+00:00", self.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} – {}", self.start, self.end)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|_| CoreError::InvalidDate(s.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
