//! # Reporting Module
//!
//! Report filter parsing and time-window math.
//!
//! ## Filter Windows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  filter     window start (inclusive)          window end                │
//! │  ───────    ──────────────────────────        ──────────                │
//! │  daily      start of the current day          (open)                    │
//! │  weekly     now minus 7 days                  (open)                    │
//! │  monthly    first day of the current month    (open)                    │
//! │  yearly     January 1 of the current year     (open)                    │
//! │  all        no lower bound                    (open)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unrecognized filter strings behave as `all`. The frontend sends whatever
//! the dropdown holds; a typo must widen the report, never break it.
//!
//! All windows are computed in UTC against a caller-supplied `now`, keeping
//! this module free of clock reads and testable with fixed instants.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Time window selector for report queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReportFilter {
    All,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ReportFilter {
    /// Parses a filter from its query-string form.
    ///
    /// Case-insensitive; anything unrecognized (including the empty string)
    /// is `All`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "daily" => ReportFilter::Daily,
            "weekly" => ReportFilter::Weekly,
            "monthly" => ReportFilter::Monthly,
            "yearly" => ReportFilter::Yearly,
            _ => ReportFilter::All,
        }
    }

    /// Returns the canonical query-string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFilter::All => "all",
            ReportFilter::Daily => "daily",
            ReportFilter::Weekly => "weekly",
            ReportFilter::Monthly => "monthly",
            ReportFilter::Yearly => "yearly",
        }
    }

    /// Returns the inclusive lower bound of the window, or `None` when the
    /// filter places no bound.
    ///
    /// `weekly` is a rolling 7-day window from `now`; the calendar filters
    /// snap to midnight of their period start.
    pub fn window_start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = now.date_naive();

        match self {
            ReportFilter::All => None,
            ReportFilter::Daily => Some(day_start(today)),
            ReportFilter::Weekly => Some(now - Duration::days(7)),
            ReportFilter::Monthly => Some(day_start(today.with_day(1).unwrap_or(today))),
            ReportFilter::Yearly => {
                let jan_first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                Some(day_start(jan_first))
            }
        }
    }
}

impl Default for ReportFilter {
    fn default() -> Self {
        ReportFilter::All
    }
}

/// Midnight UTC on the given date.
fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 45).unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(ReportFilter::parse("daily"), ReportFilter::Daily);
        assert_eq!(ReportFilter::parse("WEEKLY"), ReportFilter::Weekly);
        assert_eq!(ReportFilter::parse(" monthly "), ReportFilter::Monthly);
        assert_eq!(ReportFilter::parse("yearly"), ReportFilter::Yearly);
        assert_eq!(ReportFilter::parse("all"), ReportFilter::All);

        // Unrecognized values widen to the full history, never error
        assert_eq!(ReportFilter::parse("fortnightly"), ReportFilter::All);
        assert_eq!(ReportFilter::parse(""), ReportFilter::All);
    }

    #[test]
    fn test_all_has_no_bound() {
        assert_eq!(ReportFilter::All.window_start(now()), None);
    }

    #[test]
    fn test_daily_window() {
        let start = ReportFilter::Daily.window_start(now()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_weekly_window_is_rolling() {
        let start = ReportFilter::Weekly.window_start(now()).unwrap();
        // Exactly 7 days back, keeping the time of day
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 8, 14, 30, 45).unwrap());
    }

    #[test]
    fn test_monthly_window() {
        let start = ReportFilter::Monthly.window_start(now()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_yearly_window() {
        let start = ReportFilter::Yearly.window_start(now()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_monthly_on_first_of_month() {
        let first = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let start = ReportFilter::Monthly.window_start(first).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }
}
