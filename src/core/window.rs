// The trailing seven-day window used for daily totals

use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Number of days in the window, today included
pub const WINDOW_DAYS: i64 = 7;

/// Inclusive date range ending today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrailingWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TrailingWindow {
    /// The window from six days before `today` through `today`
    pub fn ending(today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(WINDOW_DAYS - 1),
            end: today,
        }
    }

    /// Start as stored in the table (`YYYY-MM-DD`)
    pub fn start_key(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// End as stored in the table (`YYYY-MM-DD`)
    pub fn end_key(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
