//! In-memory reshaping of aggregate query rows into dashboard payloads.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

pub mod category;
pub mod comparison;
pub mod format;
pub mod ranking;

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn days(&self) -> i64 {
        format::inclusive_days(self.start, self.end)
    }

    /// The same window one calendar year earlier.
    pub fn prior_year(&self) -> Self {
        Self {
            start: format::one_year_earlier(self.start),
            end: format::one_year_earlier(self.end),
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{} - {}, {}",
            format::chart_label(self.start),
            format::chart_label(self.end),
            self.end.year()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DateRange {
    pub start: String,
    pub end: String,
    pub label: String,
}

impl From<DateWindow> for DateRange {
    fn from(window: DateWindow) -> Self {
        Self {
            start: format::iso_date(window.start),
            end: format::iso_date(window.end),
            label: window.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_rejects_inverted_range() {
        assert!(DateWindow::new(date(2024, 1, 7), date(2024, 1, 1)).is_none());
        assert!(DateWindow::new(date(2024, 1, 1), date(2024, 1, 1)).is_some());
    }

    #[test]
    fn test_prior_year_window() {
        let window = DateWindow::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap();
        let prior = window.prior_year();
        assert_eq!(prior.start, date(2023, 2, 1));
        assert_eq!(prior.end, date(2023, 2, 28));
        assert_eq!(window.days(), 29);
    }

    #[test]
    fn test_date_range_serialization() {
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 1, 7)).unwrap();
        let range = DateRange::from(window);
        assert_eq!(range.start, "2024-01-01");
        assert_eq!(range.end, "2024-01-07");
        assert_eq!(range.label, "Jan 01 - Jan 07, 2024");
    }
}
