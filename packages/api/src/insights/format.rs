//! Date and number helpers shared by the dashboard computations.

use chrono::{Months, NaiveDate};

pub const ISO_DATE: &str = "%Y-%m-%d";

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE).ok()
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// Short label used on chart axes, e.g. `Jan 05`
pub fn chart_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// Same calendar date one year earlier. Feb 29 lands on Feb 28.
pub fn one_year_earlier(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(12)).unwrap_or(date)
}

/// Number of calendar days in `[start, end]`, both inclusive.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Growth in percent with the dashboard's zero-base policy: growth from
/// nothing counts as a flat 100%, no movement from nothing is 0%.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 { 100.0 } else { 0.0 }
    } else {
        (current - previous) / previous * 100.0
    }
}

pub type Rgb = (u8, u8, u8);

pub const BEST_COLOR: Rgb = (34, 197, 94);
pub const WORST_COLOR: Rgb = (239, 68, 68);

/// Linear blend between `from` (t = 0) and `to` (t = 1) as a CSS color.
pub fn interpolate_color(from: Rgb, to: Rgb, t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    format!(
        "rgba({}, {}, {}, 0.8)",
        lerp(from.0, to.0),
        lerp(from.1, to.1),
        lerp(from.2, to.2)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2024-01-07"), Some(date(2024, 1, 7)));
        assert_eq!(parse_iso_date(" 2024-01-07 "), Some(date(2024, 1, 7)));
        assert_eq!(parse_iso_date("01/07/2024"), None);
        assert_eq!(parse_iso_date("2024-02-30"), None);
    }

    #[test]
    fn test_one_year_earlier_is_calendar_subtraction() {
        assert_eq!(one_year_earlier(date(2024, 3, 1)), date(2023, 3, 1));
        assert_eq!(one_year_earlier(date(2024, 2, 29)), date(2023, 2, 28));
        assert_eq!(one_year_earlier(date(2025, 3, 1)), date(2024, 3, 1));
    }

    #[test]
    fn test_inclusive_days() {
        assert_eq!(inclusive_days(date(2024, 1, 1), date(2024, 1, 7)), 7);
        assert_eq!(inclusive_days(date(2024, 1, 1), date(2024, 1, 1)), 1);
    }

    #[test]
    fn test_percent_change_zero_base() {
        assert_eq!(percent_change(100.0, 0.0), 100.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert_eq!(percent_change(500.0, 250.0), 100.0);
        assert_eq!(percent_change(0.0, 300.0), -100.0);
    }

    #[test]
    fn test_interpolate_color_endpoints() {
        assert_eq!(
            interpolate_color(BEST_COLOR, WORST_COLOR, 0.0),
            "rgba(34, 197, 94, 0.8)"
        );
        assert_eq!(
            interpolate_color(BEST_COLOR, WORST_COLOR, 1.0),
            "rgba(239, 68, 68, 0.8)"
        );
        assert_eq!(
            interpolate_color(BEST_COLOR, WORST_COLOR, 7.0),
            "rgba(239, 68, 68, 0.8)"
        );
    }

    #[test]
    fn test_chart_label() {
        assert_eq!(chart_label(date(2024, 1, 5)), "Jan 05");
        assert_eq!(round2(12.345_6), 12.35);
    }
}
