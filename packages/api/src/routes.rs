use crate::bad_request;
use crate::error::ApiError;
use crate::insights::{DateWindow, format::parse_iso_date};

pub mod comparison;
pub mod health;
pub mod rankings;
pub mod webhook;

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Reads the required `startDate`/`endDate` pair.
pub(crate) fn parse_window(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<DateWindow, ApiError> {
    let (Some(start), Some(end)) = (present(start_date), present(end_date)) else {
        return Err(bad_request!("startDate and endDate are required"));
    };

    let start = parse_iso_date(start)
        .ok_or_else(|| bad_request!("Invalid startDate: {start}, expected YYYY-MM-DD"))?;
    let end = parse_iso_date(end)
        .ok_or_else(|| bad_request!("Invalid endDate: {end}, expected YYYY-MM-DD"))?;

    DateWindow::new(start, end).ok_or_else(|| bad_request!("startDate must not be after endDate"))
}

/// Optional non-negative integer parameter with a default.
pub(crate) fn parse_count(name: &str, value: Option<&str>, default: i64) -> Result<i64, ApiError> {
    match present(value) {
        None => Ok(default),
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n >= 0 => Ok(n),
            _ => Err(bad_request!("{name} must be a non-negative integer, got {raw}")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_parse_window_requires_both_dates() {
        for (start, end) in [
            (None, Some("2024-01-07")),
            (Some("2024-01-01"), None),
            (Some(""), Some("2024-01-07")),
        ] {
            let err = parse_window(start, end).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_parse_window_rejects_bad_input() {
        assert!(parse_window(Some("2024-13-01"), Some("2024-12-31")).is_err());
        assert!(parse_window(Some("2024-01-07"), Some("2024-01-01")).is_err());
        let window = parse_window(Some("2024-01-01"), Some("2024-01-07")).unwrap();
        assert_eq!(window.days(), 7);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("minVisitors", None, 100).unwrap(), 100);
        assert_eq!(parse_count("minVisitors", Some(" 0 "), 100).unwrap(), 0);
        assert_eq!(parse_count("minOrders", Some("12"), 5).unwrap(), 12);
        assert!(parse_count("minOrders", Some("-1"), 5).is_err());
        assert!(parse_count("minOrders", Some("ten"), 5).is_err());
    }
}
