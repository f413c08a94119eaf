use crate::error::{ReconciliationError, Result};
use chrono::{Datelike, Days, Months, NaiveDate};

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .checked_sub_days(Days::new(1))
        .unwrap()
}

pub fn prev_month_end(date: NaiveDate) -> NaiveDate {
    let year = if date.month() == 1 {
        date.year() - 1
    } else {
        date.year()
    };

    let month = if date.month() == 1 {
        12
    } else {
        date.month() - 1
    };

    last_day_of_month(year, month)
}

/// Start of the six-month lookback window for an anchor due date: the end of
/// the month before the anchor, shifted back five calendar months.
///
/// Month subtraction clamps the day when the target month is shorter, so the
/// start is not always a month end (anchor 2024-03-31 yields 2023-09-29).
pub fn lookback_window_start(anchor: NaiveDate) -> NaiveDate {
    prev_month_end(anchor)
        .checked_sub_months(Months::new(5))
        .unwrap()
}

/// Formats a date as its `"YYYY-MM"` month key. Lexicographic order on keys
/// equals chronological order on months.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Parses a `"YYYY-MM-DD"` due-date string as submitted by the report form.
pub fn parse_due_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ReconciliationError::InvalidDueDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(
            last_day_of_month(2023, 2),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
        assert_eq!(
            last_day_of_month(2024, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            last_day_of_month(2023, 12),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_prev_month_end() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(
            prev_month_end(date),
            NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()
        );

        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(
            prev_month_end(date),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_lookback_window_start() {
        // Anchor 2024-06-15: end of May, minus five months.
        let anchor = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(
            lookback_window_start(anchor),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );

        // Anchor 2024-03-31: end of February is the 29th, and subtracting
        // five months keeps the clamped day.
        let anchor = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(
            lookback_window_start(anchor),
            NaiveDate::from_ymd_opt(2023, 9, 29).unwrap()
        );
    }

    #[test]
    fn test_month_key() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(month_key(date), "2024-06");

        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(month_key(date), "2023-12");
    }

    #[test]
    fn test_parse_due_date() {
        let parsed = parse_due_date("2024-06-15").unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());

        let parsed = parse_due_date(" 2024-06-15 ").unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());

        assert!(parse_due_date("15/06/2024").is_err());
        assert!(parse_due_date("").is_err());
    }
}
