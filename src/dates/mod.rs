//! Calendar-month windowing for the recordings date range.
//!
//! The Zoom recordings listing endpoint only accepts spans of up to one
//! month per request, so a requested range is split into consecutive
//! month-bounded windows before listing.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};

/// An inclusive date sub-range bounded by a single calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Parse a YYYY-MM-DD date string.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date {raw:?}, expected YYYY-MM-DD"))
}

/// Split `[start, end]` into consecutive calendar-month windows.
///
/// The first window starts at `start`, the last ends at `end`, and every
/// window lies within a single month. A start after the end yields an
/// empty iterator.
pub fn month_windows(start: NaiveDate, end: NaiveDate) -> MonthWindows {
    MonthWindows { cursor: start, end }
}

pub struct MonthWindows {
    cursor: NaiveDate,
    end: NaiveDate,
}

impl Iterator for MonthWindows {
    type Item = DateWindow;

    fn next(&mut self) -> Option<DateWindow> {
        if self.cursor > self.end {
            return None;
        }
        let next_month = first_of_next_month(self.cursor);
        let window = DateWindow {
            from: self.cursor,
            to: (next_month - Duration::days(1)).min(self.end),
        };
        self.cursor = next_month;
        Some(window)
    }
}

/// First day of the month following `date`. Adding 32 days always lands in
/// the next month regardless of month length.
fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let advanced = date + Duration::days(32);
    advanced.with_day(1).unwrap_or(advanced)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_valid() {
        assert_eq!(parse_date("2022-06-01").unwrap(), date(2022, 6, 1));
    }

    #[test]
    fn test_parse_date_malformed() {
        assert!(parse_date("06/01/2022").is_err());
        assert!(parse_date("2022-13-01").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_windows_spanning_three_months() {
        let windows: Vec<_> = month_windows(date(2022, 1, 15), date(2022, 3, 10)).collect();
        assert_eq!(
            windows,
            vec![
                DateWindow {
                    from: date(2022, 1, 15),
                    to: date(2022, 1, 31)
                },
                DateWindow {
                    from: date(2022, 2, 1),
                    to: date(2022, 2, 28)
                },
                DateWindow {
                    from: date(2022, 3, 1),
                    to: date(2022, 3, 10)
                },
            ]
        );
    }

    #[test]
    fn test_windows_same_month() {
        let windows: Vec<_> = month_windows(date(2022, 6, 1), date(2022, 6, 30)).collect();
        assert_eq!(
            windows,
            vec![DateWindow {
                from: date(2022, 6, 1),
                to: date(2022, 6, 30)
            }]
        );
    }

    #[test]
    fn test_windows_single_day() {
        let windows: Vec<_> = month_windows(date(2022, 6, 15), date(2022, 6, 15)).collect();
        assert_eq!(
            windows,
            vec![DateWindow {
                from: date(2022, 6, 15),
                to: date(2022, 6, 15)
            }]
        );
    }

    #[test]
    fn test_windows_empty_when_start_after_end() {
        let windows: Vec<_> = month_windows(date(2022, 7, 1), date(2022, 6, 30)).collect();
        assert!(windows.is_empty());
    }

    #[test]
    fn test_windows_leap_february() {
        let windows: Vec<_> = month_windows(date(2024, 2, 1), date(2024, 3, 5)).collect();
        assert_eq!(windows[0].to, date(2024, 2, 29));
        assert_eq!(windows[1].from, date(2024, 3, 1));
    }

    #[test]
    fn test_windows_cover_span_exactly() {
        let start = date(2021, 11, 20);
        let end = date(2023, 2, 14);
        let windows: Vec<_> = month_windows(start, end).collect();

        assert_eq!(windows.first().unwrap().from, start);
        assert_eq!(windows.last().unwrap().to, end);
        for window in &windows {
            assert!(window.from <= window.to);
            assert_eq!(window.from.month(), window.to.month());
            assert_eq!(window.from.year(), window.to.year());
        }
        for pair in windows.windows(2) {
            assert_eq!(pair[0].to + Duration::days(1), pair[1].from);
        }
    }
}
