//! Week boundary resolution.
//!
//! Weeks run Monday through Sunday: a Sunday belongs to the week that began
//! the preceding Monday, not the next one. Every operation that buckets
//! transactions or budget rows by week goes through these helpers.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Returns the Monday of the week containing `date`.
#[must_use]
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// Returns the Sunday of the week containing `date`.
#[must_use]
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).last_day()
}

/// Returns the last instant of the week that starts on `week_start`:
/// Sunday 23:59:59.999.
#[must_use]
pub fn week_end_instant(week_start: NaiveDate) -> NaiveDateTime {
    week_start.and_time(NaiveTime::MIN) + Duration::days(7) - Duration::milliseconds(1)
}

/// Counts the days left in the week starting at `week_start`, today through
/// Sunday inclusive, clamped to `1..=7`.
///
/// The lower clamp keeps the daily safe-to-spend division well-defined when
/// a past week is queried; the upper clamp covers future weeks.
#[must_use]
pub fn days_remaining(week_start: NaiveDate, today: NaiveDate) -> i64 {
    let sunday = week_start + Duration::days(6);
    ((sunday - today).num_days() + 1).clamp(1, 7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    // Monday maps to itself.
    #[case(date(2026, 8, 24), date(2026, 8, 24))]
    // Midweek.
    #[case(date(2026, 8, 27), date(2026, 8, 24))]
    // Saturday.
    #[case(date(2026, 8, 29), date(2026, 8, 24))]
    // Sunday belongs to the week begun six days earlier.
    #[case(date(2026, 8, 30), date(2026, 8, 24))]
    // Year boundary: Thursday 2026-01-01 is in the week of Monday 2025-12-29.
    #[case(date(2026, 1, 1), date(2025, 12, 29))]
    fn start_of_week_returns_containing_monday(
        #[case] input: NaiveDate,
        #[case] expected: NaiveDate,
    ) {
        let start = start_of_week(input);
        assert_eq!(start, expected);
        assert_eq!(start.weekday(), Weekday::Mon);
    }

    #[rstest]
    #[case(date(2026, 8, 24), date(2026, 8, 30))]
    #[case(date(2026, 8, 30), date(2026, 8, 30))]
    #[case(date(2025, 12, 31), date(2026, 1, 4))]
    fn end_of_week_returns_following_sunday(#[case] input: NaiveDate, #[case] expected: NaiveDate) {
        let end = end_of_week(input);
        assert_eq!(end, expected);
        assert_eq!(end.weekday(), Weekday::Sun);
    }

    #[test]
    fn week_end_instant_is_last_millisecond_of_sunday() {
        let end = week_end_instant(date(2026, 8, 24));
        assert_eq!(end.date(), date(2026, 8, 30));
        assert_eq!(
            end.time(),
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap()
        );
    }

    #[rstest]
    // Monday: the whole week ahead.
    #[case(date(2026, 8, 24), 7)]
    // Thursday.
    #[case(date(2026, 8, 27), 4)]
    // Sunday: never less than one day.
    #[case(date(2026, 8, 30), 1)]
    fn days_remaining_counts_today_through_sunday(#[case] today: NaiveDate, #[case] expected: i64) {
        assert_eq!(days_remaining(date(2026, 8, 24), today), expected);
    }

    #[test]
    fn days_remaining_clamps_outside_the_week() {
        let monday = date(2026, 8, 24);
        // Querying a past week after it ended.
        assert_eq!(days_remaining(monday, date(2026, 9, 15)), 1);
        // Querying a future week before it starts.
        assert_eq!(days_remaining(monday, date(2026, 8, 1)), 7);
    }
}
