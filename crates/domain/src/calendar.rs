//! Rotation calendar math.
//!
//! All windows use UTC. Week windows run Monday 00:00:00 through Sunday
//! 23:59:59; period indexes count from January 1 of the current year so
//! mission codes are reproducible across processes within a week.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

/// Days elapsed since Jan 1 of `now`'s year, integer-divided by 7.
pub fn week_index(now: DateTime<Utc>) -> u32 {
    now.date_naive().ordinal0() / 7
}

/// Days elapsed since Jan 1 of `now`'s year.
pub fn day_index(now: DateTime<Utc>) -> u32 {
    now.date_naive().ordinal0()
}

/// The current week's window: Monday 00:00:00 .. Sunday 23:59:59.
pub fn week_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let date = now.date_naive();
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    let start = monday.and_time(NaiveTime::MIN).and_utc();
    let end = (monday + Duration::days(7)).and_time(NaiveTime::MIN).and_utc() - Duration::seconds(1);
    (start, end)
}

/// The current day's window: 00:00:00 .. 23:59:59.
pub fn day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let date = now.date_naive();
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let end = (date + Duration::days(1)).and_time(NaiveTime::MIN).and_utc() - Duration::seconds(1);
    (start, end)
}
