//! # Calendar Utility
//!
//! Pure date arithmetic for the scheduling engine: weekend detection,
//! business-day counting and offsetting, and weekend adjustment for
//! calendar-day stage targets.
//!
//! Business-day counting uses half-open `(start, end]` semantics: weekdays
//! strictly after `start`, up to and including `end`. This preserves the
//! round-trip invariant `count_business_days(d, add_business_days(d, n)) == n`
//! for every starting date, weekends included. `end` before `start` yields a
//! negative count; callers guard.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// True if the date falls on a Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Count business days from `start` to `end`, exclusive of `start` and
/// inclusive of `end`. Returns zero when the dates are equal and a negative
/// count when `end` precedes `start`.
pub fn count_business_days(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        return -count_business_days(end, start);
    }

    let mut business_days = 0;
    let mut current = start;

    while current < end {
        current += Duration::days(1);
        if !is_weekend(current) {
            business_days += 1;
        }
    }

    business_days
}

/// Advance `start` by `n` business days, skipping weekends. For `n >= 1` the
/// result is always a weekday strictly after `start`; `n == 0` returns
/// `start` unchanged.
pub fn add_business_days(start: NaiveDate, n: i64) -> NaiveDate {
    let mut current = start;
    let mut added = 0;

    while added < n {
        current += Duration::days(1);
        if !is_weekend(current) {
            added += 1;
        }
    }

    current
}

/// Roll a weekend date back to the preceding Friday; weekdays pass through.
/// Used for calendar-day stage targets only; business-day arithmetic lands
/// on weekdays by construction.
pub fn adjust_for_weekend(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date - Duration::days(2),
        _ => date,
    }
}
