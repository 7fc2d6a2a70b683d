//! # Dedup Guard
//!
//! The sole mechanism preventing a second contact for the same record when
//! the engine is invoked more than once on the same day. Compares each
//! history event's calendar date in the fixed operating timezone (never the
//! invoker's local zone) and is re-evaluated on every invocation, never
//! cached.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::models::ContactEvent;

/// True if any contact event falls on `date` in the operating timezone.
pub fn contacted_on(history: &[ContactEvent], date: NaiveDate, tz: Tz) -> bool {
    history.iter().any(|event| event.local_date(tz) == date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CallEvaluation, EndedReason};
    use chrono::{TimeZone, Utc};

    fn tz() -> Tz {
        "America/Los_Angeles".parse().unwrap()
    }

    fn event_at(y: i32, mo: u32, d: u32, h: u32) -> ContactEvent {
        ContactEvent {
            occurred_at: Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap(),
            summary: "call placed".to_string(),
            evaluation: CallEvaluation::Success,
            ended_reason: EndedReason::Completed,
            digest: Vec::new(),
        }
    }

    #[test]
    fn test_same_day_contact_detected() {
        // 22:00 UTC on Jan 5 is 14:00 Pacific on Jan 5
        let history = vec![event_at(2026, 1, 5, 22)];
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert!(contacted_on(&history, today, tz()));
    }

    #[test]
    fn test_different_day_not_detected() {
        let history = vec![event_at(2026, 1, 4, 22)];
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert!(!contacted_on(&history, today, tz()));
    }

    #[test]
    fn test_utc_date_rollover_uses_operating_zone() {
        // 02:00 UTC on Jan 6 is still 18:00 Pacific on Jan 5
        let history = vec![event_at(2026, 1, 6, 2)];
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert!(contacted_on(&history, today, tz()));
        let tomorrow = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
        assert!(!contacted_on(&history, tomorrow, tz()));
    }

    #[test]
    fn test_empty_history() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert!(!contacted_on(&[], today, tz()));
    }
}
