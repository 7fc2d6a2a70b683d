//! Shared factories for integration tests.
#![allow(dead_code)] // not every binary uses every factory

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use outreach_core::models::{CallEvaluation, ContactEvent, EndedReason, RawRecord};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// An instant that is mid-morning Pacific time on the given date.
pub fn pacific_morning(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    // 18:00 UTC == 10:00 PST
    Utc.with_ymd_and_hms(y, m, d, 18, 0, 0).unwrap()
}

pub fn contact_event_at(instant: DateTime<Utc>) -> ContactEvent {
    ContactEvent {
        occurred_at: instant,
        summary: "Spoke with the customer.".to_string(),
        evaluation: CallEvaluation::Success,
        ended_reason: EndedReason::Completed,
        digest: Vec::new(),
    }
}

pub struct RawRecordBuilder {
    record: RawRecord,
}

impl RawRecordBuilder {
    pub fn new(record_id: &str) -> Self {
        Self {
            record: RawRecord {
                record_id: record_id.to_string(),
                company: Some("Acme Insurance Services".to_string()),
                phone_number: Some("(909) 310-0491".to_string()),
                ..RawRecord::default()
            },
        }
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.record.reason = Some(reason.to_string());
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.record.status_label = Some(status.to_string());
        self
    }

    pub fn deadline(mut self, deadline: &str) -> Self {
        self.record.deadline_date = Some(deadline.to_string());
        self
    }

    pub fn amount_due(mut self, amount: &str) -> Self {
        self.record.amount_due = Some(amount.to_string());
        self
    }

    pub fn stage(mut self, stage: u32) -> Self {
        self.record.stage = Some(stage.to_string());
        self
    }

    pub fn next_trigger(mut self, trigger: &str) -> Self {
        self.record.next_trigger_date = Some(trigger.to_string());
        self
    }

    pub fn completed(mut self) -> Self {
        self.record.completed = Some(true);
        self
    }

    pub fn with_contact(mut self, event: ContactEvent) -> Self {
        self.record.contact_history.push(event);
        self
    }

    pub fn build(self) -> RawRecord {
        self.record
    }
}

/// A non-payment record whose follow-up anchor is due on the given date.
pub fn non_payment_due(record_id: &str, trigger: &str, deadline: &str) -> RawRecord {
    RawRecordBuilder::new(record_id)
        .reason("Cancellation - Non-Payment")
        .amount_due("$512.00")
        .deadline(deadline)
        .next_trigger(trigger)
        .build()
}
