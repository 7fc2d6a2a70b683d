//! # Contact Events
//!
//! Immutable records of contact attempts, with typed outcome classification.
//!
//! The original workflow recovered "already contacted today" by scanning
//! free-text call summaries for embedded timestamps. Here the structured
//! `occurred_at` field is the source of truth for dedup; the summary text is
//! payload only. The keyword digest distilled from the summary is advisory:
//! it feeds operator-facing reporting, never scheduling decisions.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse success/failure classification of a contact attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallEvaluation {
    Success,
    Failure,
    Unknown,
}

impl CallEvaluation {
    /// Lenient parse of the calling service's evaluation text.
    pub fn from_wire(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "true" | "success" | "successful" | "pass" => Self::Success,
            "false" | "failure" | "failed" | "fail" => Self::Failure,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for CallEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Typed call termination reason, mapped from the calling service's wire
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndedReason {
    Completed,
    NoAnswer,
    Voicemail,
    Busy,
    Forwarded,
    Failed,
    Other,
}

impl EndedReason {
    pub fn from_wire(reason: &str) -> Self {
        match reason.trim() {
            "customer-ended-call" | "assistant-ended-call" => Self::Completed,
            "customer-did-not-answer" => Self::NoAnswer,
            "voicemail" => Self::Voicemail,
            "customer-busy" => Self::Busy,
            "assistant-forwarded-call" => Self::Forwarded,
            "twilio-failed-to-connect-call" => Self::Failed,
            _ => Self::Other,
        }
    }

    /// Whether the customer actually answered the call.
    pub fn answered(&self) -> bool {
        matches!(self, Self::Completed | Self::Forwarded)
    }
}

/// Advisory tags distilled from the free-text call summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTag {
    WrongNumber,
    NoAnswerOrVoicemail,
    LineBusy,
    Disconnected,
    Declined,
    Interested,
    Upset,
    NeedsFollowUp,
    Transferred,
    Resolved,
    PaymentReceived,
    PaymentIssue,
}

/// Keyword scan of a call summary into digest tags. Each keyword group maps
/// to at most one tag; unknown content simply yields fewer tags.
pub fn digest_summary(summary: &str) -> Vec<OutcomeTag> {
    let text = summary.to_lowercase();
    let mut tags = Vec::new();

    let mut tag_if = |tag: OutcomeTag, keywords: &[&str]| {
        if keywords.iter().any(|k| text.contains(k)) {
            tags.push(tag);
        }
    };

    tag_if(OutcomeTag::WrongNumber, &["wrong person", "wrong number", "not the right person"]);
    tag_if(OutcomeTag::NoAnswerOrVoicemail, &["no answer", "voicemail", "answering machine"]);
    tag_if(OutcomeTag::LineBusy, &["line busy", "busy"]);
    tag_if(OutcomeTag::Disconnected, &["disconnected", "hung up"]);
    tag_if(OutcomeTag::Declined, &["not interested", "declined", "refused"]);
    tag_if(OutcomeTag::Upset, &["angry", "upset", "frustrated"]);
    tag_if(OutcomeTag::NeedsFollowUp, &["follow up", "callback", "call back"]);
    tag_if(OutcomeTag::Transferred, &["transfer", "forwarded"]);
    tag_if(OutcomeTag::Resolved, &["resolved", "solved", "fixed"]);
    tag_if(OutcomeTag::PaymentReceived, &["payment made", "payment received", "paid"]);
    tag_if(OutcomeTag::PaymentIssue, &["payment issue", "payment problem", "cannot pay"]);

    // "interested" would also match inside "not interested"
    if !tags.contains(&OutcomeTag::Declined)
        && ["interested", "agreed", "wants"].iter().any(|k| text.contains(k))
    {
        tags.push(OutcomeTag::Interested);
    }

    tags
}

/// Immutable record of one contact attempt. Appended once per record per
/// run-cycle; never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub occurred_at: DateTime<Utc>,
    pub summary: String,
    pub evaluation: CallEvaluation,
    pub ended_reason: EndedReason,
    #[serde(default)]
    pub digest: Vec<OutcomeTag>,
}

impl ContactEvent {
    /// The calendar date of this contact in the engine's operating timezone.
    /// Dedup compares these, never the invoker-local date.
    pub fn local_date(&self, tz: Tz) -> NaiveDate {
        self.occurred_at.with_timezone(&tz).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_evaluation_from_wire() {
        assert_eq!(CallEvaluation::from_wire("true"), CallEvaluation::Success);
        assert_eq!(CallEvaluation::from_wire(" Success "), CallEvaluation::Success);
        assert_eq!(CallEvaluation::from_wire("false"), CallEvaluation::Failure);
        assert_eq!(CallEvaluation::from_wire("n/a"), CallEvaluation::Unknown);
    }

    #[test]
    fn test_ended_reason_from_wire() {
        assert_eq!(EndedReason::from_wire("voicemail"), EndedReason::Voicemail);
        assert_eq!(EndedReason::from_wire("customer-did-not-answer"), EndedReason::NoAnswer);
        assert_eq!(EndedReason::from_wire("assistant-forwarded-call"), EndedReason::Forwarded);
        assert_eq!(EndedReason::from_wire("something-new"), EndedReason::Other);
        assert!(EndedReason::Completed.answered());
        assert!(!EndedReason::Voicemail.answered());
    }

    #[test]
    fn test_digest_keyword_scan() {
        let tags = digest_summary("Customer was not interested and hung up.");
        assert!(tags.contains(&OutcomeTag::Declined));
        assert!(tags.contains(&OutcomeTag::Disconnected));
        assert!(!tags.contains(&OutcomeTag::Interested));

        let tags = digest_summary("Payment made over the phone; customer agreed to renew.");
        assert!(tags.contains(&OutcomeTag::PaymentReceived));
        assert!(tags.contains(&OutcomeTag::Interested));
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 04:30 UTC on Jan 2 is still Jan 1 in Los Angeles
        let event = ContactEvent {
            occurred_at: Utc.with_ymd_and_hms(2026, 1, 2, 4, 30, 0).unwrap(),
            summary: String::new(),
            evaluation: CallEvaluation::Unknown,
            ended_reason: EndedReason::Other,
            digest: Vec::new(),
        };
        let tz: Tz = "America/Los_Angeles".parse().unwrap();
        assert_eq!(
            event.local_date(tz),
            chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
    }
}
