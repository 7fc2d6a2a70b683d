//! # Policy Records
//!
//! The typed unit of campaign tracking, and the validated ingestion step
//! that produces it from the loosely-typed rows the record store returns.
//!
//! All classification and eligibility logic operates on [`PolicyRecord`]
//! only. [`RawRecord`] preserves field presence: a missing attribute
//! (`None`) and a present-but-empty attribute (`Some("")`) are different
//! eligibility signals and must survive the trip from the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::classification::{self, CampaignClass};
use crate::models::contact_event::ContactEvent;

/// Loosely-typed row as the record store returns it. Field presence is
/// meaningful; values arrive as raw text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub record_id: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status_label: Option<String>,
    #[serde(default)]
    pub deadline_date: Option<String>,
    #[serde(default)]
    pub amount_due: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub next_trigger_date: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub contact_history: Vec<ContactEvent>,
}

/// Per-record ingestion failure. Non-fatal: the record is excluded from the
/// pass and re-evaluated on the next one.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IngestionError {
    #[error("record {record_id}: required field '{field}' is missing or empty")]
    MissingField { record_id: String, field: String },

    #[error("record {record_id}: phone number '{value}' is not a dialable number")]
    InvalidPhone { record_id: String, value: String },
}

/// The typed unit of campaign tracking; one per tracked policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub record_id: String,
    pub company: String,
    /// E.164-normalized contact number.
    pub phone_number: String,
    pub classification: CampaignClass,
    pub status_label: String,
    /// Anchor date the schedule is computed relative to (expiration,
    /// cancellation, or payment-due date depending on classification).
    pub deadline_date: Option<NaiveDate>,
    pub amount_due: Option<String>,
    /// Zero initially; advances by exactly one per successful contact.
    pub stage: u32,
    /// Set by the stage advancer for business-day stages; doubles as the
    /// initial follow-up anchor at stage zero.
    pub next_trigger_date: Option<NaiveDate>,
    /// Manual close-out flag. The engine reads it, never sets it.
    pub completed: bool,
    pub contact_history: Vec<ContactEvent>,
}

impl PolicyRecord {
    /// Validated mapping from a raw store row. Company and phone are hard
    /// requirements for any contact; everything else ingests leniently and
    /// is judged by the eligibility evaluator.
    pub fn from_raw(raw: RawRecord) -> Result<Self, IngestionError> {
        let record_id = raw.record_id.clone();

        let company = non_empty(&raw.company).ok_or_else(|| IngestionError::MissingField {
            record_id: record_id.clone(),
            field: "company".to_string(),
        })?;

        let phone_raw = non_empty(&raw.phone_number).ok_or_else(|| IngestionError::MissingField {
            record_id: record_id.clone(),
            field: "phone_number".to_string(),
        })?;
        let phone_number =
            normalize_phone(&phone_raw).ok_or_else(|| IngestionError::InvalidPhone {
                record_id: record_id.clone(),
                value: phone_raw,
            })?;

        let classification = classification::classify(raw.reason.as_deref().unwrap_or(""));

        let deadline_date = raw
            .deadline_date
            .as_deref()
            .and_then(parse_flexible_date);
        if raw.deadline_date.as_deref().map(str::trim).is_some_and(|s| !s.is_empty())
            && deadline_date.is_none()
        {
            warn!(
                record_id = %record_id,
                value = raw.deadline_date.as_deref(),
                "Unparseable deadline date; record will be treated as having none"
            );
        }

        Ok(Self {
            record_id,
            company,
            phone_number,
            classification,
            status_label: raw.status_label.unwrap_or_default().trim().to_string(),
            deadline_date,
            amount_due: raw.amount_due,
            stage: parse_stage(raw.stage.as_deref()),
            next_trigger_date: raw.next_trigger_date.as_deref().and_then(parse_flexible_date),
            completed: raw.completed.unwrap_or(false),
            contact_history: raw.contact_history,
        })
    }

    pub fn last_contact(&self) -> Option<&ContactEvent> {
        self.contact_history.last()
    }

    /// Whether the record has an amount-due attribute that is present and
    /// non-empty, two distinct conditions that are both required.
    pub fn has_amount_due(&self) -> bool {
        self.amount_due
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty())
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Lenient stage parse: absent or non-numeric values ingest as zero, since
/// store rows predate the engine. Negative values clamp to zero.
fn parse_stage(value: Option<&str>) -> u32 {
    value
        .map(str::trim)
        .and_then(|v| v.parse::<i64>().ok())
        .map_or(0, |v| v.max(0) as u32)
}

/// Parse a date in any of the formats the store's upstream sources use.
pub fn parse_flexible_date(value: &str) -> Option<NaiveDate> {
    const FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d"];
    let trimmed = value.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Normalize a phone number to E.164. US ten-digit numbers gain a +1 prefix;
/// eleven digits with a leading 1 gain a plus; numbers already in E.164 pass
/// through. Anything without enough digits is rejected.
pub fn normalize_phone(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let has_plus = trimmed.starts_with('+');
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

    if digits.len() < 10 {
        return None;
    }

    if has_plus {
        return Some(format!("+{digits}"));
    }

    match digits.len() {
        10 => Some(format!("+1{digits}")),
        11 if digits.starts_with('1') => Some(format!("+{digits}")),
        _ => Some(format!("+{digits}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(record_id: &str) -> RawRecord {
        RawRecord {
            record_id: record_id.to_string(),
            company: Some("Acme Insurance".to_string()),
            phone_number: Some("(909) 310-0491".to_string()),
            reason: Some("Cancellation - Non-Payment".to_string()),
            ..RawRecord::default()
        }
    }

    #[test]
    fn test_ingest_minimal_record() {
        let record = PolicyRecord::from_raw(raw("24765")).unwrap();
        assert_eq!(record.record_id, "24765");
        assert_eq!(record.phone_number, "+19093100491");
        assert_eq!(record.classification, CampaignClass::NonPayment);
        assert_eq!(record.stage, 0);
        assert!(!record.completed);
        assert!(record.next_trigger_date.is_none());
    }

    #[test]
    fn test_missing_company_rejected() {
        let mut r = raw("1");
        r.company = Some("   ".to_string());
        assert!(matches!(
            PolicyRecord::from_raw(r),
            Err(IngestionError::MissingField { field, .. }) if field == "company"
        ));
    }

    #[test]
    fn test_absent_vs_empty_amount_due() {
        let mut r = raw("1");
        r.amount_due = None;
        let absent = PolicyRecord::from_raw(r).unwrap();
        assert!(absent.amount_due.is_none());
        assert!(!absent.has_amount_due());

        let mut r = raw("2");
        r.amount_due = Some(String::new());
        let empty = PolicyRecord::from_raw(r).unwrap();
        assert!(empty.amount_due.is_some());
        assert!(!empty.has_amount_due());

        let mut r = raw("3");
        r.amount_due = Some("$1,240.00".to_string());
        assert!(PolicyRecord::from_raw(r).unwrap().has_amount_due());
    }

    #[test]
    fn test_phone_normalization() {
        assert_eq!(normalize_phone("9093100491").as_deref(), Some("+19093100491"));
        assert_eq!(normalize_phone("19093100491").as_deref(), Some("+19093100491"));
        assert_eq!(normalize_phone("+44 20 7946 0958").as_deref(), Some("+442079460958"));
        assert_eq!(normalize_phone("911"), None);
    }

    #[test]
    fn test_flexible_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert_eq!(parse_flexible_date("2026-01-10"), Some(expected));
        assert_eq!(parse_flexible_date("01/10/2026"), Some(expected));
        assert_eq!(parse_flexible_date("01/10/26"), Some(expected));
        assert_eq!(parse_flexible_date(" 2026/01/10 "), Some(expected));
        assert_eq!(parse_flexible_date("January 10"), None);
    }

    #[test]
    fn test_lenient_stage_parse() {
        assert_eq!(parse_stage(None), 0);
        assert_eq!(parse_stage(Some("")), 0);
        assert_eq!(parse_stage(Some("2")), 2);
        assert_eq!(parse_stage(Some("not-a-number")), 0);
        assert_eq!(parse_stage(Some("-1")), 0);
    }
}
