//! # Campaign Classification
//!
//! Maps a record's raw discriminator text (the "reason" captured by the
//! business workflow) to a campaign classification, and detects the
//! settlement statuses that pre-empt all scheduling.
//!
//! Matching is case-insensitive, tolerant of surrounding whitespace, and
//! keyword-based: the reason text and the known phrases are both normalized
//! by stripping spaces, hyphens, underscores, and slashes before a substring
//! check, so "Non-Renewal", "non renewal", and "NONRENEWAL" all land in the
//! same class. An empty or unrecognized reason classifies as `Unclassified`
//! and the record is excluded from scheduling until its data is corrected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of campaign types a tracked record can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignClass {
    /// Pending cancellation for non-payment; dynamically scheduled reminder
    /// calls on remaining business days.
    NonPayment,
    /// Policy renewal notices on fixed calendar offsets before expiration.
    Renewal,
    /// Non-renewal notices on fixed calendar offsets before expiration.
    NonRenewal,
    /// Direct-billed payment reminders on fixed calendar offsets before the
    /// payment due date.
    PaymentDue,
    /// Re-quote follow-ups; status-triggered with a safety-net path.
    Requote,
    /// Discriminator missing or unrecognized; excluded from all scheduling.
    Unclassified,
}

impl CampaignClass {
    /// Classes whose records the safety-net evaluator may re-admit based on
    /// status label alone.
    pub fn is_status_triggered(&self) -> bool {
        matches!(self, Self::Requote)
    }

    /// The exact status label (normalized) that triggers the safety-net path
    /// for a status-triggered class.
    pub fn trigger_status(&self) -> Option<&'static str> {
        match self {
            Self::Requote => Some("requote"),
            _ => None,
        }
    }

    /// Whether records of this class require an amount-due attribute before
    /// any contact is placed.
    pub fn requires_amount_due(&self) -> bool {
        matches!(self, Self::NonPayment | Self::PaymentDue)
    }

    /// Whether records of this class require a deadline date.
    pub fn requires_deadline(&self) -> bool {
        !matches!(self, Self::Requote | Self::Unclassified)
    }
}

impl fmt::Display for CampaignClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPayment => write!(f, "non_payment"),
            Self::Renewal => write!(f, "renewal"),
            Self::NonRenewal => write!(f, "non_renewal"),
            Self::PaymentDue => write!(f, "payment_due"),
            Self::Requote => write!(f, "requote"),
            Self::Unclassified => write!(f, "unclassified"),
        }
    }
}

impl std::str::FromStr for CampaignClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "non_payment" => Ok(Self::NonPayment),
            "renewal" => Ok(Self::Renewal),
            "non_renewal" => Ok(Self::NonRenewal),
            "payment_due" => Ok(Self::PaymentDue),
            "requote" => Ok(Self::Requote),
            "unclassified" => Ok(Self::Unclassified),
            _ => Err(format!("Invalid campaign class: {s}")),
        }
    }
}

/// Normalize free text for phrase matching: lowercase, then strip the
/// separator characters the source data is inconsistent about.
pub(crate) fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '/'))
        .collect()
}

/// Known phrases per classification, in normalized form. Order matters:
/// "nonrenewal" must be tested before "renewal", since the latter is a
/// substring of the former.
const CLASS_PHRASES: &[(CampaignClass, &[&str])] = &[
    (CampaignClass::Requote, &["requote"]),
    (CampaignClass::NonPayment, &["nonpayment", "nonpay", "cancellation"]),
    (CampaignClass::NonRenewal, &["nonrenewal"]),
    (CampaignClass::Renewal, &["renewal"]),
    (CampaignClass::PaymentDue, &["directbill", "paymentdue", "pendingpayment"]),
];

/// Statuses that mean the record is settled and must never be contacted.
const SETTLED_PHRASES: &[&str] = &["paid", "settled", "closed", "completed"];

/// Classify a raw reason discriminator. Empty or unmatched input yields
/// `Unclassified`; first matching phrase list wins.
pub fn classify(reason: &str) -> CampaignClass {
    let normalized = normalize(reason);
    if normalized.is_empty() {
        return CampaignClass::Unclassified;
    }

    for (class, phrases) in CLASS_PHRASES {
        if phrases.iter().any(|phrase| normalized.contains(phrase)) {
            return *class;
        }
    }

    CampaignClass::Unclassified
}

/// True if the status label marks the record as settled. This exclusion takes
/// precedence over every scheduling rule.
pub fn is_settled(status_label: &str) -> bool {
    let normalized = normalize(status_label);
    if normalized.is_empty() {
        return false;
    }

    SETTLED_PHRASES
        .iter()
        .any(|phrase| normalized.contains(phrase))
}
