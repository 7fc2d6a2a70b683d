//! # Eligibility Engine
//!
//! Two-phase eligibility evaluation with defined precedence: the primary
//! staged-schedule evaluator runs first; the status-only safety net is
//! consulted only when the primary path declines, and only for
//! status-triggered classifications. The result is a tagged decision: a
//! record is selected by exactly one path, never both.
//!
//! ## Components
//!
//! - [`EligibilityEvaluator`]: primary path, calendar-day target matching
//!   with weekend adjustment and bounded catch-up, or business-day trigger
//!   date matching
//! - [`SafetyNetEvaluator`]: secondary path re-admitting status-triggered
//!   records the primary preconditions excluded
//! - [`dedup`]: the same-calendar-day contact guard both paths honor

pub mod dedup;
pub mod evaluator;
pub mod safety_net;

use std::fmt;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::PolicyRecord;
use crate::schedule::ScheduleTemplate;

pub use evaluator::EligibilityEvaluator;
pub use safety_net::SafetyNetEvaluator;

/// Which evaluation path selected a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityPath {
    Primary,
    SafetyNet,
}

/// Why a record was passed over this run. Machine-readable for tests and
/// partition accounting; `Display` gives the operator-facing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Status label matches a settlement phrase; pre-empts everything.
    Settled,
    /// Manual completion flag is set.
    ManuallyCompleted,
    /// Discriminator missing or unrecognized; needs data correction.
    Unclassified,
    /// A classification-required attribute is absent or empty.
    MissingRequiredAttribute { field: String },
    /// All stages contacted; no further automatic contact.
    SequenceComplete { stage: u32 },
    /// The dedup guard found a contact on today's calendar date.
    AlreadyContactedToday,
    /// The record's stored stage is past the stage due today.
    AlreadyPastStage { current: u32, target: u32 },
    /// No stage target matches today.
    NotDue { detail: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settled => write!(f, "status label indicates settlement"),
            Self::ManuallyCompleted => write!(f, "record is flagged complete"),
            Self::Unclassified => write!(f, "reason discriminator is unrecognized"),
            Self::MissingRequiredAttribute { field } => {
                write!(f, "required attribute '{field}' is missing or empty")
            }
            Self::SequenceComplete { stage } => {
                write!(f, "contact sequence complete (stage {stage})")
            }
            Self::AlreadyContactedToday => write!(f, "already contacted today"),
            Self::AlreadyPastStage { current, target } => {
                write!(f, "already past this stage (current: {current}, due: {target})")
            }
            Self::NotDue { detail } => write!(f, "not due today: {detail}"),
        }
    }
}

/// Outcome of evaluating one record for one run date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EligibilityDecision {
    Eligible { stage: u32, path: EligibilityPath },
    Ineligible { reason: SkipReason },
}

impl EligibilityDecision {
    pub fn eligible(stage: u32, path: EligibilityPath) -> Self {
        Self::Eligible { stage, path }
    }

    pub fn skip(reason: SkipReason) -> Self {
        Self::Ineligible { reason }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible { .. })
    }
}

/// Guards shared by both evaluation paths, in precedence order: settlement
/// exclusion, manual completion, terminal stage, same-day dedup. The
/// required-attribute check is deliberately absent: it belongs to the
/// primary path only, so the safety net can catch records it excluded.
pub(crate) fn shared_guards(
    record: &PolicyRecord,
    template: &ScheduleTemplate,
    today: NaiveDate,
    tz: Tz,
) -> Option<SkipReason> {
    if crate::classification::is_settled(&record.status_label) {
        return Some(SkipReason::Settled);
    }
    if record.completed {
        return Some(SkipReason::ManuallyCompleted);
    }
    if template.is_terminal(record.stage) {
        return Some(SkipReason::SequenceComplete {
            stage: record.stage,
        });
    }
    if dedup::contacted_on(&record.contact_history, today, tz) {
        return Some(SkipReason::AlreadyContactedToday);
    }
    None
}
