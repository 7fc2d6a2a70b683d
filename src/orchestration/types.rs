//! # Orchestration Types
//!
//! Shared data structures for the campaign pass: the eligible set, its
//! partitioning, per-contact results, and the pass summary handed back to
//! the invoker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classification::CampaignClass;
use crate::eligibility::EligibilityPath;
use crate::models::{ContactEvent, PolicyRecord};

/// One record selected for contact this pass, at the stage the evaluator
/// decided (which may sit ahead of the record's stored stage after an
/// upward adjustment).
#[derive(Debug, Clone)]
pub struct EligibleContact {
    pub record: PolicyRecord,
    pub stage: u32,
    pub path: EligibilityPath,
}

/// Partition key for dispatch grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartitionKey {
    pub class: CampaignClass,
    pub stage: u32,
}

/// How one contact attempt concluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    /// Outcome received and the record fully persisted.
    Persisted,
    /// Outcome received but only the reduced write (contact marker) stuck;
    /// stage and dates are stale until externally repaired.
    PersistedReduced,
    /// Outcome received but nothing could be written. Duplicate-call risk.
    PersistenceLost,
    /// The calling service reported failure; record untouched.
    PlacementFailed,
    /// No outcome within the wait; possibly placed, never re-placed.
    TimedOut,
}

/// Per-record result of one dispatch.
#[derive(Debug, Clone)]
pub struct ContactResult {
    pub record_id: String,
    pub status: ContactStatus,
    pub event: Option<ContactEvent>,
}

/// Stage advancement computed after a successful contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageAdvance {
    pub new_stage: u32,
    pub next_trigger_date: Option<NaiveDate>,
}

/// Summary of one campaign pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassSummary {
    pub pass_date: Option<NaiveDate>,
    /// True when the time-of-day gate stopped the pass before evaluation.
    pub gated: bool,
    pub total_records: usize,
    pub ingestion_failures: usize,
    pub eligible: usize,
    pub skipped: usize,
    pub contacts_persisted: usize,
    pub reduced_writes: usize,
    pub persistence_lost: usize,
    pub contacts_failed: usize,
}

impl PassSummary {
    pub fn gated(pass_date: NaiveDate) -> Self {
        Self {
            pass_date: Some(pass_date),
            gated: true,
            ..Self::default()
        }
    }

    /// Count one contact result into the summary.
    pub fn record_result(&mut self, status: &ContactStatus) {
        match status {
            ContactStatus::Persisted => self.contacts_persisted += 1,
            ContactStatus::PersistedReduced => {
                self.contacts_persisted += 1;
                self.reduced_writes += 1;
            }
            ContactStatus::PersistenceLost => self.persistence_lost += 1,
            ContactStatus::PlacementFailed | ContactStatus::TimedOut => {
                self.contacts_failed += 1;
            }
        }
    }
}
