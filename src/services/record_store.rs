//! # Record Store Interface
//!
//! Contract for the external store of campaign rows. The store provides
//! per-record last-write-wins semantics; a single record's update must be
//! applied atomically relative to that record, but nothing spans records.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ContactEvent, RawRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Connectivity-level failure. The only error that aborts a whole pass.
    #[error("Record store unavailable: {message}")]
    Unavailable { message: String },

    #[error("Record not found: {record_id}")]
    NotFound { record_id: String },

    #[error("Record store rejected update for {record_id}: {message}")]
    Rejected { record_id: String, message: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn rejected(record_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            record_id: record_id.into(),
            message: message.into(),
        }
    }
}

/// Partial patch for one record. `None` leaves a field untouched; for the
/// trigger date, `Some(None)` clears it: set, clear, and leave-alone are
/// three distinct operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    pub stage: Option<u32>,
    pub next_trigger_date: Option<Option<NaiveDate>>,
    pub append_contact: Option<ContactEvent>,
    pub last_contact_date: Option<NaiveDate>,
    /// Supported by the store contract for external close-out tooling; the
    /// engine itself never sets it.
    pub completed: Option<bool>,
}

impl RecordPatch {
    /// Full post-contact patch: advance the stage, set or clear the trigger
    /// date, append the event, stamp the contact date.
    pub fn after_contact(
        stage: u32,
        next_trigger_date: Option<NaiveDate>,
        event: ContactEvent,
        contact_date: NaiveDate,
    ) -> Self {
        Self {
            stage: Some(stage),
            next_trigger_date: Some(next_trigger_date),
            append_contact: Some(event),
            last_contact_date: Some(contact_date),
            completed: None,
        }
    }

    /// Reduced write used when the full patch keeps failing: the appended
    /// event alone is enough for the dedup guard to block a second same-day
    /// contact, even though stage and dates go stale until repaired.
    pub fn contact_marker_only(event: ContactEvent) -> Self {
        Self {
            append_contact: Some(event),
            ..Self::default()
        }
    }

    pub fn is_reduced(&self) -> bool {
        self.stage.is_none() && self.append_contact.is_some()
    }
}

/// External record store seam.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Enumerate every tracked row. Failure here is connectivity-level and
    /// aborts the pass.
    async fn list_records(&self) -> Result<Vec<RawRecord>, StoreError>;

    /// Apply a partial patch to one record, atomically for that record.
    async fn update_record(&self, record_id: &str, patch: RecordPatch) -> Result<(), StoreError>;
}
