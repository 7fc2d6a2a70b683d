//! # Orchestration Error Types
//!
//! Structured error taxonomy for the campaign pass, using thiserror instead
//! of `Box<dyn Error>` patterns. Per-record errors never abort the pass for
//! other records; only `StoreUnavailable` and `VoiceUnavailable` are
//! connectivity-level and fatal for the whole run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// Record store cannot be reached at all; aborts the pass.
    #[error("Record store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// Voice-calling service cannot be reached at all; aborts the pass.
    #[error("Voice-calling service unavailable: {message}")]
    VoiceUnavailable { message: String },

    /// A raw row could not be mapped to a typed record. Non-fatal.
    #[error("Ingestion failed for record {record_id}: {message}")]
    Ingestion { record_id: String, message: String },

    /// The calling service reported failure for one contact. Non-fatal: the
    /// record is not advanced, not marked contacted, and stays eligible on
    /// the next invocation.
    #[error("Contact placement failed for record {record_id}: {message}")]
    ContactPlacement { record_id: String, message: String },

    /// No outcome within the configured wait. The contact may have been
    /// placed; it must not be re-placed this pass.
    #[error("Contact for record {record_id} timed out after {timeout_seconds}s")]
    ContactTimeout {
        record_id: String,
        timeout_seconds: u64,
    },

    /// The store rejected the post-contact update after bounded retries and
    /// the reduced write also failed. An un-recorded contact risks a
    /// duplicate call on the next run; surfaced at error severity.
    #[error("Persistence failed for record {record_id}: {message}")]
    Persistence { record_id: String, message: String },
}

impl OrchestrationError {
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn ingestion(record_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Ingestion {
            record_id: record_id.into(),
            message: message.into(),
        }
    }

    pub fn contact_placement(record_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ContactPlacement {
            record_id: record_id.into(),
            message: message.into(),
        }
    }

    pub fn contact_timeout(record_id: impl Into<String>, timeout_seconds: u64) -> Self {
        Self::ContactTimeout {
            record_id: record_id.into(),
            timeout_seconds,
        }
    }

    pub fn persistence(record_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            record_id: record_id.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts the entire pass rather than one record.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. } | Self::VoiceUnavailable { .. }
        )
    }
}

pub type OrchestrationResult<T> = Result<T, OrchestrationError>;
