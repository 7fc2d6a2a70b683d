//! # Voice-Calling Service Interface
//!
//! Contract for the external service that places calls and returns
//! transcribed outcomes. Script selection is the engine's job (the variant
//! is chosen per (classification, stage) from the schedule template) while
//! synthesis, transcription, and telephony are entirely the collaborator's.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    /// Connectivity-level failure reaching the service at all.
    #[error("Voice-calling service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Contact placement failed for {record_id}: {message}")]
    PlacementFailed { record_id: String, message: String },
}

impl VoiceError {
    pub fn placement_failed(record_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PlacementFailed {
            record_id: record_id.into(),
            message: message.into(),
        }
    }
}

/// One contact to place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub record_id: String,
    pub company: String,
    /// E.164 number to dial.
    pub phone_number: String,
    /// Script variant for this (classification, stage).
    pub script_variant: String,
}

/// Transcribed outcome of a placed contact, as the service reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactOutcome {
    pub success: bool,
    /// Free-text result description from the call analysis.
    pub summary: String,
    /// The service's own success evaluation text, parsed leniently upstream.
    pub evaluation: String,
    /// Wire-format terminated reason (e.g. "voicemail",
    /// "customer-did-not-answer", "customer-ended-call").
    pub ended_reason: String,
}

/// External voice-calling seam.
#[async_trait]
pub trait VoiceCallingService: Send + Sync {
    /// Place one contact and wait for its transcribed outcome. The engine
    /// bounds this wait with its own timeout; a timed-out call counts as
    /// failed-but-possibly-placed and is never re-placed in the same pass.
    async fn place_contact(&self, request: ContactRequest) -> Result<ContactOutcome, VoiceError>;
}
