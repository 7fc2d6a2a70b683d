//! # External Collaborator Interfaces
//!
//! The engine consumes two external systems through trait seams: the record
//! store holding campaign rows, and the voice-calling service that places
//! contacts and returns transcribed outcomes. Production implementations
//! live with their owners; this crate ships the contracts plus in-memory
//! implementations for tests and dry runs (see `crate::test_helpers`).

pub mod record_store;
pub mod voice;

pub use record_store::{RecordPatch, RecordStore, StoreError};
pub use voice::{ContactOutcome, ContactRequest, VoiceCallingService, VoiceError};
