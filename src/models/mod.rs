//! # Data Model
//!
//! Typed campaign data model: the tracked [`PolicyRecord`], the append-only
//! [`ContactEvent`] history, and the validated ingestion from raw store rows.

pub mod contact_event;
pub mod policy_record;

pub use contact_event::{
    digest_summary, CallEvaluation, ContactEvent, EndedReason, OutcomeTag,
};
pub use policy_record::{
    normalize_phone, parse_flexible_date, IngestionError, PolicyRecord, RawRecord,
};
