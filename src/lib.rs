#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Outreach Core
//!
//! High-performance Rust core for a recurring outreach campaign: deciding,
//! once or twice per invocation cycle, which tracked policy records are due
//! for their next contact attempt, placing those contacts through an
//! external voice-calling collaborator, and advancing each record's
//! progress state.
//!
//! ## Architecture
//!
//! The engine is the **multi-stage scheduling and eligibility core**. The
//! record store and the voice-calling service are external collaborators
//! consumed through trait seams; the periodic trigger is external too: the
//! engine exposes a single idempotent-safe entry point,
//! [`orchestration::CampaignOrchestrator::run_pass`].
//!
//! ## Module Organization
//!
//! - [`calendar`] - Pure business-day arithmetic
//! - [`classification`] - Reason text to campaign class mapping
//! - [`schedule`] - Static per-class schedule templates
//! - [`models`] - Typed records, contact events, validated ingestion
//! - [`eligibility`] - Primary evaluator, safety net, dedup guard
//! - [`orchestration`] - Stage advancer and the pass orchestrator
//! - [`services`] - External collaborator trait interfaces
//! - [`config`] - YAML configuration with environment overlays
//! - [`error`] - Structured error handling
//!
//! ## Scheduling model
//!
//! Each classification carries a schedule template. Calendar-day stages are
//! fixed offsets from the record's deadline, adjusted off weekends, with a
//! bounded catch-up window for missed runs. Business-day stages are
//! recomputed dynamically: each contact books the next one a shrinking
//! fraction of the remaining business days out, so reminders compress as
//! the deadline approaches. A per-day dedup guard makes the whole pass safe
//! to invoke repeatedly.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use outreach_core::config::OutreachConfig;
//! use outreach_core::orchestration::CampaignOrchestrator;
//! use outreach_core::test_helpers::{InMemoryRecordStore, ScriptedVoiceService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryRecordStore::new(vec![]));
//! let voice = Arc::new(ScriptedVoiceService::new());
//! let orchestrator = CampaignOrchestrator::new(store, voice, OutreachConfig::default())?;
//!
//! let summary = orchestrator.run_pass(chrono::Utc::now(), true).await?;
//! println!("eligible: {}, contacted: {}", summary.eligible, summary.contacts_persisted);
//! # Ok(())
//! # }
//! ```

pub mod calendar;
pub mod classification;
pub mod config;
pub mod constants;
pub mod eligibility;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod schedule;
pub mod services;
pub mod test_helpers;

pub use classification::{classify, is_settled, CampaignClass};
pub use config::{ConfigManager, OutreachConfig};
pub use eligibility::{
    EligibilityDecision, EligibilityEvaluator, EligibilityPath, SafetyNetEvaluator, SkipReason,
};
pub use error::{OutreachError, Result};
pub use models::{ContactEvent, PolicyRecord, RawRecord};
pub use orchestration::{CampaignOrchestrator, PassSummary};
pub use schedule::{template_for, CallingMode, ScheduleTemplate, ScheduleUnit, StageDefinition};
