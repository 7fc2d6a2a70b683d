//! # System Constants
//!
//! Core constants that define the operational boundaries of the outreach
//! campaign engine: event names emitted through structured logging, and the
//! default values for the scheduling knobs that configuration may override.

/// Core system events emitted as structured log markers during a campaign pass
pub mod events {
    // Pass lifecycle events
    pub const PASS_STARTED: &str = "campaign.pass_started";
    pub const PASS_COMPLETED: &str = "campaign.pass_completed";
    pub const PASS_GATED: &str = "campaign.pass_gated";

    // Per-record evaluation events
    pub const RECORD_ELIGIBLE: &str = "campaign.record_eligible";
    pub const RECORD_SKIPPED: &str = "campaign.record_skipped";
    pub const RECORD_INGESTION_FAILED: &str = "campaign.record_ingestion_failed";

    // Contact lifecycle events
    pub const CONTACT_PLACED: &str = "campaign.contact_placed";
    pub const CONTACT_FAILED: &str = "campaign.contact_failed";
    pub const CONTACT_TIMED_OUT: &str = "campaign.contact_timed_out";
    pub const STAGE_ADVANCED: &str = "campaign.stage_advanced";

    // Persistence events
    pub const PERSISTENCE_RETRY: &str = "campaign.persistence_retry";
    pub const PERSISTENCE_REDUCED_WRITE: &str = "campaign.persistence_reduced_write";
    pub const PERSISTENCE_LOST: &str = "campaign.persistence_lost";
}

/// Default operational values, overridable through configuration
pub mod system {
    /// Fixed operating timezone for all "today" decisions. Never the
    /// invoker's local zone.
    pub const DEFAULT_OPERATING_TIMEZONE: &str = "America/Los_Angeles";

    /// Business days a missed calendar-day trigger stays eligible.
    pub const DEFAULT_CATCH_UP_WINDOW_BUSINESS_DAYS: i64 = 2;

    /// Calendar days the safety net looks back for a lapsed trigger date.
    pub const DEFAULT_SAFETY_NET_LOOKBACK_DAYS: i64 = 7;

    /// Follow-up interval for business-day stages on records that carry no
    /// deadline (status-triggered classes).
    pub const FALLBACK_FOLLOW_UP_BUSINESS_DAYS: i64 = 5;

    /// Bounded retry policy for the persistence step (never the contact step).
    pub const DEFAULT_PERSIST_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_PERSIST_RETRY_DELAY_MS: u64 = 500;

    /// Batch dispatch fan-out bound.
    pub const DEFAULT_MAX_CONCURRENT_CALLS: usize = 8;

    /// How long the orchestrator waits for a single contact outcome before
    /// treating it as failed-but-possibly-placed.
    pub const DEFAULT_CALL_TIMEOUT_SECONDS: u64 = 600;

    /// Calling window in the operating timezone (hours, half-open).
    pub const DEFAULT_CALL_WINDOW_START_HOUR: u32 = 9;
    pub const DEFAULT_CALL_WINDOW_END_HOUR: u32 = 20;
}
