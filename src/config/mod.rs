//! # Outreach Configuration System
//!
//! YAML-based configuration with environment overlays. A base file defines
//! every knob; per-environment files override only what differs. Loading is
//! explicit and validated, with no silent fallbacks once a config directory is
//! in play, while programmatic construction via `Default` keeps tests and
//! the diagnostic CLI honest.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use outreach_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let window = manager.config().engine.catch_up_window_business_days;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

use crate::constants::system;

/// Root configuration structure mirroring `config/outreach/base.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutreachConfig {
    /// Scheduling engine knobs
    pub engine: EngineConfig,

    /// Contact dispatch behavior
    pub dispatch: DispatchConfig,

    /// Persistence retry policy
    pub persistence: PersistenceConfig,

    /// Time-of-day gating for campaign passes
    pub gating: GatingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// IANA name of the single fixed timezone every "today" decision uses.
    pub operating_timezone: String,

    /// Business days a missed calendar-day trigger remains eligible.
    pub catch_up_window_business_days: i64,

    /// Calendar days the safety net looks back for a lapsed trigger date.
    pub safety_net_lookback_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Concurrent call bound for batch-mode partitions.
    pub max_concurrent_calls: usize,

    /// Seconds to wait for a single contact outcome before treating it as
    /// failed-but-possibly-placed.
    pub call_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Attempts for the persistence step; the contact step is never retried.
    pub max_attempts: u32,

    /// Base delay between persistence attempts; grows linearly per attempt.
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatingConfig {
    pub enabled: bool,

    /// Calling window in the operating timezone, half-open hours.
    pub window_start_hour: u32,
    pub window_end_hour: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            operating_timezone: system::DEFAULT_OPERATING_TIMEZONE.to_string(),
            catch_up_window_business_days: system::DEFAULT_CATCH_UP_WINDOW_BUSINESS_DAYS,
            safety_net_lookback_days: system::DEFAULT_SAFETY_NET_LOOKBACK_DAYS,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_calls: system::DEFAULT_MAX_CONCURRENT_CALLS,
            call_timeout_seconds: system::DEFAULT_CALL_TIMEOUT_SECONDS,
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            max_attempts: system::DEFAULT_PERSIST_MAX_ATTEMPTS,
            retry_delay_ms: system::DEFAULT_PERSIST_RETRY_DELAY_MS,
        }
    }
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_start_hour: system::DEFAULT_CALL_WINDOW_START_HOUR,
            window_end_hour: system::DEFAULT_CALL_WINDOW_END_HOUR,
        }
    }
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            dispatch: DispatchConfig::default(),
            persistence: PersistenceConfig::default(),
            gating: GatingConfig::default(),
        }
    }
}

impl OutreachConfig {
    /// Resolve the operating timezone. Validation guarantees this parses
    /// after a successful load.
    pub fn operating_tz(&self) -> ConfigResult<Tz> {
        self.engine
            .operating_timezone
            .parse::<Tz>()
            .map_err(|_| ConfigurationError::validation(
                "engine.operating_timezone",
                format!("'{}' is not a known IANA timezone", self.engine.operating_timezone),
            ))
    }

    /// Validate invariants that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        self.operating_tz()?;

        if self.engine.catch_up_window_business_days < 0 {
            return Err(ConfigurationError::validation(
                "engine.catch_up_window_business_days",
                "must be zero or positive",
            ));
        }
        if self.engine.safety_net_lookback_days < 1 {
            return Err(ConfigurationError::validation(
                "engine.safety_net_lookback_days",
                "must be at least one day",
            ));
        }
        if self.dispatch.max_concurrent_calls == 0 {
            return Err(ConfigurationError::validation(
                "dispatch.max_concurrent_calls",
                "must be at least 1",
            ));
        }
        if self.persistence.max_attempts == 0 {
            return Err(ConfigurationError::validation(
                "persistence.max_attempts",
                "must be at least 1",
            ));
        }
        if self.gating.window_start_hour >= 24
            || self.gating.window_end_hour > 24
            || self.gating.window_start_hour >= self.gating.window_end_hour
        {
            return Err(ConfigurationError::validation(
                "gating.window_start_hour",
                "calling window must satisfy 0 <= start < end <= 24",
            ));
        }

        Ok(())
    }
}
