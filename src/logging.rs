//! # Structured Logging Module
//!
//! Environment-aware structured logging that outputs to both console and
//! files for tracing campaign passes after the fact; a pass runs unattended
//! from an external trigger, so the file log is usually the only witness.

use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::OnceLock;

use chrono::Utc;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);

        let log_dir = PathBuf::from("log");
        if !log_dir.exists() {
            if let Err(e) = fs::create_dir_all(&log_dir) {
                eprintln!("Failed to create log directory: {e}; console logging only");
                let _ = tracing_subscriber::registry()
                    .with(
                        fmt::layer()
                            .with_target(true)
                            .with_filter(EnvFilter::new(log_level)),
                    )
                    .try_init();
                return;
            }
        }

        // One log file per process: environment, PID, and start timestamp
        let pid = process::id();
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let log_filename = format!("{environment}.{pid}.{timestamp}.log");

        let file_appender = tracing_appender::rolling::never(&log_dir, &log_filename);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

        let subscriber = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true)
                    .with_filter(EnvFilter::new(log_level.clone())),
            )
            .with(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(false)
                    .json()
                    .with_filter(EnvFilter::new(log_level)),
            );

        // try_init: a global subscriber may already exist in embedding tests
        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(
            pid = pid,
            environment = %environment,
            log_file = %log_filename,
            "🔧 STRUCTURED LOGGING: Initialized with file output"
        );

        // The guard must outlive the process for the writer to flush
        std::mem::forget(guard);
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("OUTREACH_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for a campaign pass lifecycle event
pub fn log_pass_event(event: &str, pass_date: &str, status: &str, details: Option<&str>) {
    tracing::info!(
        event = %event,
        pass_date = %pass_date,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "📋 CAMPAIGN_PASS"
    );
}

/// Log structured data for a per-record scheduling or contact decision
pub fn log_record_event(
    event: &str,
    record_id: &str,
    classification: &str,
    stage: Option<u32>,
    details: Option<&str>,
) {
    tracing::info!(
        event = %event,
        record_id = %record_id,
        classification = %classification,
        stage = stage,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "📞 RECORD_EVENT"
    );
}

/// Log an error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "❌ ERROR"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_detection() {
        std::env::set_var("OUTREACH_ENV", "test_override");
        let env = get_environment();
        assert_eq!(env, "test_override");
        std::env::remove_var("OUTREACH_ENV");
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("unknown"), "debug");
    }
}
