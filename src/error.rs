use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum OutreachError {
    ConfigurationError(String),
    ClassificationError(String),
    SchedulingError(String),
    OrchestrationError(String),
    PersistenceError(String),
    ContactError(String),
    ValidationError(String),
}

impl fmt::Display for OutreachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutreachError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            OutreachError::ClassificationError(msg) => write!(f, "Classification error: {msg}"),
            OutreachError::SchedulingError(msg) => write!(f, "Scheduling error: {msg}"),
            OutreachError::OrchestrationError(msg) => write!(f, "Orchestration error: {msg}"),
            OutreachError::PersistenceError(msg) => write!(f, "Persistence error: {msg}"),
            OutreachError::ContactError(msg) => write!(f, "Contact error: {msg}"),
            OutreachError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for OutreachError {}

pub type Result<T> = std::result::Result<T, OutreachError>;
