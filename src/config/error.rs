//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read configuration file {path}: {message}")]
    FileRead { path: PathBuf, message: String },

    #[error("Failed to parse configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration value for {field}: {message}")]
    Validation { field: String, message: String },
}

impl ConfigurationError {
    pub fn file_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::FileRead {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigurationError>;
