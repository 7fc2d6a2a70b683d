//! Configuration Loader
//!
//! Environment-aware configuration loading: discovers the config directory,
//! detects the environment, merges the base YAML with the environment
//! overlay, and validates the result before handing it out.

use serde_yaml::Value as YamlValue;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::error::{ConfigResult, ConfigurationError};
use super::OutreachConfig;

const BASE_FILE: &str = "base.yaml";

/// Loaded, validated configuration plus the context it was loaded in.
pub struct ConfigManager {
    config: OutreachConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection from the default
    /// directory (`config/outreach` relative to the working directory).
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory.
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with an explicit
    /// environment. Useful in tests, which must not mutate process-global
    /// environment variables.
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        debug!(
            environment = %environment,
            directory = %config_directory.display(),
            "Loading outreach configuration"
        );

        let config = Self::load_and_merge(&config_directory, environment)?;
        config.validate()?;

        debug!(
            environment = %environment,
            timezone = %config.engine.operating_timezone,
            "✅ Configuration loaded and validated"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    pub fn config(&self) -> &OutreachConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Environment detection chain; first match wins, "development" default.
    pub fn detect_environment() -> String {
        env::var("OUTREACH_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
    }

    fn default_config_directory() -> PathBuf {
        PathBuf::from("config").join("outreach")
    }

    fn load_and_merge(directory: &Path, environment: &str) -> ConfigResult<OutreachConfig> {
        let base_path = directory.join(BASE_FILE);
        if !base_path.exists() {
            return Err(ConfigurationError::FileNotFound { path: base_path });
        }

        let mut merged = Self::read_yaml(&base_path)?;

        let overlay_path = directory.join(format!("{environment}.yaml"));
        if overlay_path.exists() {
            let overlay = Self::read_yaml(&overlay_path)?;
            deep_merge(&mut merged, overlay);
        } else {
            debug!(
                path = %overlay_path.display(),
                "No environment overlay; using base configuration only"
            );
        }

        serde_yaml::from_value(merged)
            .map_err(|e| ConfigurationError::parse(&base_path, e.to_string()))
    }

    fn read_yaml(path: &Path) -> ConfigResult<YamlValue> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::file_read(path, e.to_string()))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ConfigurationError::parse(path, e.to_string()))
    }
}

/// Recursively merge `overlay` into `base`. Mappings merge key-by-key; any
/// other value type replaces wholesale.
fn deep_merge(base: &mut YamlValue, overlay: YamlValue) {
    match (base, overlay) {
        (YamlValue::Mapping(base_map), YamlValue::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.entry(key) {
                    serde_yaml::mapping::Entry::Occupied(mut entry) => {
                        deep_merge(entry.get_mut(), overlay_value);
                    }
                    serde_yaml::mapping::Entry::Vacant(entry) => {
                        entry.insert(overlay_value);
                    }
                }
            }
        }
        (base_slot, overlay_value) => *base_slot = overlay_value,
    }
}
