//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GateConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// File contents are not valid TOML for the schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values are syntactically valid but semantically wrong.
    #[error("invalid configuration: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Load and validate a gate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GateConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Semantic validation (serde handles syntactic).
///
/// Collects every problem instead of stopping at the first.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (name, value) in [
        ("max_connections", config.max_connections),
        ("max_connections_per_addr", config.max_connections_per_addr),
        ("max_attempts_per_window", config.max_attempts_per_window),
    ] {
        // -1 is the unlimited sentinel; anything else negative is a typo.
        if value < -1 {
            errors.push(format!("{name} must be >= -1, got {value}"));
        }
        if value > i64::from(u32::MAX) {
            errors.push(format!("{name} exceeds the supported maximum"));
        }
    }

    if config.window_secs == 0 {
        errors.push("window_secs must be greater than zero".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
