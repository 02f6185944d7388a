//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Limits use `-1` for "unlimited" in the on-disk format; accessor methods
//! convert to the `Option<u32>` model the gate works with.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Admission gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Maximum concurrent connections across all peers (`-1` = unlimited).
    pub max_connections: i64,

    /// Maximum concurrent connections per remote address (`-1` = unlimited).
    pub max_connections_per_addr: i64,

    /// Maximum attempts per address within one rate window (`-1` = unlimited).
    pub max_attempts_per_window: i64,

    /// Rate window duration in seconds.
    pub window_secs: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_connections: 500,
            max_connections_per_addr: 5,
            max_attempts_per_window: 5,
            window_secs: 5,
        }
    }
}

impl GateConfig {
    /// Global connection ceiling, `None` when unlimited.
    pub fn max_connections_limit(&self) -> Option<u32> {
        to_limit(self.max_connections)
    }

    /// Per-address connection ceiling, `None` when unlimited.
    pub fn max_connections_per_addr_limit(&self) -> Option<u32> {
        to_limit(self.max_connections_per_addr)
    }

    /// Per-address attempt ceiling, `None` when unlimited.
    pub fn max_attempts_per_window_limit(&self) -> Option<u32> {
        to_limit(self.max_attempts_per_window)
    }

    /// Rate window as a `Duration`.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

fn to_limit(value: i64) -> Option<u32> {
    if value < 0 {
        None
    } else {
        Some(u32::try_from(value).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let config = GateConfig::default();
        assert_eq!(config.max_connections_limit(), Some(500));
        assert_eq!(config.max_connections_per_addr_limit(), Some(5));
        assert_eq!(config.max_attempts_per_window_limit(), Some(5));
        assert_eq!(config.window(), Duration::from_secs(5));
    }

    #[test]
    fn negative_one_means_unlimited() {
        let config = GateConfig {
            max_connections: -1,
            ..GateConfig::default()
        };
        assert_eq!(config.max_connections_limit(), None);
        assert_eq!(config.max_connections_per_addr_limit(), Some(5));
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config: GateConfig = toml::from_str("max_connections = 100").unwrap();
        assert_eq!(config.max_connections, 100);
        assert_eq!(config.max_connections_per_addr, 5);
        assert_eq!(config.window_secs, 5);
    }
}
