//! Configuration Module
//!
//! Loads service configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::codec::Format;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of keys the memory store holds
    pub max_entries: usize,
    /// TTL in seconds for saves without an expiry, 0 = keep forever
    pub default_ttl: u64,
    /// Default codec of the cache engine
    pub codec: Format,
    /// HTTP server port
    pub server_port: u16,
    /// Expired-key sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum stored keys (default: 10000)
    /// - `DEFAULT_TTL` - Default TTL in seconds, 0 for none (default: 0)
    /// - `CACHE_CODEC` - `json` or `bincode` (default: json)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 1)
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            codec: env_or("CACHE_CODEC", defaults.codec),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            default_ttl: 0,
            codec: Format::Json,
            server_port: 3000,
            sweep_interval: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.default_ttl, 0);
        assert_eq!(config.codec, Format::Json);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_interval, 1);
    }

    #[test]
    fn test_env_or_parses_and_falls_back() {
        env::set_var("ENTITY_CACHE_TEST_PORT", "8080");
        env::set_var("ENTITY_CACHE_TEST_CODEC", "bincode");
        env::set_var("ENTITY_CACHE_TEST_BAD", "not-a-number");

        assert_eq!(env_or("ENTITY_CACHE_TEST_PORT", 3000u16), 8080);
        assert_eq!(env_or("ENTITY_CACHE_TEST_CODEC", Format::Json), Format::Bincode);
        assert_eq!(env_or("ENTITY_CACHE_TEST_BAD", 7u64), 7);
        assert_eq!(env_or("ENTITY_CACHE_TEST_UNSET", 5usize), 5);

        env::remove_var("ENTITY_CACHE_TEST_PORT");
        env::remove_var("ENTITY_CACHE_TEST_CODEC");
        env::remove_var("ENTITY_CACHE_TEST_BAD");
    }
}
