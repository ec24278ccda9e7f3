//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;

use crate::error::{CacheError, Result};

/// Default number of entries when `CACHE_CAPACITY` is unset.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Whether `add`/`add_with_ttl` sweep expired entries before inserting
    pub sweep_on_add: bool,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_SWEEP_ON_ADD` - Sweep expired entries on insert (default: false)
    ///
    /// Unset variables fall back to defaults; set but unparsable ones are an error.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            capacity: read_var("CACHE_CAPACITY", DEFAULT_CAPACITY, |v| v.parse().ok())?,
            sweep_on_add: read_var("CACHE_SWEEP_ON_ADD", false, parse_bool)?,
        };
        config.validate()?;
        Ok(config)
    }

    // == Validate ==
    /// Rejects configurations the cache cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            sweep_on_add: false,
        }
    }
}

fn read_var<T>(name: &str, default: T, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
    match env::var(name) {
        Ok(raw) => parse(raw.trim())
            .ok_or_else(|| CacheError::InvalidConfig(format!("{}={}", name, raw))),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
