//! Search configuration deserialized from TOML.
//!
//! The path search reads a small set of switches that decide which fields
//! participate in path identity:
//!
//! ```toml
//! [crpr]
//! enabled = true
//!
//! [clock]
//! uncertainty = true
//!
//! [pool]
//! initial_capacity = 256
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Top-level search configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Clock reconvergence pessimism removal settings.
    #[serde(default)]
    pub crpr: CrprConfig,
    /// Clock annotation settings.
    #[serde(default)]
    pub clock: ClockConfig,
    /// Exception-state pool settings.
    #[serde(default)]
    pub pool: PoolConfig,
}

impl SearchConfig {
    /// Returns `true` when CRPR clock paths take part in path identity.
    pub fn crpr_active(&self) -> bool {
        self.crpr.enabled
    }

    /// Returns `true` when clock uncertainties are annotated on paths.
    pub fn clock_uncertainty_enabled(&self) -> bool {
        self.clock.uncertainty
    }
}

/// `[crpr]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CrprConfig {
    /// Whether pessimism removal is active.
    #[serde(default)]
    pub enabled: bool,
}

/// `[clock]` table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClockConfig {
    /// Whether clock uncertainties are annotated on paths.
    #[serde(default = "default_true")]
    pub uncertainty: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { uncertainty: true }
    }
}

/// `[pool]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PoolConfig {
    /// Number of hash buckets reserved when a pool is created.
    #[serde(default)]
    pub initial_capacity: usize,
}

fn default_true() -> bool {
    true
}

/// Largest accepted `pool.initial_capacity`.
const MAX_POOL_CAPACITY: usize = 1 << 24;

/// Loads and validates a search configuration file.
pub fn load_config(path: &Path) -> Result<SearchConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a search configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<SearchConfig, ConfigError> {
    let config: SearchConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.pool.initial_capacity > MAX_POOL_CAPACITY {
        return Err(ConfigError::ValidationError(format!(
            "pool.initial_capacity {} exceeds {MAX_POOL_CAPACITY}",
            config.pool.initial_capacity
        )));
    }
    Ok(())
}
