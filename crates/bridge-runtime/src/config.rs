//! # Runtime Configuration
//!
//! Defaults suitable for a local simulation, overridable from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `QB_MAX_QUADS` | `bridge.max_quads` |
//! | `QB_DESTINATION_BUDGET` | `bridge.destination_budget` |
//! | `QB_RELAY_DELAY_TICKS` | `relay_delay_ticks` |
//! | `QB_TICK_INTERVAL_MS` | `tick_interval_ms` |
//! | `QB_LOG_LEVEL` | `log_level` |

use qb_02_bridge::{BridgeConfig, BridgeError};
use serde::Serialize;
use shared_types::DomainId;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

/// Runtime configuration errors.
#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    /// An environment variable could not be parsed.
    #[error("Invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// Parser message
        reason: String,
    },

    /// Both sides of the bridge use the same domain id.
    #[error("Domains must differ, both are {0}")]
    SameDomains(DomainId),

    /// Tick interval of zero would spin the relay pump.
    #[error("Tick interval must be positive")]
    ZeroTickInterval,

    /// Bridge limits rejected.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeConfig {
    /// First domain.
    pub domain_a: DomainId,
    /// Second domain.
    pub domain_b: DomainId,
    /// Ticks between send and delivery.
    pub relay_delay_ticks: u64,
    /// Wall-clock length of one relay tick.
    pub tick_interval_ms: u64,
    /// Limits applied by both endpoints.
    pub bridge: BridgeConfig,
    /// Maximum log level (`trace` .. `error`).
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            domain_a: DomainId::A,
            domain_b: DomainId::B,
            relay_delay_ticks: 2,
            tick_interval_ms: 100,
            bridge: BridgeConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, RuntimeConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RuntimeConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = parse_var(&lookup, "QB_MAX_QUADS")? {
            config.bridge.max_quads = value;
        }
        if let Some(value) = parse_var(&lookup, "QB_DESTINATION_BUDGET")? {
            config.bridge.destination_budget = value;
        }
        if let Some(value) = parse_var(&lookup, "QB_RELAY_DELAY_TICKS")? {
            config.relay_delay_ticks = value;
        }
        if let Some(value) = parse_var(&lookup, "QB_TICK_INTERVAL_MS")? {
            config.tick_interval_ms = value;
        }
        if let Some(value) = parse_var::<_, Level>(&lookup, "QB_LOG_LEVEL")? {
            config.log_level = value.to_string().to_lowercase();
        }
        Ok(config)
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<(), RuntimeConfigError> {
        if self.domain_a == self.domain_b {
            return Err(RuntimeConfigError::SameDomains(self.domain_a));
        }
        if self.tick_interval_ms == 0 {
            return Err(RuntimeConfigError::ZeroTickInterval);
        }
        self.bridge.validate()?;
        self.level()?;
        Ok(())
    }

    /// Parsed log level.
    pub fn level(&self) -> Result<Level, RuntimeConfigError> {
        Level::from_str(&self.log_level).map_err(|e| RuntimeConfigError::InvalidValue {
            var: "QB_LOG_LEVEL",
            value: self.log_level.clone(),
            reason: e.to_string(),
        })
    }

    /// Relay tick length.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, RuntimeConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| RuntimeConfigError::InvalidValue {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        })
}
