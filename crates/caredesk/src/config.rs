//! # Configuration
//!
//! Engine settings are managed by [`confique`], which layers environment
//! variables over an optional TOML file over compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `CAREDESK_CRITICAL_HOURS`, etc.
//! 2. **Config file**: the path handed to [`EngineConfig::load`], if any.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Env | Description |
//! |-----|---------|-----|-------------|
//! | `critical_hours` | `2` | `CAREDESK_CRITICAL_HOURS` | Below this many hours left a deadline is critical |
//! | `warning_hours` | `12` | `CAREDESK_WARNING_HOURS` | Below this many hours left a deadline is a warning |
//! | `refresh_interval_secs` | `60` | `CAREDESK_REFRESH_INTERVAL_SECS` | Suggested countdown refresh cadence for UIs |

use crate::error::{DeskError, Result};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Engine configuration, stored in `caredesk.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Hours remaining below which a deadline counts as critical.
    #[config(default = 2, env = "CAREDESK_CRITICAL_HOURS")]
    pub critical_hours: u32,

    /// Hours remaining below which a deadline counts as a warning.
    #[config(default = 12, env = "CAREDESK_WARNING_HOURS")]
    pub warning_hours: u32,

    /// How often countdown displays should re-evaluate, in seconds.
    #[config(default = 60, env = "CAREDESK_REFRESH_INTERVAL_SECS")]
    pub refresh_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            critical_hours: 2,
            warning_hours: 12,
            refresh_interval_secs: 60,
        }
    }
}

impl EngineConfig {
    /// Load from the environment, then `path` (if given), then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        let config = builder.load()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.critical_hours >= self.warning_hours {
            return Err(DeskError::InvalidEngineConfig(format!(
                "critical_hours ({}) must be less than warning_hours ({})",
                self.critical_hours, self.warning_hours
            )));
        }
        if self.refresh_interval_secs == 0 {
            return Err(DeskError::InvalidEngineConfig(
                "refresh_interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Sample `caredesk.toml` with every setting documented.
    pub fn template() -> String {
        confique::toml::template::<Self>(confique::toml::FormatOptions::default())
    }
}
