//! # modus-config
//!
//! Layered configuration loading for modus using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MODUS_*` prefix, `__` as separator)
//! 2. Project-level `.modus/config.toml`
//! 3. User-level `~/.config/modus/config.toml`
//! 4. Built-in defaults (`mode = "throw"`)
//!
//! # Usage
//!
//! ```no_run
//! use modus_config::ModusConfig;
//!
//! // Resolve the startup mode and make it the process-wide default:
//! let config = ModusConfig::load_and_install().expect("config");
//! println!("validation mode: {}", config.mode);
//! ```

mod error;

pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use modus_core::{Policy, SeverityMode, set_severity_mode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModusConfig {
    /// Severity mode applied when a validation fails.
    #[serde(default)]
    pub mode: SeverityMode,
}

impl ModusConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or names
    /// an unknown mode.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Extract configuration from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` on extraction failure.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(ConfigError::from)
    }

    /// Load configuration and install its mode as the process-wide default.
    ///
    /// # Errors
    ///
    /// As [`ModusConfig::load`]; the current default is left unchanged.
    pub fn load_and_install() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.install();
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".modus/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("MODUS_").split("__"))
    }

    /// Make this configuration's mode the process-wide default.
    pub fn install(&self) {
        set_severity_mode(self.mode);
        tracing::debug!(target: "modus", mode = %self.mode, "installed configured severity mode");
    }

    /// A policy pinned to this configuration's mode, independent of the
    /// process-wide default.
    #[must_use]
    pub fn policy(&self) -> Policy {
        Policy::fixed(self.mode)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("modus").join("config.toml"))
    }
}
