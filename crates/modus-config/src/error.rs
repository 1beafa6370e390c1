//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error, including unknown mode names.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),
}
