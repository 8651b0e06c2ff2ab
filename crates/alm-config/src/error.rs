//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Reading a scanned dataset directory failed.
    #[error("Cannot scan dataset directory '{dir}': {source}")]
    Scan {
        dir: String,
        #[source]
        source: std::io::Error,
    },
}
