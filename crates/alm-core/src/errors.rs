//! Cross-cutting error types for Almanac.
//!
//! Domain-specific errors (`StoreError`, `ConfigError`, ...) live in their
//! respective crates. `alm-cli` converges all of them into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Almanac crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
