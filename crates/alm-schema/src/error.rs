//! Schema registry error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown schema '{0}'")]
    NotFound(String),

    /// The document does not match the schema.
    #[error("document does not match schema '{name}': {}", errors.join("; "))]
    ValidationFailed { name: String, errors: Vec<String> },

    #[error("schema '{name}' failed to compile: {message}")]
    Compile { name: String, message: String },
}
