use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("{field} must be a normalized distance in [0, 1], got {value}")]
    InvalidThreshold { field: &'static str, value: f64 },
}
