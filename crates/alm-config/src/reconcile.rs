//! Fuzzy reconciler settings.

use alm_core::enums::StrategyKind;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default maximum normalized distance for reference reconciliation.
const fn default_max_distance() -> f64 {
    0.35
}

/// Default maximum normalized distance for near-duplicate detection.
const fn default_duplicate_max_distance() -> f64 {
    0.15
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReconcileConfig {
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Candidates further than this are rejected rather than guessed.
    #[serde(default = "default_max_distance")]
    pub max_distance: f64,

    #[serde(default = "default_duplicate_max_distance")]
    pub duplicate_max_distance: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            max_distance: default_max_distance(),
            duplicate_max_distance: default_duplicate_max_distance(),
        }
    }
}

impl ReconcileConfig {
    /// Both thresholds must be normalized distances.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("reconcile.max_distance", self.max_distance)?;
        check_unit(
            "reconcile.duplicate_max_distance",
            self.duplicate_max_distance,
        )
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("{value} is outside [0, 1]"),
        })
    }
}
