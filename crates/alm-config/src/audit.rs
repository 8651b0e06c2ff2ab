//! Consistency checker settings.

use alm_core::fields;
use serde::{Deserialize, Serialize};

fn default_placeholders() -> Vec<String> {
    fields::PLACEHOLDER_VALUES
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_pending_field() -> String {
    fields::PENDING_CUTOFFS.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Cutoff values meaning "not yet collected".
    #[serde(default = "default_placeholders")]
    pub placeholders: Vec<String>,

    /// Record field listing exam ids whose cutoff history is knowingly pending.
    #[serde(default = "default_pending_field")]
    pub pending_field: String,

    /// Report exams and colleges that do not list each other back.
    #[serde(default)]
    pub check_acceptance_symmetry: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            placeholders: default_placeholders(),
            pending_field: default_pending_field(),
            check_acceptance_symmetry: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = AuditConfig::default();
        assert_eq!(
            config.placeholders,
            vec!["Check official website", "Data Pending"]
        );
        assert_eq!(config.pending_field, "pendingCutoffs");
        assert!(!config.check_acceptance_symmetry);
    }
}
