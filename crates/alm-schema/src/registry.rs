//! Named schemas for every persisted or printed document.

use std::collections::HashMap;

use alm_core::issue::Issue;
use alm_core::patch::PatchSet;
use alm_core::responses::{
    AuditReport, DedupeResponse, MergeResponse, NearDuplicate, PatchResponse, ReconcileProposal,
    ReconcileResponse,
};
use schemars::schema_for;
use serde_json::Value;

use crate::error::SchemaError;

pub struct SchemaRegistry {
    schemas: HashMap<&'static str, Value>,
}

macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, schema_for!($ty).to_value());
    };
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // Documents read back by later commands.
        register!(schemas, "audit_report", AuditReport);
        register!(schemas, "patch_set", PatchSet);
        register!(schemas, "reconcile_proposal", ReconcileProposal);
        register!(schemas, "issue", Issue);

        // Command output.
        register!(schemas, "patch_response", PatchResponse);
        register!(schemas, "reconcile_response", ReconcileResponse);
        register!(schemas, "dedupe_response", DedupeResponse);
        register!(schemas, "merge_response", MergeResponse);
        register!(schemas, "near_duplicate", NearDuplicate);

        Self { schemas }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Validate `instance` against the schema called `name`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` for an unknown name and
    /// `SchemaError::ValidationFailed` listing every violation otherwise.
    pub fn validate(&self, name: &str, instance: &Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema).map_err(|e| SchemaError::Compile {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{} at '{}'", e, e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed {
                name: name.to_string(),
                errors,
            })
        }
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use alm_core::enums::{EntityKind, IssueKind, MatchedField};
    use alm_core::issue::Location;
    use alm_core::reference::FieldPath;
    use alm_core::responses::Resolution;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn lists_every_registered_schema_sorted() {
        let registry = SchemaRegistry::new();
        assert_eq!(
            registry.list(),
            vec![
                "audit_report",
                "dedupe_response",
                "issue",
                "merge_response",
                "near_duplicate",
                "patch_response",
                "patch_set",
                "reconcile_proposal",
                "reconcile_response",
            ]
        );
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn accepts_a_generated_report() {
        let location = Location {
            collection: "gujarat".into(),
            path: "data/colleges/gujarat.json".into(),
            record_index: 3,
        };
        let issues = vec![
            Issue::new(IssueKind::PlaceholderData, &location, "cutoff is placeholder")
                .with_record(Some("ldce"), None),
        ];
        let report = AuditReport {
            generated_at: Utc::now(),
            collections: Vec::new(),
            failures: Vec::new(),
            summary: AuditReport::summarize(&issues),
            issues,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert!(SchemaRegistry::new().validate("audit_report", &value).is_ok());
    }

    #[test]
    fn accepts_a_resolved_proposal() {
        let proposal = ReconcileProposal {
            collection: "exams".into(),
            record_index: 0,
            record_id: Some("gujcet".into()),
            path: FieldPath::CollegesAccepting { index: 2 },
            target_kind: EntityKind::College,
            reference: "nit-surat".into(),
            resolution: Resolution::Resolved {
                target: "svnit-surat".into(),
                distance: 0.18,
                matched_field: MatchedField::Id,
            },
        };

        let value = serde_json::to_value(&proposal).unwrap();
        assert!(
            SchemaRegistry::new()
                .validate("reconcile_proposal", &value)
                .is_ok()
        );
    }

    #[test]
    fn rejects_patch_entries_that_are_not_objects() {
        let registry = SchemaRegistry::new();

        assert!(registry.validate("patch_set", &json!({ "x": { "name": "X" } })).is_ok());
        let result = registry.validate("patch_set", &json!({ "x": ["not", "an", "object"] }));

        match result {
            Err(SchemaError::ValidationFailed { name, errors }) => {
                assert_eq!(name, "patch_set");
                assert!(!errors.is_empty());
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn unknown_schema_is_an_error() {
        assert!(matches!(
            SchemaRegistry::new().validate("report", &json!({})),
            Err(SchemaError::NotFound(name)) if name == "report"
        ));
    }
}
