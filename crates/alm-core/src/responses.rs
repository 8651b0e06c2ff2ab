//! Response types for CLI output and persisted reports.
//!
//! All types derive `Serialize` + `JsonSchema`; the persisted ones
//! (`AuditReport`, `ReconcileProposal`) also derive `Deserialize` because
//! later commands read them back.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, IssueKind, MatchedField};
use crate::issue::{Issue, Location};
use crate::reference::FieldPath;

// ---------------------------------------------------------------------------
// Tooling failures
// ---------------------------------------------------------------------------

/// A collection file that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LoadFailure {
    pub collection: String,
    pub path: PathBuf,
    pub message: String,
}

/// A collection file that could not be rewritten. The original is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WriteFailure {
    pub collection: String,
    pub path: PathBuf,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CollectionSummary {
    pub name: String,
    pub kind: EntityKind,
    pub path: PathBuf,
    pub records: usize,
    /// The configured file does not exist and was audited as empty.
    #[serde(default)]
    pub missing: bool,
}

/// Result of one audit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuditReport {
    pub generated_at: DateTime<Utc>,
    pub collections: Vec<CollectionSummary>,
    #[serde(default)]
    pub failures: Vec<LoadFailure>,
    pub issues: Vec<Issue>,
    /// Issue count per kind.
    pub summary: BTreeMap<IssueKind, usize>,
}

impl AuditReport {
    /// Count issues per kind.
    #[must_use]
    pub fn summarize(issues: &[Issue]) -> BTreeMap<IssueKind, usize> {
        let mut summary = BTreeMap::new();
        for issue in issues {
            *summary.entry(issue.kind).or_insert(0) += 1;
        }
        summary
    }

    #[must_use]
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }

    #[must_use]
    pub fn has_tooling_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// A patch entry merged into one or more records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AppliedPatch {
    pub id: String,
    pub fields: Vec<String>,
    pub locations: Vec<Location>,
}

/// A patch entry that matched nothing or was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct NotApplied {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct PatchResponse {
    pub dry_run: bool,
    pub applied: Vec<AppliedPatch>,
    pub not_applied: Vec<NotApplied>,
    pub written: Vec<PathBuf>,
    pub write_failures: Vec<WriteFailure>,
}

// ---------------------------------------------------------------------------
// Reconcile
// ---------------------------------------------------------------------------

/// Outcome of matching one dangling identifier against a candidate pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Resolved {
        target: String,
        distance: f64,
        matched_field: MatchedField,
    },
    /// No candidate within the threshold; the reference is kept verbatim.
    Unresolved { reference: String },
}

impl Resolution {
    /// The identifier the reference should point at after reconciliation.
    #[must_use]
    pub fn effective_target(&self) -> &str {
        match self {
            Self::Resolved { target, .. } => target,
            Self::Unresolved { reference } => reference,
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// A proposed fix for one dangling reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReconcileProposal {
    pub collection: String,
    pub record_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub path: FieldPath,
    pub target_kind: EntityKind,
    pub reference: String,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ReconcileResponse {
    pub applied: bool,
    pub proposals: Vec<ReconcileProposal>,
    /// Report entries that no longer dangle in the current dataset.
    pub stale: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<PatchResponse>,
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct DuplicateSide {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub collection: String,
}

/// Two records with different identifiers that look like the same entity.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct NearDuplicate {
    pub kind: EntityKind,
    pub left: DuplicateSide,
    pub right: DuplicateSide,
    pub distance: f64,
    pub matched_field: MatchedField,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct RemovedRecord {
    pub id: String,
    pub location: Location,
    /// Where the kept copy lives.
    pub kept: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct DedupeResponse {
    pub dry_run: bool,
    pub removed: Vec<RemovedRecord>,
    pub written: Vec<PathBuf>,
    pub write_failures: Vec<WriteFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct MergeResponse {
    pub from: String,
    pub into: String,
    pub appended: usize,
    /// Source identifiers already present in the target; not copied.
    pub collisions: Vec<String>,
    pub written: Vec<PathBuf>,
    pub write_failures: Vec<WriteFailure>,
    pub source_removed: bool,
}
