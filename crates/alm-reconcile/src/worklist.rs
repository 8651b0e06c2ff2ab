//! Turning a prior audit report into reconcile proposals.
//!
//! The report's dangling references are the work list. Each entry is
//! re-checked against the current snapshot before it is resolved; entries
//! that no longer dangle, or whose record changed since the audit, are
//! counted as stale and skipped.

use std::collections::HashMap;

use alm_audit::graph::{self, GraphOptions};
use alm_core::enums::{EntityKind, IssueKind};
use alm_core::reference::Reference;
use alm_core::responses::{AuditReport, ReconcileProposal};
use alm_store::Snapshot;

use crate::reconciler::{Candidate, FuzzyReconciler, candidates};

#[derive(Debug, Clone, Default)]
pub struct Worklist {
    pub proposals: Vec<ReconcileProposal>,
    pub stale: usize,
}

/// Propose a resolution for every still-dangling reference in `report`.
#[must_use]
pub fn propose(
    snapshot: &Snapshot,
    report: &AuditReport,
    reconciler: &FuzzyReconciler,
) -> Worklist {
    let graph = graph::build(snapshot, &GraphOptions::default());
    let mut pools: HashMap<EntityKind, Vec<Candidate>> = HashMap::new();
    let mut worklist = Worklist::default();

    for reference in report
        .issues_of(IssueKind::DanglingReference)
        .filter_map(|issue| issue.reference.as_ref())
    {
        if let Some(reason) = staleness(snapshot, reference) {
            tracing::warn!(
                collection = %reference.source_collection,
                record_index = reference.record_index,
                path = %reference.path,
                target = %reference.target,
                reason,
                "skipping stale report entry"
            );
            worklist.stale += 1;
            continue;
        }
        if graph
            .identifiers
            .contains(reference.target_kind, &reference.target)
        {
            tracing::warn!(
                target = %reference.target,
                "report entry no longer dangles; skipping"
            );
            worklist.stale += 1;
            continue;
        }

        let pool = pools
            .entry(reference.target_kind)
            .or_insert_with(|| candidates(snapshot, reference.target_kind));
        let resolution = reconciler.resolve(&reference.target, pool);
        tracing::debug!(
            target = %reference.target,
            resolved = resolution.effective_target(),
            "proposed resolution"
        );

        worklist.proposals.push(ReconcileProposal {
            collection: reference.source_collection.clone(),
            record_index: reference.record_index,
            record_id: reference.source_id.clone(),
            path: reference.path,
            target_kind: reference.target_kind,
            reference: reference.target.clone(),
            resolution,
        });
    }

    worklist
}

/// Why `reference` no longer describes the current data, if it does not.
fn staleness(snapshot: &Snapshot, reference: &Reference) -> Option<&'static str> {
    let Some(collection) = snapshot.find(&reference.source_collection) else {
        return Some("collection no longer loaded");
    };
    let Some(record) = collection.records.get(reference.record_index) else {
        return Some("record no longer exists");
    };
    if record.id() != reference.source_id.as_deref() {
        return Some("record id changed");
    }
    if reference.path.read(record) != Some(reference.target.as_str()) {
        return Some("reference changed");
    }
    None
}

#[cfg(test)]
mod tests {
    use alm_audit::{AuditOptions, audit};
    use alm_core::collection::CollectionSpec;
    use alm_core::record::Record;
    use alm_store::{ContainerShape, LoadedCollection};
    use serde_json::{Value, json};

    use super::*;
    use crate::similarity::Levenshtein;

    fn collection(name: &str, kind: EntityKind, records: Value) -> LoadedCollection {
        LoadedCollection {
            spec: CollectionSpec::new(name, kind, format!("{name}.json")),
            shape: ContainerShape::BareArray,
            records: records
                .as_array()
                .unwrap()
                .iter()
                .cloned()
                .map(Record::new)
                .collect(),
            had_bom: false,
            missing: false,
        }
    }

    fn reconciler() -> FuzzyReconciler {
        FuzzyReconciler::new(Box::new(Levenshtein), 0.35).unwrap()
    }

    #[test]
    fn fixed_references_are_stale() {
        let before = Snapshot::from_collections(vec![
            collection("gujarat", EntityKind::College, json!([{ "id": "ldce", "name": "LDCE", "acceptedExams": ["gujcet"] }])),
            collection("exams", EntityKind::Exam, json!([])),
        ]);
        let report = audit(&before, &AuditOptions::default());

        let after = Snapshot::from_collections(vec![
            collection("gujarat", EntityKind::College, json!([{ "id": "ldce", "name": "LDCE", "acceptedExams": ["gujcet"] }])),
            collection("exams", EntityKind::Exam, json!([{ "id": "gujcet", "name": "GUJCET" }])),
        ]);
        let worklist = propose(&after, &report, &reconciler());

        assert!(worklist.proposals.is_empty());
        assert_eq!(worklist.stale, 1);
    }

    #[test]
    fn edited_records_are_stale() {
        let before = Snapshot::from_collections(vec![collection(
            "gujarat",
            EntityKind::College,
            json!([{ "id": "ldce", "name": "LDCE", "acceptedExams": ["gujcet"] }]),
        )]);
        let report = audit(&before, &AuditOptions::default());

        let after = Snapshot::from_collections(vec![collection(
            "gujarat",
            EntityKind::College,
            json!([{ "id": "ldce", "name": "LDCE", "acceptedExams": ["jee-main"] }]),
        )]);
        let worklist = propose(&after, &report, &reconciler());

        assert_eq!(worklist.stale, 1);
    }
}
