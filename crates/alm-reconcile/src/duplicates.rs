//! Near-duplicate detection: different ids that look like the same entity.
//!
//! Read-only. Pairs are reported as low-confidence matches for a human to
//! review; nothing is merged.

use alm_core::enums::{EntityKind, MatchedField};
use alm_core::responses::{DuplicateSide, NearDuplicate};
use alm_store::Snapshot;

use crate::reconciler::{Candidate, FuzzyReconciler, candidates};
use crate::similarity::normalize;

/// Every pair of same-kind records with different ids whose name or short
/// name lies within the reconciler's threshold.
///
/// Pairs come out in record order of the left side, then the right side.
#[must_use]
pub fn find_near_duplicates(snapshot: &Snapshot, reconciler: &FuzzyReconciler) -> Vec<NearDuplicate> {
    let mut found = Vec::new();
    for kind in [EntityKind::College, EntityKind::Exam] {
        let pool = candidates(snapshot, kind);
        for (i, left) in pool.iter().enumerate() {
            for right in &pool[i + 1..] {
                if left.id == right.id {
                    continue;
                }
                let Some((distance, field)) = closest(reconciler, left, right) else {
                    continue;
                };
                if reconciler.accepts(distance) {
                    found.push(NearDuplicate {
                        kind,
                        left: side(left),
                        right: side(right),
                        distance,
                        matched_field: field,
                    });
                }
            }
        }
    }
    tracing::debug!(pairs = found.len(), "near-duplicate scan finished");
    found
}

/// Smallest distance between the descriptive fields of two candidates.
fn closest(
    reconciler: &FuzzyReconciler,
    left: &Candidate,
    right: &Candidate,
) -> Option<(f64, MatchedField)> {
    let pairs = [
        (MatchedField::Name, left.name.as_deref(), right.name.as_deref()),
        (
            MatchedField::ShortName,
            left.short_name.as_deref(),
            right.short_name.as_deref(),
        ),
    ];

    let mut best: Option<(f64, MatchedField)> = None;
    for (field, a, b) in pairs {
        let (Some(a), Some(b)) = (a, b) else {
            continue;
        };
        let (a, b) = (normalize(a), normalize(b));
        if a.is_empty() || b.is_empty() {
            continue;
        }
        let distance = reconciler.strategy().distance(&a, &b);
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, field));
        }
    }
    best
}

fn side(candidate: &Candidate) -> DuplicateSide {
    DuplicateSide {
        id: candidate.id.clone(),
        name: candidate.name.clone(),
        collection: candidate.collection.clone(),
    }
}

#[cfg(test)]
mod tests {
    use alm_core::collection::CollectionSpec;
    use alm_core::record::Record;
    use alm_store::{ContainerShape, LoadedCollection};
    use pretty_assertions::assert_eq;
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

    #[test]
    fn pairs_similar_names_across_files() {
        let snapshot = Snapshot::from_collections(vec![
            collection(
                "gujarat",
                EntityKind::College,
                json!([{ "id": "svnit", "name": "S.V. National Institute of Technology" }]),
            ),
            collection(
                "gujarat-old",
                EntityKind::College,
                json!([
                    { "id": "svnit-surat", "name": "SV National Institute of Technology" },
                    { "id": "ldce", "name": "L.D. College of Engineering" }
                ]),
            ),
        ]);
        let reconciler = FuzzyReconciler::new(Box::new(Levenshtein), 0.15).unwrap();

        let pairs = find_near_duplicates(&snapshot, &reconciler);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].left.id, "svnit");
        assert_eq!(pairs[0].right.id, "svnit-surat");
        assert_eq!(pairs[0].right.collection, "gujarat-old");
        assert_eq!(pairs[0].matched_field, MatchedField::Name);
    }

    #[test]
    fn exact_id_duplicates_and_cross_kind_pairs_are_ignored() {
        let snapshot = Snapshot::from_collections(vec![
            collection(
                "gujarat",
                EntityKind::College,
                json!([{ "id": "cet", "name": "CET" }, { "id": "cet", "name": "CET" }]),
            ),
            collection("exams", EntityKind::Exam, json!([{ "id": "cet-exam", "name": "CET" }])),
        ]);
        let reconciler = FuzzyReconciler::new(Box::new(Levenshtein), 0.15).unwrap();

        assert!(find_near_duplicates(&snapshot, &reconciler).is_empty());
    }
}
