//! Reference graph: known identifiers plus every outbound reference.
//!
//! Built once from a [`Snapshot`]; the checker passes only read it.
//! Identifiers are indexed per entity kind, so colleges split over several
//! state files form one logical collection.

use std::collections::HashMap;
use std::ops::Range;

use alm_core::enums::EntityKind;
use alm_core::fields;
use alm_core::issue::Location;
use alm_core::record::{Record, indexed_strings, is_blank};
use alm_core::reference::{FieldPath, Reference};
use alm_store::Snapshot;
use serde_json::Value;

/// Knobs the graph builder needs from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphOptions {
    /// Record field listing exam ids with knowingly pending cutoffs.
    pub pending_field: String,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            pending_field: fields::PENDING_CUTOFFS.to_string(),
        }
    }
}

/// Where one identifier was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierEntry {
    pub id: String,
    pub kind: EntityKind,
    pub location: Location,
}

/// Every declared identifier, tagged by kind and owning collection.
#[derive(Debug, Clone, Default)]
pub struct IdentifierIndex {
    entries: Vec<IdentifierEntry>,
    by_key: HashMap<(EntityKind, String), Vec<usize>>,
}

impl IdentifierIndex {
    fn insert(&mut self, entry: IdentifierEntry) {
        let key = (entry.kind, entry.id.clone());
        self.by_key.entry(key).or_default().push(self.entries.len());
        self.entries.push(entry);
    }

    #[must_use]
    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.by_key.contains_key(&(kind, id.to_string()))
    }

    /// All declarations of `id` for `kind`, in load order.
    #[must_use]
    pub fn occurrences(&self, kind: EntityKind, id: &str) -> Vec<&IdentifierEntry> {
        self.by_key
            .get(&(kind, id.to_string()))
            .map(|indices| indices.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn entries(&self) -> &[IdentifierEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One cutoff history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutoffEntry {
    pub index: usize,
    pub exam_id: Option<String>,
    /// The cutoff value when it is a string; numeric cutoffs read as `None`.
    pub value: Option<String>,
}

/// The audit-relevant facts about one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordNode {
    pub kind: EntityKind,
    pub location: Location,
    pub id: Option<String>,
    pub name: Option<String>,
    /// `acceptedExams` entries, in order.
    pub accepted: Vec<String>,
    pub cutoffs: Vec<CutoffEntry>,
    /// Exam ids listed in the pending-cutoffs field.
    pub pending: Vec<String>,
    /// Slice of [`ReferenceGraph::references`] owned by this record.
    pub references: Range<usize>,
}

/// Identifier index, reference list, and per-record facts.
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    pub identifiers: IdentifierIndex,
    pub references: Vec<Reference>,
    pub nodes: Vec<RecordNode>,
}

impl ReferenceGraph {
    /// References declared by `node`, in field order.
    #[must_use]
    pub fn references_of(&self, node: &RecordNode) -> &[Reference] {
        &self.references[node.references.clone()]
    }

    /// Node at `collection` / `record_index`, if any.
    #[must_use]
    pub fn node(&self, collection: &str, record_index: usize) -> Option<&RecordNode> {
        self.nodes.iter().find(|node| {
            node.location.collection == collection && node.location.record_index == record_index
        })
    }

    /// The record with this id and kind (first declaration).
    #[must_use]
    pub fn node_by_id(&self, kind: EntityKind, id: &str) -> Option<&RecordNode> {
        let entry = self.identifiers.occurrences(kind, id).into_iter().next()?;
        self.node(&entry.location.collection, entry.location.record_index)
    }
}

/// Build the reference graph for `snapshot`.
///
/// Missing optional fields read as empty. Non-string entries inside
/// reference lists are skipped.
#[must_use]
pub fn build(snapshot: &Snapshot, options: &GraphOptions) -> ReferenceGraph {
    let mut graph = ReferenceGraph::default();

    for collection in snapshot.collections() {
        let kind = collection.kind();
        for (index, record) in collection.records.iter().enumerate() {
            let location = collection.location(index);
            let id = record.id().map(ToString::to_string);

            if let Some(id) = &id {
                graph.identifiers.insert(IdentifierEntry {
                    id: id.clone(),
                    kind,
                    location: location.clone(),
                });
            }

            let start = graph.references.len();
            let mut push = |path: FieldPath, target: &str| {
                graph.references.push(Reference {
                    source_id: id.clone(),
                    source_kind: kind,
                    source_collection: collection.name().to_string(),
                    record_index: index,
                    target: target.to_string(),
                    target_kind: path.target_kind(),
                    path,
                });
            };

            let mut node = RecordNode {
                kind,
                location,
                id: id.clone(),
                name: record.name().map(ToString::to_string),
                accepted: Vec::new(),
                cutoffs: Vec::new(),
                pending: Vec::new(),
                references: 0..0,
            };

            match kind {
                EntityKind::College => {
                    for (i, exam) in record.string_list(fields::ACCEPTED_EXAMS) {
                        push(FieldPath::AcceptedExams { index: i }, exam);
                        node.accepted.push(exam.to_string());
                    }
                    for (course, entry) in record.array(fields::COURSES).iter().enumerate() {
                        for (i, exam) in course_exams(entry) {
                            push(FieldPath::CourseExams { course, index: i }, exam);
                        }
                    }
                    for cutoff in cutoffs(record) {
                        if let Some(exam) = &cutoff.exam_id {
                            push(FieldPath::PastCutoffs { index: cutoff.index }, exam);
                        }
                        node.cutoffs.push(cutoff);
                    }
                    node.pending = record
                        .string_list(&options.pending_field)
                        .into_iter()
                        .map(|(_, exam)| exam.to_string())
                        .collect();
                }
                EntityKind::Exam => {
                    for (i, college) in record.string_list(fields::COLLEGES_ACCEPTING) {
                        push(FieldPath::CollegesAccepting { index: i }, college);
                    }
                }
            }

            node.references = start..graph.references.len();
            graph.nodes.push(node);
        }
    }

    tracing::debug!(
        identifiers = graph.identifiers.len(),
        references = graph.references.len(),
        "built reference graph"
    );
    graph
}

fn course_exams(course: &Value) -> Vec<(usize, &str)> {
    course
        .get(fields::COURSE_EXAMS)
        .and_then(Value::as_array)
        .map(|exams| indexed_strings(exams))
        .unwrap_or_default()
}

fn cutoffs(record: &Record) -> Vec<CutoffEntry> {
    record
        .array(fields::PAST_CUTOFFS)
        .iter()
        .enumerate()
        .map(|(index, entry)| CutoffEntry {
            index,
            exam_id: non_blank(entry.get(fields::CUTOFF_EXAM_ID)),
            value: non_blank(entry.get(fields::CUTOFF_VALUE)),
        })
        .collect()
}

/// Identifiers are compared exactly, so the stored text is kept as is.
fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !is_blank(s))
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use alm_core::collection::CollectionSpec;
    use alm_store::{ContainerShape, LoadedCollection};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

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
    fn collects_references_in_field_order() {
        let snapshot = Snapshot::from_collections(vec![collection(
            "gujarat",
            EntityKind::College,
            json!([{
                "id": "ldce",
                "name": "LDCE",
                "acceptedExams": ["gujcet"],
                "courses": [
                    { "name": "B.E.", "exams": ["gujcet", "jee-main"] },
                    { "name": "M.E." }
                ],
                "pastCutoffs": [{ "examId": "gujcet", "year": 2024, "cutoff": "5000" }]
            }]),
        )]);

        let graph = build(&snapshot, &GraphOptions::default());

        let paths: Vec<_> = graph.references.iter().map(|r| r.path.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "acceptedExams[0]",
                "courses[0].exams[0]",
                "courses[0].exams[1]",
                "pastCutoffs[0].examId",
            ]
        );
        assert!(graph.references.iter().all(|r| r.target_kind == EntityKind::Exam));
        assert_eq!(graph.references_of(&graph.nodes[0]).len(), 4);
    }

    #[test]
    fn tolerates_missing_and_malformed_fields() {
        let snapshot = Snapshot::from_collections(vec![
            collection(
                "kerala",
                EntityKind::College,
                json!([
                    { "id": "nitc" },
                    { "id": "cet", "acceptedExams": "keam", "courses": "n/a", "pastCutoffs": [1, {"cutoff": 30}] },
                    "not a record"
                ]),
            ),
            collection("exams", EntityKind::Exam, json!([{ "id": "keam" }])),
        ]);

        let graph = build(&snapshot, &GraphOptions::default());

        assert!(graph.references.is_empty());
        assert_eq!(graph.nodes.len(), 4);
        assert_eq!(graph.nodes[1].cutoffs.len(), 2);
        assert_eq!(graph.nodes[1].cutoffs[1].value, None);
        assert_eq!(graph.nodes[2].id, None);
    }

    #[test]
    fn identifier_index_tracks_kind_and_collection() {
        let snapshot = Snapshot::from_collections(vec![
            collection("gujarat", EntityKind::College, json!([{ "id": "nit-x" }])),
            collection("rajasthan", EntityKind::College, json!([{ "id": "nit-x" }])),
            collection("exams", EntityKind::Exam, json!([{ "id": "nit-x" }])),
        ]);

        let graph = build(&snapshot, &GraphOptions::default());

        let colleges = graph.identifiers.occurrences(EntityKind::College, "nit-x");
        let owners: Vec<_> = colleges
            .iter()
            .map(|e| e.location.collection.as_str())
            .collect();
        assert_eq!(owners, vec!["gujarat", "rajasthan"]);
        assert_eq!(graph.identifiers.occurrences(EntityKind::Exam, "nit-x").len(), 1);
        assert!(!graph.identifiers.contains(EntityKind::Exam, "ldce"));
    }
}
