//! Consistency checker: composable, read-only passes over a reference graph.
//!
//! The checker walks records in graph order (collection order, then record
//! order) and runs every pass on each record before moving on, so issues
//! come out in traversal order. Within a record, passes run in registration
//! order and each pass reports in field order. Nothing is sorted or
//! deduplicated across kinds, and no pass can stop the walk.

use alm_core::enums::{EntityKind, IssueKind};
use alm_core::fields;
use alm_core::issue::Issue;

use crate::graph::{RecordNode, ReferenceGraph};

/// Knobs the checker needs from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub placeholders: Vec<String>,
    pub check_acceptance_symmetry: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            placeholders: fields::PLACEHOLDER_VALUES
                .iter()
                .map(ToString::to_string)
                .collect(),
            check_acceptance_symmetry: false,
        }
    }
}

/// One independent audit rule, evaluated per record.
pub trait AuditPass {
    fn name(&self) -> &'static str;

    /// Append this pass's issues for `node` to `out`.
    fn check(&self, graph: &ReferenceGraph, node: &RecordNode, out: &mut Vec<Issue>);
}

fn issue(kind: IssueKind, node: &RecordNode, detail: impl Into<String>) -> Issue {
    Issue::new(kind, &node.location, detail).with_record(node.id.as_deref(), node.name.as_deref())
}

// ---------------------------------------------------------------------------
// MISSING_REQUIRED_FIELD
// ---------------------------------------------------------------------------

pub struct RequiredFields;

impl AuditPass for RequiredFields {
    fn name(&self) -> &'static str {
        "required_fields"
    }

    fn check(&self, _graph: &ReferenceGraph, node: &RecordNode, out: &mut Vec<Issue>) {
        if node.id.is_none() {
            out.push(issue(
                IssueKind::MissingRequiredField,
                node,
                "record has no 'id' (absent, empty, or not a string)",
            ));
        }
        if node.name.is_none() {
            out.push(issue(
                IssueKind::MissingRequiredField,
                node,
                "record has no 'name' (absent, empty, or not a string)",
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// DUPLICATE_ID
// ---------------------------------------------------------------------------

/// Reports each duplicated id once, at its first occurrence, listing all.
pub struct DuplicateIds;

impl AuditPass for DuplicateIds {
    fn name(&self) -> &'static str {
        "duplicate_ids"
    }

    fn check(&self, graph: &ReferenceGraph, node: &RecordNode, out: &mut Vec<Issue>) {
        let Some(id) = node.id.as_deref() else {
            return;
        };
        let occurrences = graph.identifiers.occurrences(node.kind, id);
        if occurrences.len() < 2 || occurrences[0].location != node.location {
            return;
        }

        let places = occurrences
            .iter()
            .map(|e| format!("{}#{}", e.location.collection, e.location.record_index))
            .collect::<Vec<_>>()
            .join(", ");
        out.push(
            issue(
                IssueKind::DuplicateId,
                node,
                format!(
                    "{} id '{id}' appears {} times: {places}",
                    node.kind,
                    occurrences.len()
                ),
            )
            .with_occurrences(occurrences.iter().map(|e| e.location.clone()).collect()),
        );
    }
}

// ---------------------------------------------------------------------------
// DANGLING_REFERENCE
// ---------------------------------------------------------------------------

pub struct DanglingReferences;

impl AuditPass for DanglingReferences {
    fn name(&self) -> &'static str {
        "dangling_references"
    }

    fn check(&self, graph: &ReferenceGraph, node: &RecordNode, out: &mut Vec<Issue>) {
        for reference in graph.references_of(node) {
            if graph
                .identifiers
                .contains(reference.target_kind, &reference.target)
            {
                continue;
            }
            out.push(
                issue(
                    IssueKind::DanglingReference,
                    node,
                    format!(
                        "{} references unknown {} '{}'",
                        reference.path, reference.target_kind, reference.target
                    ),
                )
                .with_reference(reference.clone()),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// ACCEPTED_CUTOFF_MISMATCH
// ---------------------------------------------------------------------------

/// Accepted exams and cutoff history must cover the same exam ids.
///
/// An accepted exam counts as covered when it has a cutoff entry (even a
/// placeholder) or is listed in the record's pending field. Colleges only.
pub struct AcceptedCutoffConsistency;

impl AuditPass for AcceptedCutoffConsistency {
    fn name(&self) -> &'static str {
        "accepted_cutoff_consistency"
    }

    fn check(&self, _graph: &ReferenceGraph, node: &RecordNode, out: &mut Vec<Issue>) {
        if node.kind != EntityKind::College {
            return;
        }

        let cutoff_exams = unique(node.cutoffs.iter().filter_map(|c| c.exam_id.as_deref()));
        let accepted = unique(node.accepted.iter().map(String::as_str));

        for exam in &accepted {
            if !cutoff_exams.contains(exam) && !node.pending.iter().any(|p| p == exam) {
                out.push(issue(
                    IssueKind::AcceptedCutoffMismatch,
                    node,
                    format!("accepts exam '{exam}' but has no cutoff history for it"),
                ));
            }
        }
        for exam in &cutoff_exams {
            if !accepted.contains(exam) {
                out.push(issue(
                    IssueKind::AcceptedCutoffMismatch,
                    node,
                    format!("has cutoff history for exam '{exam}' but does not accept it"),
                ));
            }
        }
    }
}

/// First occurrence of each value, order kept.
fn unique<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// PLACEHOLDER_DATA
// ---------------------------------------------------------------------------

pub struct Placeholders {
    values: Vec<String>,
}

impl Placeholders {
    #[must_use]
    pub const fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    fn is_placeholder(&self, value: &str) -> bool {
        self.values.iter().any(|p| p.trim().eq_ignore_ascii_case(value.trim()))
    }
}

impl AuditPass for Placeholders {
    fn name(&self) -> &'static str {
        "placeholders"
    }

    fn check(&self, _graph: &ReferenceGraph, node: &RecordNode, out: &mut Vec<Issue>) {
        for cutoff in &node.cutoffs {
            let Some(value) = cutoff.value.as_deref() else {
                continue;
            };
            if !self.is_placeholder(value) {
                continue;
            }
            let exam = cutoff.exam_id.as_deref().unwrap_or("?");
            out.push(issue(
                IssueKind::PlaceholderData,
                node,
                format!(
                    "{}[{}] cutoff for exam '{exam}' is placeholder '{value}'",
                    fields::PAST_CUTOFFS,
                    cutoff.index
                ),
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// ACCEPTANCE_ASYMMETRY
// ---------------------------------------------------------------------------

/// An exam's `collegesAccepting` and a college's `acceptedExams` should
/// agree. Only pairs where both records exist are compared; a missing
/// record is already a dangling reference.
pub struct AcceptanceSymmetry;

impl AuditPass for AcceptanceSymmetry {
    fn name(&self) -> &'static str {
        "acceptance_symmetry"
    }

    fn check(&self, graph: &ReferenceGraph, node: &RecordNode, out: &mut Vec<Issue>) {
        let Some(id) = node.id.as_deref() else {
            return;
        };
        match node.kind {
            EntityKind::Exam => {
                for reference in graph.references_of(node) {
                    let Some(college) = graph.node_by_id(EntityKind::College, &reference.target)
                    else {
                        continue;
                    };
                    if !college.accepted.iter().any(|exam| exam == id) {
                        out.push(issue(
                            IssueKind::AcceptanceAsymmetry,
                            node,
                            format!(
                                "lists college '{}' in {} but the college does not accept '{id}'",
                                reference.target,
                                fields::COLLEGES_ACCEPTING
                            ),
                        ));
                    }
                }
            }
            EntityKind::College => {
                for exam_id in unique(node.accepted.iter().map(String::as_str)) {
                    let Some(exam) = graph.node_by_id(EntityKind::Exam, exam_id) else {
                        continue;
                    };
                    let listed = graph
                        .references_of(exam)
                        .iter()
                        .any(|reference| reference.target == id);
                    if !listed {
                        out.push(issue(
                            IssueKind::AcceptanceAsymmetry,
                            node,
                            format!(
                                "accepts exam '{exam_id}' but the exam does not list this college in {}",
                                fields::COLLEGES_ACCEPTING
                            ),
                        ));
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ConsistencyChecker
// ---------------------------------------------------------------------------

/// An ordered set of passes.
pub struct ConsistencyChecker {
    passes: Vec<Box<dyn AuditPass>>,
}

impl ConsistencyChecker {
    /// The standard pass set for `options`.
    #[must_use]
    pub fn new(options: &CheckOptions) -> Self {
        let mut passes: Vec<Box<dyn AuditPass>> = vec![
            Box::new(RequiredFields),
            Box::new(DuplicateIds),
            Box::new(DanglingReferences),
            Box::new(AcceptedCutoffConsistency),
            Box::new(Placeholders::new(options.placeholders.clone())),
        ];
        if options.check_acceptance_symmetry {
            passes.push(Box::new(AcceptanceSymmetry));
        }
        Self { passes }
    }

    /// A checker running exactly `passes`, in order.
    #[must_use]
    pub fn with_passes(passes: Vec<Box<dyn AuditPass>>) -> Self {
        Self { passes }
    }

    #[must_use]
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Run every pass on every record. Pure: `graph` is only read.
    #[must_use]
    pub fn check(&self, graph: &ReferenceGraph) -> Vec<Issue> {
        let mut issues = Vec::new();
        for node in &graph.nodes {
            for pass in &self.passes {
                pass.check(graph, node, &mut issues);
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetry_pass_is_opt_in() {
        let default = ConsistencyChecker::new(&CheckOptions::default());
        assert!(!default.pass_names().contains(&"acceptance_symmetry"));

        let with = ConsistencyChecker::new(&CheckOptions {
            check_acceptance_symmetry: true,
            ..Default::default()
        });
        assert_eq!(with.pass_names().last(), Some(&"acceptance_symmetry"));
    }

    #[test]
    fn unique_keeps_first_occurrence_order() {
        assert_eq!(
            unique(["b", "a", "b", "c", "a"].into_iter()),
            vec!["b", "a", "c"]
        );
    }

    #[test]
    fn placeholder_match_ignores_case() {
        let pass = Placeholders::new(vec!["Data Pending".to_string()]);
        assert!(pass.is_placeholder("data pending"));
        assert!(pass.is_placeholder(" Data Pending "));
        assert!(!pass.is_placeholder("Data Pending soon"));
    }
}
