//! Report assembly and plain-text rendering.

use std::fmt::Write as _;

use alm_core::issue::Issue;
use alm_core::responses::AuditReport;
use alm_store::Snapshot;
use chrono::Utc;

/// Wrap checker output in an [`AuditReport`] for `snapshot`.
#[must_use]
pub fn build_report(snapshot: &Snapshot, issues: Vec<Issue>) -> AuditReport {
    AuditReport {
        generated_at: Utc::now(),
        collections: snapshot.summaries(),
        failures: snapshot.failures().to_vec(),
        summary: AuditReport::summarize(&issues),
        issues,
    }
}

/// Human-readable report.
///
/// Tooling failures come first, marked `ERROR` so they are never mistaken
/// for data findings. Issues are grouped under their collection in the
/// order they were found; the summary closes the report.
#[must_use]
pub fn render_text(report: &AuditReport) -> String {
    let mut out = String::new();

    for failure in &report.failures {
        let _ = writeln!(
            out,
            "ERROR  {} ({}): {}",
            failure.collection,
            failure.path.display(),
            failure.message
        );
    }
    if report.has_tooling_failures() {
        out.push('\n');
    }

    let mut current: Option<&str> = None;
    for issue in &report.issues {
        if current != Some(issue.collection.as_str()) {
            if current.is_some() {
                out.push('\n');
            }
            let _ = writeln!(out, "{} ({})", issue.collection, issue.path.display());
            current = Some(issue.collection.as_str());
        }
        let _ = writeln!(
            out,
            "  {:<26} {}: {}",
            issue.kind,
            issue.record_label(),
            issue.detail
        );
    }
    if current.is_some() {
        out.push('\n');
    }

    let records: usize = report.collections.iter().map(|c| c.records).sum();
    let _ = writeln!(
        out,
        "{} issue(s) in {records} record(s) across {} collection(s)",
        report.issues.len(),
        report.collections.len()
    );
    for (kind, count) in &report.summary {
        let _ = writeln!(out, "  {kind:<26} {count}");
    }
    for collection in report.collections.iter().filter(|c| c.missing) {
        let _ = writeln!(
            out,
            "  note: {} ({}) does not exist; audited as empty",
            collection.name,
            collection.path.display()
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use alm_core::enums::{EntityKind, IssueKind};
    use alm_core::issue::Location;
    use alm_core::responses::{CollectionSummary, LoadFailure};

    use super::*;

    fn location(collection: &str, index: usize) -> Location {
        Location {
            collection: collection.to_string(),
            path: PathBuf::from(format!("{collection}.json")),
            record_index: index,
        }
    }

    fn report(issues: Vec<Issue>, failures: Vec<LoadFailure>) -> AuditReport {
        AuditReport {
            generated_at: Utc::now(),
            collections: vec![CollectionSummary {
                name: "gujarat".to_string(),
                kind: EntityKind::College,
                path: PathBuf::from("gujarat.json"),
                records: 2,
                missing: false,
            }],
            failures,
            summary: AuditReport::summarize(&issues),
            issues,
        }
    }

    #[test]
    fn groups_issues_under_their_collection() {
        let text = render_text(&report(
            vec![
                Issue::new(
                    IssueKind::DanglingReference,
                    &location("gujarat", 0),
                    "acceptedExams[1] references unknown exam 'gujcet'",
                )
                .with_record(Some("ldce"), Some("LDCE")),
                Issue::new(IssueKind::MissingRequiredField, &location("gujarat", 1), "no name")
                    .with_record(Some("ddu"), None),
            ],
            Vec::new(),
        ));

        assert!(text.starts_with("gujarat (gujarat.json)\n"));
        assert!(text.contains("DANGLING_REFERENCE"));
        assert!(text.contains("ldce (LDCE): acceptedExams[1]"));
        assert_eq!(text.matches("gujarat (gujarat.json)").count(), 1);
        assert!(text.contains("2 issue(s) in 2 record(s) across 1 collection(s)"));
    }

    #[test]
    fn tooling_failures_lead_and_are_marked() {
        let text = render_text(&report(
            Vec::new(),
            vec![LoadFailure {
                collection: "kerala".to_string(),
                path: PathBuf::from("kerala.json"),
                message: "expected value at line 1".to_string(),
            }],
        ));

        assert!(text.starts_with("ERROR  kerala (kerala.json): expected value"));
        assert!(text.contains("0 issue(s)"));
    }

    #[test]
    fn summary_counts_match_issues() {
        let issues = vec![
            Issue::new(IssueKind::PlaceholderData, &location("gujarat", 0), "a"),
            Issue::new(IssueKind::PlaceholderData, &location("gujarat", 1), "b"),
        ];
        let summary: BTreeMap<_, _> = report(issues, Vec::new()).summary;
        assert_eq!(summary.get(&IssueKind::PlaceholderData), Some(&2));
        assert_eq!(summary.len(), 1);
    }
}
