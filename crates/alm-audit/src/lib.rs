//! # alm-audit
//!
//! Read-only integrity checks over a loaded [`Snapshot`].
//!
//! - [`graph`]: identifier index and outbound references
//! - [`checker`]: composable audit passes
//! - [`report`]: report assembly and text rendering
//!
//! Auditing never writes. Running it twice on an unchanged snapshot yields
//! the same issues in the same order.

pub mod checker;
pub mod graph;
pub mod report;

use alm_config::AuditConfig;
use alm_core::responses::AuditReport;
use alm_store::Snapshot;

pub use checker::{AuditPass, CheckOptions, ConsistencyChecker};
pub use graph::{GraphOptions, ReferenceGraph};

/// Everything one audit run needs besides the data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditOptions {
    pub graph: GraphOptions,
    pub check: CheckOptions,
}

impl From<&AuditConfig> for AuditOptions {
    fn from(config: &AuditConfig) -> Self {
        Self {
            graph: GraphOptions {
                pending_field: config.pending_field.clone(),
            },
            check: CheckOptions {
                placeholders: config.placeholders.clone(),
                check_acceptance_symmetry: config.check_acceptance_symmetry,
            },
        }
    }
}

/// Build the graph, run the standard passes, and assemble the report.
#[must_use]
pub fn audit(snapshot: &Snapshot, options: &AuditOptions) -> AuditReport {
    let graph = graph::build(snapshot, &options.graph);
    let issues = ConsistencyChecker::new(&options.check).check(&graph);
    tracing::info!(
        records = snapshot.record_count(),
        issues = issues.len(),
        "audit finished"
    );
    report::build_report(snapshot, issues)
}
