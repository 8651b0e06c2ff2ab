use alm_core::patch::PatchSet;
use alm_core::responses::{AuditReport, ReconcileResponse, Resolution};
use alm_reconcile::FuzzyReconciler;
use alm_reconcile::rewrite::to_patch;
use alm_reconcile::worklist::propose;
use alm_schema::SchemaRegistry;
use alm_store::patch::{commit, plan};
use alm_store::writer::write_atomic;
use anyhow::Context;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::cli::root_commands::ReconcileArgs;
use crate::commands::Outcome;
use crate::context::AppContext;
use crate::output::output_rows;

/// Handle `alm reconcile`.
///
/// Advisory unless `--apply`: proposals are printed (and optionally saved as
/// a patch set) but no collection file is touched.
pub fn handle(
    args: &ReconcileArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<Outcome> {
    let report = read_report(args)?;
    let snapshot = ctx.load_snapshot();
    let reconciler = FuzzyReconciler::from_config(&ctx.config.reconcile)?;
    tracing::debug!(
        strategy = %reconciler.strategy().kind(),
        max_distance = reconciler.max_distance(),
        "reconciling dangling references"
    );

    let worklist = propose(&snapshot, &report, &reconciler);
    let needs_patch = args.apply || args.emit_patch.is_some();
    let rewrite = needs_patch.then(|| to_patch(&snapshot, &worklist.proposals));

    if let (Some(path), Some(rewrite)) = (&args.emit_patch, &rewrite) {
        write_patch(path, &rewrite.patch)?;
    }

    let patch = match &rewrite {
        Some(rewrite) if args.apply => {
            for proposal in worklist.proposals.iter().filter(|p| !p.resolution.is_resolved()) {
                tracing::warn!(
                    collection = %proposal.collection,
                    record_index = proposal.record_index,
                    path = %proposal.path,
                    reference = %proposal.reference,
                    "no confident match; left for manual follow-up"
                );
            }
            Some(commit(
                plan(&snapshot, &rewrite.patch, &ctx.merge_options()),
                false,
            ))
        }
        _ => None,
    };

    let response = ReconcileResponse {
        applied: patch.is_some(),
        proposals: worklist.proposals,
        stale: worklist.stale,
        patch,
    };
    print_response(&response, flags)?;

    let write_failed = response
        .patch
        .as_ref()
        .is_some_and(|p| !p.write_failures.is_empty());
    Ok(Outcome::from_failures(
        write_failed || !snapshot.failures().is_empty(),
    ))
}

fn read_report(args: &ReconcileArgs) -> anyhow::Result<AuditReport> {
    let path = &args.report;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read audit report {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("audit report {} is not valid JSON", path.display()))?;
    SchemaRegistry::new()
        .validate("audit_report", &value)
        .with_context(|| format!("{} is not an audit report", path.display()))?;
    Ok(serde_json::from_value(value)?)
}

fn write_patch(path: &std::path::Path, patch: &PatchSet) -> anyhow::Result<()> {
    let mut json = serde_json::to_string_pretty(patch)?;
    json.push('\n');
    write_atomic(path, &json)
        .with_context(|| format!("failed to write patch set to {}", path.display()))?;
    tracing::info!(path = %path.display(), entries = patch.len(), "wrote patch set");
    Ok(())
}

fn print_response(response: &ReconcileResponse, flags: &GlobalFlags) -> anyhow::Result<()> {
    let rows = response
        .proposals
        .iter()
        .map(|proposal| {
            let record = proposal
                .record_id
                .clone()
                .unwrap_or_else(|| format!("#{}", proposal.record_index));
            let (status, target, distance) = match &proposal.resolution {
                Resolution::Resolved {
                    target, distance, ..
                } => ("resolved", target.clone(), format!("{distance:.3}")),
                Resolution::Unresolved { .. } => ("unresolved", "-".to_string(), "-".to_string()),
            };
            vec![
                proposal.collection.clone(),
                record,
                proposal.path.to_string(),
                proposal.reference.clone(),
                status.to_string(),
                target,
                distance,
            ]
        })
        .collect::<Vec<_>>();

    output_rows(
        response,
        flags.format,
        &[
            "collection",
            "record",
            "field",
            "reference",
            "status",
            "target",
            "distance",
        ],
        &rows,
    )?;
    if flags.format != OutputFormat::Table {
        return Ok(());
    }
    if response.stale > 0 {
        println!("skipped {} stale report entries", response.stale);
    }
    if let Some(patch) = &response.patch {
        println!();
        super::patch::print_response(patch, flags)?;
    }
    Ok(())
}
