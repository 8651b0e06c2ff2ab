use alm_core::responses::DedupeResponse;
use alm_store::maintenance::plan_dedupe;
use alm_store::writer::{WriteSummary, write_all};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DedupeArgs;
use crate::commands::Outcome;
use crate::context::AppContext;
use crate::output::output_rows;

/// Handle `alm dedupe`.
pub fn handle(args: &DedupeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Outcome> {
    let snapshot = ctx.load_snapshot();
    if !snapshot.failures().is_empty() {
        anyhow::bail!(
            "refusing to remove duplicates: {} collection(s) failed to load; run `alm audit` for details",
            snapshot.failures().len()
        );
    }

    let plan = plan_dedupe(&snapshot);
    let summary = if args.dry_run {
        WriteSummary::default()
    } else {
        write_all(&plan.updated)
    };

    let response = DedupeResponse {
        dry_run: args.dry_run,
        removed: plan.removed,
        written: summary.written,
        write_failures: summary.failures,
    };

    let rows = response
        .removed
        .iter()
        .map(|removed| {
            vec![
                removed.id.clone(),
                format!("{}#{}", removed.location.collection, removed.location.record_index),
                format!("{}#{}", removed.kept.collection, removed.kept.record_index),
            ]
        })
        .collect::<Vec<_>>();
    output_rows(&response, flags.format, &["id", "removed", "kept"], &rows)?;

    Ok(Outcome::from_failures(!response.write_failures.is_empty()))
}
