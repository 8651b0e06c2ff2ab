use alm_core::patch::PatchSet;
use alm_core::responses::PatchResponse;
use alm_schema::SchemaRegistry;
use alm_store::patch::{commit, plan};
use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PatchArgs;
use crate::commands::Outcome;
use crate::context::AppContext;
use crate::output::output_rows;

/// Handle `alm patch`.
pub fn handle(args: &PatchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Outcome> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read patch set {}", args.file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("patch set {} is not valid JSON", args.file.display()))?;
    SchemaRegistry::new()
        .validate("patch_set", &value)
        .with_context(|| format!("patch set {} is malformed", args.file.display()))?;
    let patch: PatchSet = serde_json::from_value(value)?;

    let snapshot = ctx.load_snapshot();
    let response = commit(plan(&snapshot, &patch, &ctx.merge_options()), args.dry_run);

    print_response(&response, flags)?;
    Ok(Outcome::from_failures(
        !snapshot.failures().is_empty() || !response.write_failures.is_empty(),
    ))
}

/// One row per patch entry and per write failure.
pub fn print_response(response: &PatchResponse, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut rows = Vec::new();
    for applied in &response.applied {
        let places = applied
            .locations
            .iter()
            .map(|l| format!("{}#{}", l.collection, l.record_index))
            .collect::<Vec<_>>()
            .join(", ");
        rows.push(vec![
            applied.id.clone(),
            "applied".to_string(),
            format!("{} -> {places}", applied.fields.join(", ")),
        ]);
    }
    for skipped in &response.not_applied {
        rows.push(vec![
            skipped.id.clone(),
            "not_applied".to_string(),
            skipped.reason.clone(),
        ]);
    }
    for failure in &response.write_failures {
        rows.push(vec![
            failure.collection.clone(),
            "failed".to_string(),
            failure.message.clone(),
        ]);
    }
    if response.dry_run && !response.applied.is_empty() {
        rows.push(vec!["-".to_string(), "skipped".to_string(), "dry run: nothing written".to_string()]);
    }

    output_rows(response, flags.format, &["id", "status", "detail"], &rows)
}
