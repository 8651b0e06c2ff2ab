use alm_core::responses::MergeResponse;
use alm_store::maintenance::{plan_merge, remove_collection_file};
use alm_store::writer::write_all;
use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::MergeArgs;
use crate::commands::Outcome;
use crate::context::AppContext;
use crate::output::output;

/// Handle `alm merge`.
///
/// The source file is only deleted after the target was written.
pub fn handle(args: &MergeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Outcome> {
    let snapshot = ctx.load_snapshot();
    let plan = plan_merge(&snapshot, &args.from, &args.into)
        .with_context(|| format!("cannot merge '{}' into '{}'", args.from, args.into))?;
    let source_path = snapshot.require(&args.from)?.path().to_path_buf();

    for id in &plan.collisions {
        tracing::warn!(%id, into = %args.into, "id already present in target; record not copied");
    }

    let summary = write_all(std::iter::once(&plan.target));
    let source_removed = if args.remove_source && summary.failures.is_empty() {
        remove_collection_file(&source_path)
            .with_context(|| format!("merged, but failed to remove {}", source_path.display()))?;
        tracing::info!(path = %source_path.display(), "removed merged source collection");
        true
    } else {
        false
    };

    let response = MergeResponse {
        from: args.from.clone(),
        into: args.into.clone(),
        appended: plan.appended,
        collisions: plan.collisions,
        written: summary.written,
        write_failures: summary.failures,
        source_removed,
    };
    output(&response, flags.format)?;

    Ok(Outcome::from_failures(!response.write_failures.is_empty()))
}
