use alm_reconcile::FuzzyReconciler;
use alm_reconcile::duplicates::find_near_duplicates;

use crate::cli::GlobalFlags;
use crate::commands::Outcome;
use crate::context::AppContext;
use crate::output::output_rows;

/// Handle `alm duplicates`. Read-only.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Outcome> {
    let snapshot = ctx.load_snapshot();
    let reconciler = FuzzyReconciler::for_duplicates(&ctx.config.reconcile)?;
    let pairs = find_near_duplicates(&snapshot, &reconciler);

    let rows = pairs
        .iter()
        .map(|pair| {
            vec![
                pair.kind.to_string(),
                format!("{} ({})", pair.left.id, pair.left.collection),
                format!("{} ({})", pair.right.id, pair.right.collection),
                pair.matched_field.to_string(),
                format!("{:.3}", pair.distance),
            ]
        })
        .collect::<Vec<_>>();
    output_rows(
        &pairs,
        flags.format,
        &["kind", "left", "right", "field", "distance"],
        &rows,
    )?;

    Ok(Outcome::from_failures(!snapshot.failures().is_empty()))
}
