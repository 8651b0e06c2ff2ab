use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands::{self, Outcome};
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Outcome> {
    match command {
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags),
        Commands::Reconcile(args) => commands::reconcile::handle(&args, ctx, flags),
        Commands::Patch(args) => commands::patch::handle(&args, ctx, flags),
        Commands::Dedupe(args) => commands::dedupe::handle(&args, ctx, flags),
        Commands::Merge(args) => commands::merge::handle(&args, ctx, flags),
        Commands::Duplicates => commands::duplicates::handle(ctx, flags),
        Commands::Schema(_) => unreachable!("schema is pre-dispatched in main"),
    }
}
