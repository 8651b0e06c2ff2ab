use alm_schema::SchemaRegistry;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::commands::Outcome;
use crate::output::output;

/// Handle `alm schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<Outcome> {
    let registry = SchemaRegistry::new();
    let Some(schema) = registry.get(&args.name) else {
        anyhow::bail!(
            "unknown schema '{}' (available: {})",
            args.name,
            registry.list().join(", ")
        );
    };
    output(schema, flags.format)?;
    Ok(Outcome::Success)
}
