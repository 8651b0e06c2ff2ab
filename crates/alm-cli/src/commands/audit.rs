use alm_audit::audit;
use alm_audit::report::render_text;
use alm_store::writer::write_atomic;
use anyhow::Context;

use crate::cli::root_commands::AuditArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::Outcome;
use crate::context::AppContext;
use crate::output::output;

/// Handle `alm audit`.
pub fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<Outcome> {
    let snapshot = ctx.load_snapshot();
    let report = audit(&snapshot, &ctx.audit_options());

    if let Some(path) = &args.out {
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        write_atomic(path, &json)
            .with_context(|| format!("failed to write audit report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote audit report");
    }

    match flags.format {
        OutputFormat::Table => print!("{}", render_text(&report)),
        format => output(&report, format)?,
    }

    Ok(if report.has_tooling_failures() {
        Outcome::ToolingFailures
    } else if args.fail_on_issues && !report.issues.is_empty() {
        Outcome::IssuesFound
    } else {
        Outcome::Success
    })
}
