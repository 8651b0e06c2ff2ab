use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Audit every configured collection and report integrity issues.
    Audit(AuditArgs),
    /// Propose fixes for the dangling references of an audit report.
    Reconcile(ReconcileArgs),
    /// Merge a patch set into matching records.
    Patch(PatchArgs),
    /// Remove same-id duplicates, keeping the first occurrence.
    Dedupe(DedupeArgs),
    /// Append one collection's records to another of the same kind.
    Merge(MergeArgs),
    /// List records with different ids that look like the same entity.
    Duplicates,
    /// Dump JSON schema for a registered document type.
    Schema(SchemaArgs),
}

/// Arguments for `alm audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// Also write the JSON report to this file.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Exit with status 2 when any issue is found.
    #[arg(long)]
    pub fail_on_issues: bool,
}

/// Arguments for `alm reconcile`.
#[derive(Clone, Debug, Args)]
pub struct ReconcileArgs {
    /// Audit report produced by `alm audit --out`.
    #[arg(long)]
    pub report: PathBuf,
    /// Apply resolved proposals without review.
    #[arg(long)]
    pub apply: bool,
    /// Write resolved proposals as a patch set for `alm patch`.
    #[arg(long)]
    pub emit_patch: Option<PathBuf>,
}

/// Arguments for `alm patch`.
#[derive(Clone, Debug, Args)]
pub struct PatchArgs {
    /// Patch set file: `{ "<record id>": { ...fields } }`.
    pub file: PathBuf,
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `alm dedupe`.
#[derive(Clone, Debug, Args)]
pub struct DedupeArgs {
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `alm merge`.
#[derive(Clone, Debug, Args)]
pub struct MergeArgs {
    /// Collection whose records are appended.
    #[arg(long)]
    pub from: String,
    /// Collection receiving the records.
    #[arg(long)]
    pub into: String,
    /// Delete the source file once the target was written.
    #[arg(long)]
    pub remove_source: bool,
}

/// Arguments for `alm schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Registered schema name (e.g. `audit_report`, `patch_set`).
    pub name: String,
}
