use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `alm` binary.
#[derive(Debug, Parser)]
#[command(
    name = "alm",
    version,
    about = "Almanac - integrity auditor for college and exam datasets"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only on stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to auto-detect via .almanac)
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_and_after_subcommand() {
        let before = Cli::try_parse_from(["alm", "--format", "table", "--verbose", "audit"])
            .expect("cli should parse");
        assert_eq!(before.format, OutputFormat::Table);
        assert!(before.verbose);

        let after = Cli::try_parse_from(["alm", "duplicates", "--format", "raw", "--quiet"])
            .expect("cli should parse");
        assert_eq!(after.format, OutputFormat::Raw);
        assert!(after.quiet);
        assert!(matches!(after.command, Commands::Duplicates));
    }

    #[test]
    fn audit_flags_parse() {
        let cli = Cli::try_parse_from([
            "alm",
            "audit",
            "--out",
            "report.json",
            "--fail-on-issues",
        ])
        .expect("cli should parse");

        let Commands::Audit(args) = cli.command else {
            panic!("expected audit");
        };
        assert_eq!(args.out.as_deref(), Some(Path::new("report.json")));
        assert!(args.fail_on_issues);
    }

    #[test]
    fn reconcile_requires_a_report() {
        assert!(Cli::try_parse_from(["alm", "reconcile", "--apply"]).is_err());

        let cli = Cli::try_parse_from([
            "alm",
            "reconcile",
            "--report",
            "r.json",
            "--emit-patch",
            "fix.json",
        ])
        .expect("cli should parse");
        let Commands::Reconcile(args) = cli.command else {
            panic!("expected reconcile");
        };
        assert!(!args.apply);
        assert_eq!(args.emit_patch.as_deref(), Some(Path::new("fix.json")));
    }

    #[test]
    fn merge_requires_both_collections() {
        assert!(Cli::try_parse_from(["alm", "merge", "--from", "a"]).is_err());

        let cli = Cli::try_parse_from([
            "alm",
            "merge",
            "--from",
            "gujarat-old",
            "--into",
            "gujarat",
            "--remove-source",
        ])
        .expect("cli should parse");
        let Commands::Merge(args) = cli.command else {
            panic!("expected merge");
        };
        assert_eq!(args.from, "gujarat-old");
        assert_eq!(args.into, "gujarat");
        assert!(args.remove_source);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["alm", "--format", "xml", "audit"]).is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["alm", "--project", "/tmp/demo", "patch", "p.json"])
            .expect("cli should parse");
        let flags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
        assert_eq!(flags.format, OutputFormat::Json);
    }
}
