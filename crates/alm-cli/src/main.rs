use std::path::PathBuf;
use std::process::ExitCode;

use alm_config::PROJECT_DIR;
use anyhow::Context;
use clap::Parser;

mod cli;
mod commands;
mod context;
mod output;
mod ui;
mod write_lock;

use commands::Outcome;

fn main() -> ExitCode {
    match run() {
        Ok(outcome) => ExitCode::from(outcome.code()),
        Err(error) => {
            eprintln!("alm error: {error:#}");
            ExitCode::from(1)
        }
    }
}

fn run() -> anyhow::Result<Outcome> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init();

    if let cli::Commands::Schema(args) = &cli.command {
        return commands::schema::handle(args, &flags);
    }

    let project_root = resolve_project_root(flags.project.as_deref())?;
    context::warn_misnamed_env();

    let command = cli.command;
    let write_lock = if command_requires_write_lock(&command) {
        Some(write_lock::acquire_for_project(&project_root)?)
    } else {
        None
    };

    let ctx = context::AppContext::init(&project_root)
        .context("failed to initialize almanac application context")?;

    let result = commands::dispatch::dispatch(command, &ctx, &flags);
    drop(write_lock);
    result
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("ALMANAC_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// `--project`, else the nearest ancestor holding `.almanac`, else the
/// current directory.
fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);

        if explicit
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == PROJECT_DIR)
        {
            return explicit
                .parent()
                .map(std::path::Path::to_path_buf)
                .context("invalid --project path: '.almanac' directory has no parent");
        }

        if explicit.is_dir() {
            return Ok(explicit);
        }

        anyhow::bail!(
            "invalid --project '{}': directory does not exist",
            explicit.display()
        );
    }

    let start = std::env::current_dir().context("failed to read current directory")?;
    Ok(context::find_project_root(&start).unwrap_or(start))
}

fn command_requires_write_lock(command: &cli::Commands) -> bool {
    match command {
        cli::Commands::Reconcile(args) => args.apply,
        cli::Commands::Patch(args) => !args.dry_run,
        cli::Commands::Dedupe(args) => !args.dry_run,
        cli::Commands::Merge(_) => true,
        cli::Commands::Audit(_) | cli::Commands::Duplicates | cli::Commands::Schema(_) => false,
    }
}
