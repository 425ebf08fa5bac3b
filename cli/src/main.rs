use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;
use rockup_sync::{RunMode, SyncConfig, SyncOutcome, Syncer};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Examples:
  rockup-sync           # Dry-run mode (safe)
  rockup-sync --commit  # Apply changes";

#[derive(Debug, Parser)]
#[command(name = "rockup-sync", version)]
#[command(about = "Sync rockspec changes from the HEAD commit into rocks.db and publish the manifest")]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Actually apply changes (default is dry-run mode).
    #[arg(long)]
    commit: bool,
    /// YAML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Log at debug level unless RUST_LOG is set.
    #[arg(long, short)]
    verbose: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("error: Script execution failed: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => SyncConfig::load(path).map_err(|err| err.to_string())?,
        None => SyncConfig::default(),
    };
    let workdir = std::env::current_dir()
        .map_err(|err| format!("failed to resolve working directory: {err}"))?;
    debug!(?config, workdir = %workdir.display(), "loaded configuration");

    let mode = if cli.commit {
        RunMode::Commit
    } else {
        RunMode::DryRun
    };
    let runner = config.tools.runner();
    let outcome = Syncer::new(&runner, &config, &workdir)
        .run(mode, &mut std::io::stdout().lock())
        .map_err(|err| err.to_string())?;

    match outcome {
        SyncOutcome::NoChanges => {}
        SyncOutcome::DryRun(changes) => {
            info!(changes = changes.len(), "[DRY RUN] Dry-run completed successfully");
        }
        SyncOutcome::Applied(report) => {
            info!(
                removed = report.removed,
                upserted = report.upserted,
                pushed = report.pushed,
                "sync completed"
            );
        }
    }
    Ok(())
}
