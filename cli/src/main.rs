mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "workbook-history")]
#[command(about = "Compare a range of workbook snapshots and summarize what changed")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    #[arg(long, short, global = true, help = "Verbose mode: show per-cell history and debug logs")]
    pub verbose: bool,
    #[arg(long, short, global = true, help = "Quiet mode: only show summary, silence logs")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Compare an ordered range of snapshot JSON files")]
    Compare {
        #[arg(required = true, value_name = "SNAPSHOT.json", help = "Snapshots, oldest first")]
        snapshots: Vec<String>,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[arg(long = "filter", value_name = "ID", help = "Enable a semantic filter (repeatable)")]
        filters: Vec<String>,
        #[arg(
            long,
            value_name = "F",
            help = "Fraction of shifted rows needed to infer a column change"
        )]
        column_threshold: Option<f64>,
        #[arg(long, value_name = "N", help = "Report at most N combined cell changes")]
        max_cells: Option<usize>,
        #[arg(long, value_name = "FILE", help = "Load DiffConfig from a JSON file")]
        config: Option<String>,
    },
    #[command(about = "Print the raw changeset between two adjacent snapshots as JSON")]
    Changeset {
        #[arg(help = "Path to the older snapshot")]
        old: String,
        #[arg(help = "Path to the newer snapshot")]
        new: String,
        #[arg(long, value_name = "FILE", help = "Load DiffConfig from a JSON file")]
        config: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else if cli.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };
    init_tracing(verbosity);

    let result = match cli.command {
        Commands::Compare {
            snapshots,
            format,
            filters,
            column_threshold,
            max_cells,
            config,
        } => commands::compare::run(commands::compare::CompareArgs {
            snapshot_paths: snapshots,
            format,
            filters,
            column_threshold,
            max_cells,
            config_path: config,
            verbosity,
        }),
        Commands::Changeset { old, new, config } => {
            commands::changeset::run(&old, &new, config.as_deref())
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Logs go to stderr so that stdout stays machine-readable. `RUST_LOG`
/// overrides the level implied by `-v`/`-q`.
fn init_tracing(verbosity: Verbosity) {
    let default_level = match verbosity {
        Verbosity::Quiet => "off",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
