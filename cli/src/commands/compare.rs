use crate::output::{json, text};
use crate::{OutputFormat, Verbosity};
use anyhow::{Context, Result};
use std::io;
use std::process::ExitCode;
use workbook_history::policy::apply_cell_limit;
use workbook_history::{DiffConfig, DiffReport, SemanticFilter, Snapshot, compare_versions};

use super::{load_config, load_snapshot};

pub struct CompareArgs {
    pub snapshot_paths: Vec<String>,
    pub format: OutputFormat,
    pub filters: Vec<String>,
    pub column_threshold: Option<f64>,
    pub max_cells: Option<usize>,
    pub config_path: Option<String>,
    pub verbosity: Verbosity,
}

pub fn run(args: CompareArgs) -> Result<ExitCode> {
    let config = build_config(&args)?;

    let snapshots = args
        .snapshot_paths
        .iter()
        .map(|path| load_snapshot(path))
        .collect::<Result<Vec<Snapshot>>>()?;
    tracing::debug!("loaded {} snapshots", snapshots.len());

    let mut report = compare_versions(&snapshots, &config).context("Comparison failed")?;
    if let Some(limit) = args.max_cells {
        apply_cell_limit(&mut report, limit);
    }

    print_warnings_to_stderr(&report);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match args.format {
        OutputFormat::Text => text::write_text_report(&mut handle, &report, args.verbosity)?,
        OutputFormat::Json => json::write_json_report(&mut handle, &report)?,
    }

    Ok(exit_code_from_report(&report))
}

/// Config file first, then flags on top.
fn build_config(args: &CompareArgs) -> Result<DiffConfig> {
    let mut config = load_config(args.config_path.as_deref())?;

    for id in &args.filters {
        let filter: SemanticFilter = id
            .parse()
            .with_context(|| format!("Invalid --filter value: {}", id))?;
        config.filters.insert(filter);
    }
    if let Some(threshold) = args.column_threshold {
        config.column_vote_threshold = threshold;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn print_warnings_to_stderr(report: &DiffReport) {
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }
}

fn exit_code_from_report(report: &DiffReport) -> ExitCode {
    if !report.has_changes() && report.complete {
        ExitCode::from(0)
    } else {
        ExitCode::from(1)
    }
}
