use crate::output::json;
use anyhow::{Context, Result};
use std::io;
use std::process::ExitCode;
use workbook_history::diff_snapshots;

use super::{load_config, load_snapshot};

pub fn run(old_path: &str, new_path: &str, config_path: Option<&str>) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    config.validate().context("Invalid configuration")?;

    let old = load_snapshot(old_path)?;
    let new = load_snapshot(new_path)?;

    let changeset = diff_snapshots(&old, &new, &config)
        .with_context(|| format!("Failed to diff {} against {}", old_path, new_path))?;

    for warning in &changeset.warnings {
        eprintln!("Warning: {}", warning);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    json::write_json_changeset(&mut handle, &changeset)?;

    if changeset.is_empty() && changeset.warnings.is_empty() {
        Ok(ExitCode::from(0))
    } else {
        Ok(ExitCode::from(1))
    }
}
