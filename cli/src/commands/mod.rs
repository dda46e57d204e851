pub mod changeset;
pub mod compare;

use anyhow::{Context, Result};
use std::fs;
use workbook_history::{DiffConfig, Snapshot};

pub fn load_snapshot(path: &str) -> Result<Snapshot> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read snapshot: {}", path))?;
    let snapshot: Snapshot = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse snapshot: {}", path))?;
    Ok(match snapshot.label {
        Some(_) => snapshot,
        None => snapshot.with_label(path),
    })
}

pub fn load_config(path: Option<&str>) -> Result<DiffConfig> {
    let Some(path) = path else {
        return Ok(DiffConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read config: {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse config: {}", path))
}
