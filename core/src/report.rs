//! Consolidation of a resolved timeline into the user-facing report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::addressing::{CellAddress, CellKey};
use crate::diff::{Change, ChangeAnnotation, ChangeKind, RowChange, RowChangeKind, StructuralChange};
use crate::snapshot::{CellValue, SheetId, Snapshot, render_value};
use crate::timeline::ResolvedTimeline;

/// The net effect on one cell across the compared range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedChange {
    pub sheet: SheetId,
    pub sheet_name: String,
    pub address: CellAddress,
    pub kind: ChangeKind,
    pub start_value: Option<CellValue>,
    pub end_value: Option<CellValue>,
    #[serde(default)]
    pub start_formula: String,
    #[serde(default)]
    pub end_formula: String,
    pub is_creation: bool,
    /// The individual steps, oldest first, recalculations excluded.
    pub history: Vec<Change>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<ChangeAnnotation>,
}

impl CombinedChange {
    pub fn start_value_text(&self) -> String {
        render_value(self.start_value.as_ref())
    }

    pub fn end_value_text(&self) -> String {
        render_value(self.end_value.as_ref())
    }

    pub fn has(&self, annotation: ChangeAnnotation) -> bool {
        self.annotations.contains(&annotation)
    }
}

/// A row event with its sheet's display name resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowBlock {
    pub sheet_name: String,
    #[serde(flatten)]
    pub row: RowChange,
}

/// A structural change with its sheet's display name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedStructuralChange {
    pub sheet_name: String,
    #[serde(flatten)]
    pub change: StructuralChange,
}

/// The result of comparing a range of versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Schema version (currently "1").
    pub version: String,
    pub combined_changes: Vec<CombinedChange>,
    pub added_rows: Vec<RowBlock>,
    pub deleted_rows: Vec<RowBlock>,
    pub structural_changes: Vec<NamedStructuralChange>,
    /// `false` when some sheet was compared in a degraded mode; see `warnings`.
    #[serde(default = "default_complete")]
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Set by [`crate::policy::apply_cell_limit`] when combined changes were
    /// withheld. The engine itself never truncates.
    #[serde(default)]
    pub partial: bool,
    #[serde(default)]
    pub hidden_count: usize,
}

fn default_complete() -> bool {
    true
}

impl Default for DiffReport {
    fn default() -> Self {
        DiffReport::empty()
    }
}

impl DiffReport {
    pub const SCHEMA_VERSION: &'static str = "1";

    pub fn empty() -> DiffReport {
        DiffReport {
            version: Self::SCHEMA_VERSION.to_string(),
            combined_changes: Vec::new(),
            added_rows: Vec::new(),
            deleted_rows: Vec::new(),
            structural_changes: Vec::new(),
            complete: true,
            warnings: Vec::new(),
            partial: false,
            hidden_count: 0,
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.combined_changes.is_empty()
            || !self.added_rows.is_empty()
            || !self.deleted_rows.is_empty()
            || !self.structural_changes.is_empty()
            || self.hidden_count > 0
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
        self.complete = false;
    }
}

/// Display names keyed by persistent sheet id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetNames(BTreeMap<SheetId, String>);

impl SheetNames {
    /// Scans `snapshots` in order; the last name observed for an id wins.
    pub fn from_snapshots(snapshots: &[Snapshot]) -> SheetNames {
        let mut names = BTreeMap::new();
        for snapshot in snapshots {
            for (id, sheet) in &snapshot.sheets {
                names.insert(id.clone(), sheet.name.clone());
            }
        }
        SheetNames(names)
    }

    pub fn insert(&mut self, id: SheetId, name: impl Into<String>) {
        self.0.insert(id, name.into());
    }

    /// Falls back to the id itself for sheets never observed.
    pub fn resolve<'a>(&'a self, id: &'a SheetId) -> &'a str {
        self.0.get(id).map(String::as_str).unwrap_or(id.as_str())
    }
}

/// Collapses every lineage of `timeline` into a [`CombinedChange`] and
/// resolves display names for row and structural events.
pub fn consolidate(timeline: &ResolvedTimeline, names: &SheetNames) -> DiffReport {
    let mut combined_changes: Vec<CombinedChange> = timeline
        .lineages
        .iter()
        .filter_map(|(key, history)| combine(key, history, names))
        .collect();
    combined_changes.sort_by(|a, b| {
        a.sheet_name
            .cmp(&b.sheet_name)
            .then(a.address.row.cmp(&b.address.row))
            .then(a.address.col.cmp(&b.address.col))
            .then_with(|| a.sheet.cmp(&b.sheet))
    });

    let block = |row: &RowChange| RowBlock {
        sheet_name: names.resolve(&row.sheet).to_string(),
        row: row.clone(),
    };

    let mut report = DiffReport {
        combined_changes,
        added_rows: timeline
            .row_events
            .iter()
            .filter(|r| r.kind == RowChangeKind::Added)
            .map(block)
            .collect(),
        deleted_rows: timeline
            .row_events
            .iter()
            .filter(|r| r.kind == RowChangeKind::Deleted)
            .map(block)
            .collect(),
        structural_changes: timeline
            .structural_changes
            .iter()
            .map(|change| NamedStructuralChange {
                sheet_name: names.resolve(change.sheet()).to_string(),
                change: change.clone(),
            })
            .collect(),
        ..DiffReport::empty()
    };

    for warning in &timeline.warnings {
        report.add_warning(warning.clone());
    }
    report
}

fn combine(key: &CellKey, history: &[Change], names: &SheetNames) -> Option<CombinedChange> {
    let steps: Vec<Change> = history
        .iter()
        .filter(|c| !c.is_recalculation())
        .cloned()
        .collect();
    let first = steps.first()?;
    let last = steps.last()?;

    let start_value = first.old_value.clone();
    let start_formula = first.old_formula.clone();
    let end_value = last.new_value.clone();
    let end_formula = last.new_formula.clone();

    let value_changed = render_value(start_value.as_ref()) != render_value(end_value.as_ref());
    let formula_changed = start_formula != end_formula;
    let kind = ChangeKind::from_flags(value_changed, formula_changed).unwrap_or(ChangeKind::Value);
    let is_creation = render_value(start_value.as_ref()).is_empty() && start_formula.is_empty();

    let mut annotations: Vec<ChangeAnnotation> = steps
        .iter()
        .flat_map(|c| c.annotations.iter().copied())
        .collect();
    annotations.sort();
    annotations.dedup();

    Some(CombinedChange {
        sheet: key.sheet.clone(),
        sheet_name: names.resolve(&key.sheet).to_string(),
        address: key.addr,
        kind,
        start_value,
        end_value,
        start_formula,
        end_formula,
        is_creation,
        history: steps,
        annotations,
    })
}
