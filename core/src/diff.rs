//! Changes and changesets between adjacent snapshots.
//!
//! This module defines the types produced by the differs and consumed by the
//! timeline resolver:
//! - [`Change`]: one atomic edit of a single cell
//! - [`RowChange`]: one added or deleted row
//! - [`StructuralChange`]: a topology edit (rows, columns, sheets)
//! - [`Changeset`]: everything that changed between two adjacent versions
//! - [`DiffError`]: errors that abort a comparison

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::addressing::{CellAddress, CellKey};
use crate::config::ConfigError;
use crate::error_codes;
use crate::snapshot::{CellData, CellValue, RowData, SheetId, render_value};

/// Errors produced by comparison APIs.
///
/// Data-shape anomalies never surface here; they are defaulted and, where
/// useful, reported as warnings on the result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiffError {
    #[error("[{code}] no snapshots supplied; a comparison needs at least one version", code = error_codes::DIFF_EMPTY_VERSION_RANGE)]
    EmptyVersionRange,

    #[error(
        "[{code}] alignment limit exceeded for sheet '{sheet}': {old_len}x{new_len} exceeds lcs_work_limit={limit}. Suggestion: raise `lcs_work_limit` or use `on_limit_exceeded = fallback_to_positional`.",
        code = error_codes::DIFF_LIMITS_EXCEEDED
    )]
    LimitsExceeded {
        sheet: SheetId,
        old_len: usize,
        new_len: usize,
        limit: u64,
    },

    #[error("[{code}] invalid configuration: {0}", code = error_codes::DIFF_INVALID_CONFIG)]
    InvalidConfig(#[from] ConfigError),
}

impl DiffError {
    pub fn code(&self) -> &'static str {
        match self {
            DiffError::EmptyVersionRange => error_codes::DIFF_EMPTY_VERSION_RANGE,
            DiffError::LimitsExceeded { .. } => error_codes::DIFF_LIMITS_EXCEEDED,
            DiffError::InvalidConfig(_) => error_codes::DIFF_INVALID_CONFIG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Value,
    Formula,
    Both,
}

impl ChangeKind {
    /// `None` when neither side changed.
    pub fn from_flags(value_changed: bool, formula_changed: bool) -> Option<ChangeKind> {
        match (value_changed, formula_changed) {
            (true, true) => Some(ChangeKind::Both),
            (true, false) => Some(ChangeKind::Value),
            (false, true) => Some(ChangeKind::Formula),
            (false, false) => None,
        }
    }
}

/// Known annotations attached to a [`Change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAnnotation {
    /// Side effect of a structural change (a formula broken by a deleted
    /// sheet), not a direct edit.
    Consequential,
    /// The cell was empty before this change.
    Creation,
    /// Synthesized by the engine rather than observed in a cell comparison
    /// (cells of a newly added sheet).
    Synthetic,
}

/// One atomic edit of a single cell between two adjacent versions.
///
/// `addr` is always in the destination version's coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub sheet: SheetId,
    pub addr: CellAddress,
    pub kind: ChangeKind,
    pub old_value: Option<CellValue>,
    pub new_value: Option<CellValue>,
    #[serde(default)]
    pub old_formula: String,
    #[serde(default)]
    pub new_formula: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<ChangeAnnotation>,
}

impl Change {
    pub fn between(
        sheet: SheetId,
        addr: CellAddress,
        kind: ChangeKind,
        old: &CellData,
        new: &CellData,
    ) -> Change {
        let mut change = Change {
            sheet,
            addr,
            kind,
            old_value: old.value.clone(),
            new_value: new.value.clone(),
            old_formula: old.formula.clone(),
            new_formula: new.formula.clone(),
            annotations: Vec::new(),
        };
        if old.is_blank() {
            change.annotate(ChangeAnnotation::Creation);
        }
        change
    }

    /// A change that populates a previously empty cell.
    pub fn creation(sheet: SheetId, addr: CellAddress, new: &CellData) -> Change {
        let kind = if new.has_formula() {
            ChangeKind::Both
        } else {
            ChangeKind::Value
        };
        Change::between(sheet, addr, kind, &CellData::empty(), new)
    }

    pub fn key(&self) -> CellKey {
        CellKey::new(self.sheet.clone(), self.addr)
    }

    pub fn annotate(&mut self, annotation: ChangeAnnotation) {
        if !self.annotations.contains(&annotation) {
            self.annotations.push(annotation);
            self.annotations.sort();
        }
    }

    pub fn has(&self, annotation: ChangeAnnotation) -> bool {
        self.annotations.contains(&annotation)
    }

    /// A value-only change riding on an unchanged, pre-existing formula.
    pub fn is_recalculation(&self) -> bool {
        self.kind == ChangeKind::Value
            && !self.old_formula.is_empty()
            && self.old_formula == self.new_formula
    }

    pub fn old_value_text(&self) -> String {
        render_value(self.old_value.as_ref())
    }

    pub fn new_value_text(&self) -> String {
        render_value(self.new_value.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowChangeKind {
    Added,
    Deleted,
}

/// An added or deleted row.
///
/// For additions `row_idx` is absolute in the destination version; for
/// deletions it is absolute in the source version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowChange {
    pub kind: RowChangeKind,
    pub sheet: SheetId,
    pub row_idx: u32,
    pub row: RowData,
    /// Edits the row suffered earlier in the compared range, before it was
    /// deleted. Filled in by the timeline resolver; always empty for additions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contained_changes: Vec<Change>,
}

impl RowChange {
    pub fn added(sheet: SheetId, row_idx: u32, row: RowData) -> RowChange {
        RowChange {
            kind: RowChangeKind::Added,
            sheet,
            row_idx,
            row,
            contained_changes: Vec::new(),
        }
    }

    pub fn deleted(sheet: SheetId, row_idx: u32, row: RowData) -> RowChange {
        RowChange {
            kind: RowChangeKind::Deleted,
            sheet,
            row_idx,
            row,
            contained_changes: Vec::new(),
        }
    }
}

/// A topology edit. Row/column variants describe one contiguous block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuralChange {
    RowInsertion {
        sheet: SheetId,
        index: u32,
        count: u32,
    },
    RowDeletion {
        sheet: SheetId,
        index: u32,
        count: u32,
    },
    ColumnInsertion {
        sheet: SheetId,
        index: u32,
        count: u32,
    },
    ColumnDeletion {
        sheet: SheetId,
        index: u32,
        count: u32,
    },
    SheetRename {
        sheet: SheetId,
        old_name: String,
        new_name: String,
    },
    SheetAddition {
        sheet: SheetId,
        name: String,
    },
    SheetDeletion {
        sheet: SheetId,
        name: String,
    },
}

impl StructuralChange {
    pub fn sheet(&self) -> &SheetId {
        match self {
            StructuralChange::RowInsertion { sheet, .. }
            | StructuralChange::RowDeletion { sheet, .. }
            | StructuralChange::ColumnInsertion { sheet, .. }
            | StructuralChange::ColumnDeletion { sheet, .. }
            | StructuralChange::SheetRename { sheet, .. }
            | StructuralChange::SheetAddition { sheet, .. }
            | StructuralChange::SheetDeletion { sheet, .. } => sheet,
        }
    }

    pub fn is_sheet_level(&self) -> bool {
        matches!(
            self,
            StructuralChange::SheetRename { .. }
                | StructuralChange::SheetAddition { .. }
                | StructuralChange::SheetDeletion { .. }
        )
    }
}

/// The full diff between two adjacent versions. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Changeset {
    pub modified_cells: Vec<Change>,
    pub added_rows: Vec<RowChange>,
    pub deleted_rows: Vec<RowChange>,
    /// Ordered so that applying it front to back maps source coordinates to
    /// destination coordinates.
    pub structural_changes: Vec<StructuralChange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.modified_cells.is_empty()
            && self.added_rows.is_empty()
            && self.deleted_rows.is_empty()
            && self.structural_changes.is_empty()
    }

    /// Appends another changeset's contents, preserving order.
    pub fn extend(&mut self, other: Changeset) {
        self.modified_cells.extend(other.modified_cells);
        self.added_rows.extend(other.added_rows);
        self.deleted_rows.extend(other.deleted_rows);
        self.structural_changes.extend(other.structural_changes);
        self.warnings.extend(other.warnings);
    }

    /// Sheets this changeset deletes.
    pub fn deleted_sheets(&self) -> impl Iterator<Item = (&SheetId, &str)> {
        self.structural_changes.iter().filter_map(|c| match c {
            StructuralChange::SheetDeletion { sheet, name } => Some((sheet, name.as_str())),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(s: &str) -> SheetId {
        SheetId::new(s)
    }

    #[test]
    fn change_between_blank_cell_is_creation() {
        let change = Change::between(
            sid("s1"),
            CellAddress::from_indices(0, 0),
            ChangeKind::Value,
            &CellData::empty(),
            &CellData::value(3.0),
        );
        assert!(change.has(ChangeAnnotation::Creation));
    }

    #[test]
    fn recalculation_requires_unchanged_formula() {
        let mut change = Change::between(
            sid("s1"),
            CellAddress::from_indices(0, 0),
            ChangeKind::Value,
            &CellData::formula("=A2", 1.0),
            &CellData::formula("=A2", 2.0),
        );
        assert!(change.is_recalculation());
        change.new_formula = "=A3".into();
        assert!(!change.is_recalculation());
    }

    #[test]
    fn annotations_are_deduplicated_and_sorted() {
        let mut change = Change::creation(
            sid("s1"),
            CellAddress::from_indices(1, 1),
            &CellData::value("x"),
        );
        change.annotate(ChangeAnnotation::Synthetic);
        change.annotate(ChangeAnnotation::Creation);
        assert_eq!(
            change.annotations,
            vec![ChangeAnnotation::Creation, ChangeAnnotation::Synthetic]
        );
    }

    #[test]
    fn structural_change_serializes_with_type_tag() {
        let change = StructuralChange::RowInsertion {
            sheet: sid("s1"),
            index: 2,
            count: 1,
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["type"], "row_insertion");
        assert_eq!(json["sheet"], "s1");
        assert_eq!(json["count"], 1);
    }

    #[test]
    fn kind_from_flags() {
        assert_eq!(ChangeKind::from_flags(true, true), Some(ChangeKind::Both));
        assert_eq!(ChangeKind::from_flags(false, true), Some(ChangeKind::Formula));
        assert_eq!(ChangeKind::from_flags(false, false), None);
    }
}
