use crate::addressing::CellAddress;
use crate::config::DiffConfig;
use crate::diff::{Change, ChangeAnnotation, ChangeKind};
use crate::snapshot::{CellData, SheetId};

use super::consequential::is_consequential;

/// Per-comparison state threaded through the sheet differs.
#[derive(Debug, Default)]
pub(super) struct DiffContext {
    pub(super) warnings: Vec<String>,
}

/// Everything a sheet differ needs to turn a cell pair into a [`Change`].
///
/// Row and column indices handed to it are relative to the common origin of
/// the two compared sheets; `origin_row`/`origin_col` convert them back to
/// absolute sheet coordinates.
pub(super) struct EmitCtx<'a> {
    pub(super) sheet: &'a SheetId,
    pub(super) config: &'a DiffConfig,
    pub(super) deleted_sheets: &'a [String],
    pub(super) origin_row: u32,
    pub(super) origin_col: u32,
}

impl<'a> EmitCtx<'a> {
    pub(super) fn addr(&self, row_idx: usize, col_idx: usize) -> CellAddress {
        CellAddress::from_indices(
            self.origin_row + row_idx as u32,
            self.origin_col + col_idx as u32,
        )
    }

    /// Compares one cell pair through the active semantic filters.
    pub(super) fn compare_cells(
        &self,
        old: &CellData,
        new: &CellData,
        addr: CellAddress,
    ) -> Option<Change> {
        let filters = &self.config.filters;
        let kind = ChangeKind::from_flags(
            !filters.values_equal(old, new),
            !filters.formulas_equal(old, new),
        )?;

        let mut change = Change::between(self.sheet.clone(), addr, kind, old, new);
        if is_consequential(old, new, self.deleted_sheets) {
            change.annotate(ChangeAnnotation::Consequential);
        }
        Some(change)
    }

    /// Compares the given (old index, new index) cell pairs of one row. Cells
    /// past either row's end compare as empty. Changes land on the new index.
    pub(super) fn compare_row(
        &self,
        old: &[CellData],
        new: &[CellData],
        new_row_idx: usize,
        pairs: &[(usize, usize)],
    ) -> Vec<Change> {
        let empty = CellData::empty();
        pairs
            .iter()
            .filter_map(|&(old_col, new_col)| {
                let old_cell = old.get(old_col).unwrap_or(&empty);
                let new_cell = new.get(new_col).unwrap_or(&empty);
                self.compare_cells(old_cell, new_cell, self.addr(new_row_idx, new_col))
            })
            .collect()
    }
}
