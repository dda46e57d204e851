//! Projection of cell addresses through ordered structural edits.

use std::str::FromStr;

use crate::addressing::CellKey;
use crate::diff::StructuralChange;

/// Projects `cell` through `changes`, in order.
///
/// Each change acts on the coordinates produced by the ones before it. Returns
/// `None` as soon as a row or column deletion covers the cell. Sheet-level
/// changes leave the key untouched: sheet identity is the persistent id, and
/// only display names change.
pub fn transform(cell: &CellKey, changes: &[StructuralChange]) -> Option<CellKey> {
    let mut row = cell.addr.row;
    let mut col = cell.addr.col;

    for change in changes {
        if change.sheet() != &cell.sheet {
            continue;
        }
        match *change {
            StructuralChange::RowInsertion { index, count, .. } => {
                row = shift_for_insertion(row, index, count);
            }
            StructuralChange::RowDeletion { index, count, .. } => {
                row = shift_for_deletion(row, index, count)?;
            }
            StructuralChange::ColumnInsertion { index, count, .. } => {
                col = shift_for_insertion(col, index, count);
            }
            StructuralChange::ColumnDeletion { index, count, .. } => {
                col = shift_for_deletion(col, index, count)?;
            }
            StructuralChange::SheetRename { .. }
            | StructuralChange::SheetAddition { .. }
            | StructuralChange::SheetDeletion { .. } => {}
        }
    }

    let mut out = cell.clone();
    out.addr.row = row;
    out.addr.col = col;
    Some(out)
}

/// String form of [`transform`] over `sheetId!A1` addresses.
///
/// An address that does not parse is returned unchanged: downstream consumers
/// tolerate best-effort coordinates better than a failed comparison.
pub fn transform_address(address: &str, changes: &[StructuralChange]) -> Option<String> {
    match CellKey::from_str(address) {
        Ok(key) => transform(&key, changes).map(|k| k.to_string()),
        Err(e) => {
            tracing::debug!("leaving malformed address untouched: {e}");
            Some(address.to_string())
        }
    }
}

fn shift_for_insertion(pos: u32, index: u32, count: u32) -> u32 {
    if index <= pos {
        pos.saturating_add(count)
    } else {
        pos
    }
}

fn shift_for_deletion(pos: u32, index: u32, count: u32) -> Option<u32> {
    if pos >= index && pos - index < count {
        return None;
    }
    if index < pos {
        Some(pos - count)
    } else {
        Some(pos)
    }
}
