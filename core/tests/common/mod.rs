//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use workbook_history::{CellData, CellValue, RowData, SheetSnapshot, Snapshot};

/// One row per inner slice, one numeric cell per value.
pub fn rows_from_numbers(values: &[&[i32]]) -> Vec<RowData> {
    values
        .iter()
        .map(|row| {
            RowData::new(
                row.iter()
                    .map(|v| CellData::value(CellValue::Number(*v as f64)))
                    .collect(),
            )
        })
        .collect()
}

/// One row per inner slice, one text cell per value. Empty strings become
/// blank cells.
pub fn rows_from_text(values: &[&[&str]]) -> Vec<RowData> {
    values
        .iter()
        .map(|row| {
            RowData::new(
                row.iter()
                    .map(|v| {
                        if v.is_empty() {
                            CellData::empty()
                        } else {
                            CellData::value(*v)
                        }
                    })
                    .collect(),
            )
        })
        .collect()
}

pub fn row(cells: Vec<CellData>) -> RowData {
    RowData::new(cells)
}

pub fn single_sheet_snapshot(id: &str, name: &str, rows: Vec<RowData>) -> Snapshot {
    Snapshot::new().with_sheet(id, SheetSnapshot::new(name, rows))
}

/// A `rows` x `cols` numeric grid where every cell is unique.
pub fn numbered_grid(rows: u32, cols: u32, base: i64) -> Vec<RowData> {
    (0..rows)
        .map(|r| {
            RowData::new(
                (0..cols)
                    .map(|c| CellData::value((base + r as i64 * 1000 + c as i64) as f64))
                    .collect(),
            )
        })
        .collect()
}
