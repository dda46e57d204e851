use std::borrow::Cow;

use crate::column_alignment::{ShiftKind, cell_shift_spans, positional_pairs, shifted_pairs};
use crate::config::{DiffConfig, LimitBehavior};
use crate::diff::{Change, Changeset, DiffError, RowChange, StructuralChange};
use crate::hashing::{RowHash, hash_row};
use crate::row_alignment::{RowAlignment, align_rows, align_rows_positional, coalesce_runs};
use crate::snapshot::{CellData, RowData, SheetId, SheetSnapshot};

use super::column_inference::{PairedRow, infer_column_shift};
use super::context::{DiffContext, EmitCtx};

/// Content diff of one sheet present in both versions.
///
/// Both grids are first placed on a common origin (the smaller of the two
/// anchors), so a used range that grew upward or leftward compares cell for
/// cell against the same absolute positions.
pub(super) fn diff_sheet(
    sheet_id: &SheetId,
    old: &SheetSnapshot,
    new: &SheetSnapshot,
    config: &DiffConfig,
    deleted_sheets: &[String],
    ctx: &mut DiffContext,
) -> Result<Changeset, DiffError> {
    let origin_row = old.anchor_row.min(new.anchor_row);
    let origin_col = old.anchor_col.min(new.anchor_col);
    let old_rows = normalized_rows(old, origin_row, origin_col);
    let new_rows = normalized_rows(new, origin_row, origin_col);

    let old_hashes: Vec<RowHash> = old_rows.iter().map(|r| hash_row(&r.cells)).collect();
    let new_hashes: Vec<RowHash> = new_rows.iter().map(|r| hash_row(&r.cells)).collect();

    if old_hashes == new_hashes {
        return Ok(Changeset::default());
    }

    let alignment = align_or_fallback(sheet_id, &old_hashes, &new_hashes, config, ctx)?;
    tracing::debug!(
        "sheet {sheet_id}: {} matched, {} paired, {} inserted, {} deleted rows",
        alignment.matched.len(),
        alignment.paired.len(),
        alignment.inserted.len(),
        alignment.deleted.len()
    );

    let emit = EmitCtx {
        sheet: sheet_id,
        config,
        deleted_sheets,
        origin_row,
        origin_col,
    };

    let paired = collect_paired_rows(&emit, &alignment, &old_rows, &new_rows);
    let column_shift = infer_column_shift(&paired, config.column_vote_threshold);

    let mut out = Changeset::default();

    for row in paired {
        match column_shift.filter(|span| row.votes_for(*span)) {
            Some(span) => {
                let old_cells = &old_rows[row.old_idx].cells;
                let new_cells = &new_rows[row.new_idx].cells;
                let pairs = shifted_pairs(span, old_cells.len(), new_cells.len());
                out.modified_cells
                    .extend(emit.compare_row(old_cells, new_cells, row.new_idx, &pairs));
            }
            None => out.modified_cells.extend(row.buffered),
        }
    }

    for &idx in &alignment.deleted {
        let row = old_rows[idx as usize].clone();
        out.deleted_rows
            .push(RowChange::deleted(sheet_id.clone(), origin_row + idx, row));
    }

    for &idx in &alignment.inserted {
        let row = &new_rows[idx as usize];
        if config.emit_row_creations {
            out.modified_cells
                .extend(row_creations(&emit, idx as usize, &row.cells));
        }
        out.added_rows
            .push(RowChange::added(sheet_id.clone(), origin_row + idx, row.clone()));
    }

    // Source-coordinate deletions bottom-up, then destination-coordinate
    // insertions top-down, then columns.
    for (start, count) in coalesce_runs(&alignment.deleted).into_iter().rev() {
        out.structural_changes.push(StructuralChange::RowDeletion {
            sheet: sheet_id.clone(),
            index: origin_row + start,
            count,
        });
    }
    for (start, count) in coalesce_runs(&alignment.inserted) {
        out.structural_changes.push(StructuralChange::RowInsertion {
            sheet: sheet_id.clone(),
            index: origin_row + start,
            count,
        });
    }
    if let Some(span) = column_shift {
        let sheet = sheet_id.clone();
        let index = origin_col + span.index;
        let count = span.count;
        out.structural_changes.push(match span.kind {
            ShiftKind::Add => StructuralChange::ColumnInsertion {
                sheet,
                index,
                count,
            },
            ShiftKind::Delete => StructuralChange::ColumnDeletion {
                sheet,
                index,
                count,
            },
        });
    }

    Ok(out)
}

fn align_or_fallback(
    sheet_id: &SheetId,
    old: &[RowHash],
    new: &[RowHash],
    config: &DiffConfig,
    ctx: &mut DiffContext,
) -> Result<RowAlignment, DiffError> {
    if let Some(alignment) = align_rows(old, new, config.lcs_work_limit) {
        return Ok(alignment);
    }

    match config.on_limit_exceeded {
        LimitBehavior::ReturnError => Err(DiffError::LimitsExceeded {
            sheet: sheet_id.clone(),
            old_len: old.len(),
            new_len: new.len(),
            limit: config.lcs_work_limit,
        }),
        LimitBehavior::FallbackToPositional => {
            let warning = format!(
                "Sheet '{}': row alignment limit exceeded ({}x{} rows, lcs_work_limit={}); rows were paired by position",
                sheet_id,
                old.len(),
                new.len(),
                config.lcs_work_limit
            );
            tracing::warn!("{warning}");
            ctx.warnings.push(warning);
            Ok(align_rows_positional(old, new))
        }
    }
}

fn collect_paired_rows(
    emit: &EmitCtx<'_>,
    alignment: &RowAlignment,
    old_rows: &[RowData],
    new_rows: &[RowData],
) -> Vec<PairedRow> {
    alignment
        .paired
        .iter()
        .map(|&(a, b)| {
            let (old_idx, new_idx) = (a as usize, b as usize);
            let old_row = &old_rows[old_idx];
            let new_row = &new_rows[new_idx];

            // A row that is empty on either side carries no shift evidence.
            let spans = if old_row.is_blank() || new_row.is_blank() {
                Vec::new()
            } else {
                cell_shift_spans(&old_row.cells, &new_row.cells, emit.config.lcs_work_limit)
            };
            let pairs = positional_pairs(old_row.cells.len(), new_row.cells.len());
            let buffered = emit.compare_row(&old_row.cells, &new_row.cells, new_idx, &pairs);

            PairedRow {
                old_idx,
                new_idx,
                spans,
                buffered,
            }
        })
        .collect()
}

fn row_creations(emit: &EmitCtx<'_>, row_idx: usize, cells: &[CellData]) -> Vec<Change> {
    cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.is_blank())
        .map(|(col_idx, cell)| {
            Change::creation(emit.sheet.clone(), emit.addr(row_idx, col_idx), cell)
        })
        .collect()
}

/// Pads `sheet`'s rows so that index 0 lands on (`origin_row`, `origin_col`).
fn normalized_rows(sheet: &SheetSnapshot, origin_row: u32, origin_col: u32) -> Cow<'_, [RowData]> {
    let pad_rows = sheet.anchor_row.saturating_sub(origin_row) as usize;
    let pad_cols = sheet.anchor_col.saturating_sub(origin_col) as usize;
    if pad_rows == 0 && pad_cols == 0 {
        return Cow::Borrowed(&sheet.rows);
    }

    let mut rows = Vec::with_capacity(pad_rows + sheet.rows.len());
    rows.extend((0..pad_rows).map(|_| RowData::new(Vec::new())));
    rows.extend(sheet.rows.iter().map(|row| {
        let mut cells = vec![CellData::empty(); pad_cols];
        cells.extend(row.cells.iter().cloned());
        RowData::new(cells)
    }));
    Cow::Owned(rows)
}
