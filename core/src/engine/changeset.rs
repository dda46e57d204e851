use crate::addressing::CellAddress;
use crate::config::DiffConfig;
use crate::diff::{Change, ChangeAnnotation, Changeset, DiffError, StructuralChange};
use crate::snapshot::{SheetId, SheetSnapshot, Snapshot};
use crate::topology::diff_topology;

use super::context::DiffContext;
use super::sheet_diff::diff_sheet;

/// Computes the changeset between two adjacent snapshots.
///
/// Sheet-level events come first, followed by each common sheet's content
/// diff in sheet id order. Cells of sheets that only exist in `new` are
/// reported as synthetic creations.
pub fn diff_snapshots(
    old: &Snapshot,
    new: &Snapshot,
    config: &DiffConfig,
) -> Result<Changeset, DiffError> {
    config.validate()?;

    let topology = diff_topology(old, new);
    let mut ctx = DiffContext::default();
    let mut out = Changeset {
        structural_changes: topology.structural_changes.clone(),
        ..Default::default()
    };
    let deleted_sheets: Vec<String> = out
        .deleted_sheets()
        .map(|(_, name)| name.to_string())
        .collect();

    for sheet_id in &topology.common_sheet_ids {
        let (Some(old_sheet), Some(new_sheet)) = (old.sheet(sheet_id), new.sheet(sheet_id)) else {
            tracing::debug!("sheet {sheet_id} missing from one side; nothing to diff");
            continue;
        };
        let sheet_changes = diff_sheet(
            sheet_id,
            old_sheet,
            new_sheet,
            config,
            &deleted_sheets,
            &mut ctx,
        )?;
        out.extend(sheet_changes);
    }

    for change in &topology.structural_changes {
        if let StructuralChange::SheetAddition { sheet, .. } = change {
            if let Some(added) = new.sheet(sheet) {
                out.modified_cells.extend(synthesize_sheet(sheet, added));
            }
        }
    }

    out.warnings.extend(ctx.warnings);

    tracing::debug!(
        "changeset {} -> {}: {} cell changes, {} rows added, {} rows deleted, {} structural changes",
        old.describe(),
        new.describe(),
        out.modified_cells.len(),
        out.added_rows.len(),
        out.deleted_rows.len(),
        out.structural_changes.len()
    );

    Ok(out)
}

/// Every non-empty cell of a newly added sheet, as a creation the engine
/// synthesized rather than observed.
fn synthesize_sheet(sheet_id: &SheetId, sheet: &SheetSnapshot) -> Vec<Change> {
    let mut changes = Vec::new();
    for (row_idx, row) in sheet.rows.iter().enumerate() {
        for (col_idx, cell) in row.cells.iter().enumerate() {
            if cell.is_blank() {
                continue;
            }
            let addr = CellAddress::from_indices(
                sheet.anchor_row + row_idx as u32,
                sheet.anchor_col + col_idx as u32,
            );
            let mut change = Change::creation(sheet_id.clone(), addr, cell);
            change.annotate(ChangeAnnotation::Synthetic);
            changes.push(change);
        }
    }
    changes
}
