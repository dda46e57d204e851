//! Sheet-level topology differencing.

use std::collections::BTreeSet;

use crate::diff::StructuralChange;
use crate::snapshot::{SheetId, Snapshot};

/// Sheet events between two snapshots, plus the sheets that need a content
/// diff.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopologyDiff {
    pub structural_changes: Vec<StructuralChange>,
    pub common_sheet_ids: BTreeSet<SheetId>,
}

/// Compares the sheet sets of two snapshots by persistent id.
///
/// Emits deletions first, then renames, then additions, each in id order.
pub fn diff_topology(old: &Snapshot, new: &Snapshot) -> TopologyDiff {
    let mut out = TopologyDiff::default();
    let mut additions = Vec::new();

    for (id, old_sheet) in &old.sheets {
        if !new.sheets.contains_key(id) {
            out.structural_changes.push(StructuralChange::SheetDeletion {
                sheet: id.clone(),
                name: old_sheet.name.clone(),
            });
        }
    }

    for (id, new_sheet) in &new.sheets {
        match old.sheets.get(id) {
            Some(old_sheet) => {
                if old_sheet.name != new_sheet.name {
                    out.structural_changes.push(StructuralChange::SheetRename {
                        sheet: id.clone(),
                        old_name: old_sheet.name.clone(),
                        new_name: new_sheet.name.clone(),
                    });
                }
                out.common_sheet_ids.insert(id.clone());
            }
            None => additions.push(StructuralChange::SheetAddition {
                sheet: id.clone(),
                name: new_sheet.name.clone(),
            }),
        }
    }

    out.structural_changes.extend(additions);
    out
}
