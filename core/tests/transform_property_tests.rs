use proptest::prelude::*;

use workbook_history::{CellAddress, CellKey, SheetId, StructuralChange, transform};

fn sid() -> SheetId {
    SheetId::new("s1")
}

fn structural_change() -> impl Strategy<Value = StructuralChange> {
    (0u8..4, 0u32..20, 1u32..4).prop_map(|(kind, index, count)| match kind {
        0 => StructuralChange::RowInsertion {
            sheet: sid(),
            index,
            count,
        },
        1 => StructuralChange::RowDeletion {
            sheet: sid(),
            index,
            count,
        },
        2 => StructuralChange::ColumnInsertion {
            sheet: sid(),
            index,
            count,
        },
        _ => StructuralChange::ColumnDeletion {
            sheet: sid(),
            index,
            count,
        },
    })
}

/// Undoes `changes`: reversed, with every insertion swapped for the deletion
/// of the same block and vice versa.
fn inverse(changes: &[StructuralChange]) -> Vec<StructuralChange> {
    changes
        .iter()
        .rev()
        .map(|change| match change.clone() {
            StructuralChange::RowInsertion { sheet, index, count } => {
                StructuralChange::RowDeletion { sheet, index, count }
            }
            StructuralChange::RowDeletion { sheet, index, count } => {
                StructuralChange::RowInsertion { sheet, index, count }
            }
            StructuralChange::ColumnInsertion { sheet, index, count } => {
                StructuralChange::ColumnDeletion { sheet, index, count }
            }
            StructuralChange::ColumnDeletion { sheet, index, count } => {
                StructuralChange::ColumnInsertion { sheet, index, count }
            }
            other => other,
        })
        .collect()
}

fn key(row: u32, col: u32) -> CellKey {
    CellKey::new(sid(), CellAddress::from_indices(row, col))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 0,
        .. ProptestConfig::default()
    })]

    #[test]
    fn surviving_cells_round_trip_through_the_inverse(
        row in 0u32..30,
        col in 0u32..30,
        changes in prop::collection::vec(structural_change(), 0..6),
    ) {
        let cell = key(row, col);
        let forward = transform(&cell, &changes);
        prop_assume!(forward.is_some());
        let moved = forward.expect("checked above");
        prop_assert_eq!(transform(&moved, &inverse(&changes)), Some(cell));
    }

    #[test]
    fn cells_inside_a_deleted_block_are_annihilated(
        index in 0u32..20,
        count in 1u32..5,
        offset in 0u32..5,
        col in 0u32..10,
    ) {
        prop_assume!(offset < count);
        let rows = [StructuralChange::RowDeletion { sheet: sid(), index, count }];
        prop_assert_eq!(transform(&key(index + offset, col), &rows), None);

        let cols = [StructuralChange::ColumnDeletion { sheet: sid(), index, count }];
        prop_assert_eq!(transform(&key(col, index + offset), &cols), None);
    }

    #[test]
    fn other_sheets_are_untouched(
        row in 0u32..30,
        col in 0u32..30,
        changes in prop::collection::vec(structural_change(), 0..6),
    ) {
        let cell = CellKey::new(SheetId::new("other"), CellAddress::from_indices(row, col));
        prop_assert_eq!(transform(&cell, &changes), Some(cell.clone()));
    }
}

#[test]
fn sheet_level_changes_leave_keys_alone() {
    let changes = [
        StructuralChange::SheetRename {
            sheet: sid(),
            old_name: "A".into(),
            new_name: "B".into(),
        },
        StructuralChange::SheetDeletion {
            sheet: sid(),
            name: "B".into(),
        },
    ];
    assert_eq!(transform(&key(3, 4), &changes), Some(key(3, 4)));
}
