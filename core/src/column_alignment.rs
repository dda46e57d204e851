use crate::alignment::{Gap, lcs_script, split_gaps};
use crate::snapshot::CellData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum ShiftKind {
    Add,
    Delete,
}

/// A localized cell shift inside one row: `count` cells added at new index
/// `index`, or deleted from old index `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ShiftSpan {
    pub kind: ShiftKind,
    pub index: u32,
    pub count: u32,
}

impl ShiftSpan {
    pub fn add(index: u32, count: u32) -> ShiftSpan {
        ShiftSpan {
            kind: ShiftKind::Add,
            index,
            count,
        }
    }

    pub fn delete(index: u32, count: u32) -> ShiftSpan {
        ShiftSpan {
            kind: ShiftKind::Delete,
            index,
            count,
        }
    }
}

/// Finds localized shifts between two versions of a row.
///
/// Balanced gaps in the cell-level LCS are in-place edits and yield nothing.
/// So does a trailing gap: cells appended to or cleared from the end of a row
/// move nothing. Any other unbalanced gap yields one span for its net surplus,
/// positioned at the gap's first added (or deleted) cell and then slid left
/// across runs of equal cells, so `[k, "", y] -> [k, "", "", y]` is an add at
/// index 1 like its denser neighbours. Rows that exceed `work_limit` yield no
/// spans and are compared positionally.
pub(crate) fn cell_shift_spans(
    old: &[CellData],
    new: &[CellData],
    work_limit: u64,
) -> Vec<ShiftSpan> {
    let Some(ops) = lcs_script(old, new, CellData::content_eq, work_limit) else {
        return Vec::new();
    };
    let (_, gaps) = split_gaps(&ops);

    let ends_row = |last: Option<&usize>, len: usize| last.is_some_and(|&i| i + 1 == len);
    let is_trailing = |gap: &Gap| {
        ends_row(gap.deleted.last(), old.len()) || ends_row(gap.inserted.last(), new.len())
    };

    gaps.iter()
        .filter(|gap| !gap.is_balanced() && !is_trailing(gap))
        .filter_map(|gap| {
            let added = gap.inserted.len();
            let deleted = gap.deleted.len();
            if added > deleted {
                let count = added - deleted;
                let start = slide_left(new, *gap.inserted.first()?, count);
                Some(ShiftSpan::add(start as u32, count as u32))
            } else {
                let count = deleted - added;
                let start = slide_left(old, *gap.deleted.first()?, count);
                Some(ShiftSpan::delete(start as u32, count as u32))
            }
        })
        .collect()
}

/// Moves the block `cells[start..start + count]` to its leftmost equivalent
/// position: the block can step left while the cell before it equals its
/// last cell.
fn slide_left(cells: &[CellData], mut start: usize, count: usize) -> usize {
    while start > 0
        && start + count <= cells.len()
        && cells[start - 1].content_eq(&cells[start + count - 1])
    {
        start -= 1;
    }
    start
}

/// Pairs of (old index, new index) to compare once `span` is accounted for.
///
/// Cells inside an added span have no old counterpart and are skipped; cells
/// inside a deleted span have no new counterpart and are skipped. Every other
/// position up to the longer side is visited, so rows of unequal width still
/// compare their surplus cells against implicit empties.
pub(crate) fn shifted_pairs(
    span: ShiftSpan,
    old_len: usize,
    new_len: usize,
) -> Vec<(usize, usize)> {
    let index = span.index as usize;
    let count = span.count as usize;
    match span.kind {
        ShiftKind::Add => {
            let old_extent = old_len.max(new_len.saturating_sub(count));
            (0..old_extent)
                .map(|old_idx| {
                    let new_idx = if old_idx < index { old_idx } else { old_idx + count };
                    (old_idx, new_idx)
                })
                .collect()
        }
        ShiftKind::Delete => {
            let new_extent = new_len.max(old_len.saturating_sub(count));
            (0..new_extent)
                .map(|new_idx| {
                    let old_idx = if new_idx < index { new_idx } else { new_idx + count };
                    (old_idx, new_idx)
                })
                .collect()
        }
    }
}

/// Position-by-position pairs up to the longer side.
pub(crate) fn positional_pairs(old_len: usize, new_len: usize) -> Vec<(usize, usize)> {
    (0..old_len.max(new_len)).map(|i| (i, i)).collect()
}
