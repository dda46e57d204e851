use crate::alignment::{lcs_script, split_gaps};
use crate::hashing::RowHash;

/// Row classification between two versions of one sheet. Indices are
/// positions within the compared row lists, not absolute sheet rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct RowAlignment {
    pub(crate) matched: Vec<(u32, u32)>, // (row_idx_a, row_idx_b), identical content
    pub(crate) paired: Vec<(u32, u32)>,  // (row_idx_a, row_idx_b), modification candidates
    pub(crate) inserted: Vec<u32>,       // row indices in B
    pub(crate) deleted: Vec<u32>,        // row indices in A
}

/// Aligns rows by hash. A gap whose deleted and inserted counts are equal is
/// paired row by row; any other gap is a true deletion/insertion.
///
/// Returns `None` when the LCS table would exceed `work_limit`.
pub(crate) fn align_rows(
    old: &[RowHash],
    new: &[RowHash],
    work_limit: u64,
) -> Option<RowAlignment> {
    let ops = lcs_script(old, new, |a, b| a == b, work_limit)?;
    let (matched, gaps) = split_gaps(&ops);

    let mut alignment = RowAlignment {
        matched: matched
            .into_iter()
            .map(|(a, b)| (a as u32, b as u32))
            .collect(),
        ..Default::default()
    };

    for gap in gaps {
        if gap.is_balanced() {
            alignment.paired.extend(
                gap.deleted
                    .iter()
                    .zip(&gap.inserted)
                    .map(|(&a, &b)| (a as u32, b as u32)),
            );
        } else {
            alignment.deleted.extend(gap.deleted.iter().map(|&a| a as u32));
            alignment.inserted.extend(gap.inserted.iter().map(|&b| b as u32));
        }
    }

    Some(alignment)
}

/// Pairs rows by position; surplus rows on either side become insertions or
/// deletions at the end.
pub(crate) fn align_rows_positional(old: &[RowHash], new: &[RowHash]) -> RowAlignment {
    let common = old.len().min(new.len());
    let mut alignment = RowAlignment::default();
    for idx in 0..common {
        let pair = (idx as u32, idx as u32);
        if old[idx] == new[idx] {
            alignment.matched.push(pair);
        } else {
            alignment.paired.push(pair);
        }
    }
    alignment.deleted = (common..old.len()).map(|i| i as u32).collect();
    alignment.inserted = (common..new.len()).map(|i| i as u32).collect();
    alignment
}

/// Groups sorted indices into `(start, count)` runs of consecutive values.
pub(crate) fn coalesce_runs(indices: &[u32]) -> Vec<(u32, u32)> {
    let mut runs: Vec<(u32, u32)> = Vec::new();
    for &idx in indices {
        match runs.last_mut() {
            Some((start, count)) if *start + *count == idx => *count += 1,
            _ => runs.push((idx, 1)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hashes(values: &[u64]) -> Vec<RowHash> {
        values.iter().map(|&v| RowHash(v)).collect()
    }

    #[test]
    fn aligns_single_insert_with_unique_row() {
        let old = hashes(&[1, 2, 3, 4, 5]);
        let new = hashes(&[1, 2, 99, 3, 4, 5]);
        let alignment = align_rows(&old, &new, u64::MAX).expect("within limit");
        assert_eq!(alignment.inserted, vec![2]);
        assert!(alignment.deleted.is_empty());
        assert!(alignment.paired.is_empty());
        assert_eq!(alignment.matched.len(), 5);
        assert_eq!(alignment.matched[2], (2, 3));
    }

    #[test]
    fn edited_row_is_paired_not_deleted() {
        let old = hashes(&[1, 2, 3]);
        let new = hashes(&[1, 20, 3]);
        let alignment = align_rows(&old, &new, u64::MAX).expect("within limit");
        assert_eq!(alignment.paired, vec![(1, 1)]);
        assert!(alignment.inserted.is_empty());
        assert!(alignment.deleted.is_empty());
    }

    #[test]
    fn unbalanced_gap_is_structural() {
        let old = hashes(&[1, 2, 3, 4]);
        let new = hashes(&[1, 9, 4]);
        let alignment = align_rows(&old, &new, u64::MAX).expect("within limit");
        assert_eq!(alignment.deleted, vec![1, 2]);
        assert_eq!(alignment.inserted, vec![1]);
        assert!(alignment.paired.is_empty());
    }

    #[test]
    fn every_row_changed_pairs_all() {
        let old = hashes(&[1, 2, 3]);
        let new = hashes(&[4, 5, 6]);
        let alignment = align_rows(&old, &new, u64::MAX).expect("within limit");
        assert_eq!(alignment.paired, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn limit_exceeded_returns_none() {
        let old = hashes(&[1, 2, 3]);
        let new = hashes(&[4, 5, 6]);
        assert!(align_rows(&old, &new, 8).is_none());
    }

    #[test]
    fn positional_alignment_handles_length_mismatch() {
        let old = hashes(&[1, 2, 3]);
        let new = hashes(&[1, 7]);
        let alignment = align_rows_positional(&old, &new);
        assert_eq!(alignment.matched, vec![(0, 0)]);
        assert_eq!(alignment.paired, vec![(1, 1)]);
        assert_eq!(alignment.deleted, vec![2]);
        assert!(alignment.inserted.is_empty());
    }

    #[test]
    fn coalesces_consecutive_indices() {
        assert_eq!(coalesce_runs(&[1, 2, 3, 7, 9, 10]), vec![(1, 3), (7, 1), (9, 2)]);
        assert!(coalesce_runs(&[]).is_empty());
    }
}
