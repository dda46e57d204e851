//! Longest-common-subsequence edit scripts.
//!
//! Shared by row alignment (over row hashes) and intra-row cell alignment
//! (over cell contents). Common prefixes and suffixes are trimmed before the
//! O(n*m) table is built, and the table size is bounded by a work limit.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditOp {
    /// Old index, new index.
    Equal(usize, usize),
    Delete(usize),
    Insert(usize),
}

/// A maximal run of non-equal ops between two equal ops (or the ends).
///
/// Deleted old indices and inserted new indices are each contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Gap {
    pub(crate) deleted: Vec<usize>,
    pub(crate) inserted: Vec<usize>,
}

impl Gap {
    pub(crate) fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.inserted.is_empty()
    }

    pub(crate) fn is_balanced(&self) -> bool {
        self.deleted.len() == self.inserted.len()
    }
}

/// Returns `None` when the trimmed table would exceed `work_limit` cells.
pub(crate) fn lcs_script<T, F>(a: &[T], b: &[T], eq: F, work_limit: u64) -> Option<Vec<EditOp>>
where
    F: Fn(&T, &T) -> bool,
{
    let prefix = a.iter().zip(b).take_while(|(x, y)| eq(x, y)).count();
    let max_suffix = a.len().min(b.len()) - prefix;
    let suffix = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take(max_suffix)
        .take_while(|(x, y)| eq(x, y))
        .count();

    let a_mid = &a[prefix..a.len() - suffix];
    let b_mid = &b[prefix..b.len() - suffix];
    let m = a_mid.len();
    let n = b_mid.len();

    if (m as u64).saturating_mul(n as u64) > work_limit {
        return None;
    }

    let mut ops = Vec::with_capacity(a.len().max(b.len()) + m.min(n));
    ops.extend((0..prefix).map(|i| EditOp::Equal(i, i)));

    let width = n + 1;
    let mut dp = vec![0u32; (m + 1) * width];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            dp[i * width + j] = if eq(&a_mid[i], &b_mid[j]) {
                dp[(i + 1) * width + j + 1] + 1
            } else {
                dp[(i + 1) * width + j].max(dp[i * width + j + 1])
            };
        }
    }

    let mut i = 0usize;
    let mut j = 0usize;
    while i < m && j < n {
        if eq(&a_mid[i], &b_mid[j]) {
            ops.push(EditOp::Equal(prefix + i, prefix + j));
            i += 1;
            j += 1;
        } else if dp[(i + 1) * width + j] >= dp[i * width + j + 1] {
            ops.push(EditOp::Delete(prefix + i));
            i += 1;
        } else {
            ops.push(EditOp::Insert(prefix + j));
            j += 1;
        }
    }
    ops.extend((i..m).map(|i| EditOp::Delete(prefix + i)));
    ops.extend((j..n).map(|j| EditOp::Insert(prefix + j)));

    let a_tail = a.len() - suffix;
    let b_tail = b.len() - suffix;
    ops.extend((0..suffix).map(|k| EditOp::Equal(a_tail + k, b_tail + k)));

    debug_assert!(
        is_monotonic(&ops),
        "equal pairs must be strictly increasing in both dimensions"
    );

    Some(ops)
}

/// Splits an edit script into its equal pairs and the gaps between them.
pub(crate) fn split_gaps(ops: &[EditOp]) -> (Vec<(usize, usize)>, Vec<Gap>) {
    let mut matched = Vec::new();
    let mut gaps = Vec::new();
    let mut current = Gap::default();

    for op in ops {
        match *op {
            EditOp::Equal(i, j) => {
                if !current.is_empty() {
                    gaps.push(std::mem::take(&mut current));
                }
                matched.push((i, j));
            }
            EditOp::Delete(i) => current.deleted.push(i),
            EditOp::Insert(j) => current.inserted.push(j),
        }
    }
    if !current.is_empty() {
        gaps.push(current);
    }

    (matched, gaps)
}

fn is_monotonic(ops: &[EditOp]) -> bool {
    let pairs: Vec<(usize, usize)> = ops
        .iter()
        .filter_map(|op| match *op {
            EditOp::Equal(i, j) => Some((i, j)),
            _ => None,
        })
        .collect();
    pairs.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 < w[1].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(a: &[i32], b: &[i32]) -> Vec<EditOp> {
        lcs_script(a, b, |x, y| x == y, u64::MAX).expect("within limit")
    }

    #[test]
    fn identical_sequences_are_all_equal() {
        let ops = script(&[1, 2, 3], &[1, 2, 3]);
        assert_eq!(
            ops,
            vec![EditOp::Equal(0, 0), EditOp::Equal(1, 1), EditOp::Equal(2, 2)]
        );
    }

    #[test]
    fn insertion_in_middle() {
        let ops = script(&[1, 2, 3], &[1, 9, 2, 3]);
        assert_eq!(
            ops,
            vec![
                EditOp::Equal(0, 0),
                EditOp::Insert(1),
                EditOp::Equal(1, 2),
                EditOp::Equal(2, 3)
            ]
        );
    }

    #[test]
    fn substitution_prefers_delete_before_insert() {
        let ops = script(&[1, 2, 3], &[1, 7, 3]);
        assert_eq!(
            ops,
            vec![
                EditOp::Equal(0, 0),
                EditOp::Delete(1),
                EditOp::Insert(1),
                EditOp::Equal(2, 2)
            ]
        );
    }

    #[test]
    fn empty_sides() {
        assert_eq!(script(&[], &[5, 6]), vec![EditOp::Insert(0), EditOp::Insert(1)]);
        assert_eq!(script(&[5], &[]), vec![EditOp::Delete(0)]);
        assert!(script(&[], &[]).is_empty());
    }

    #[test]
    fn work_limit_applies_after_trimming() {
        let a: Vec<i32> = (0..100).collect();
        let mut b = a.clone();
        b[50] = -1;
        // Only a 1x1 middle remains after trimming.
        assert!(lcs_script(&a, &b, |x, y| x == y, 1).is_some());
        let c: Vec<i32> = (200..300).collect();
        assert!(lcs_script(&a, &c, |x, y| x == y, 1_000).is_none());
    }

    #[test]
    fn gaps_split_between_matches() {
        let ops = script(&[1, 2, 3, 4], &[1, 8, 9, 4, 5]);
        let (matched, gaps) = split_gaps(&ops);
        assert_eq!(matched, vec![(0, 0), (3, 3)]);
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].deleted, vec![1, 2]);
        assert_eq!(gaps[0].inserted, vec![1, 2]);
        assert!(gaps[0].is_balanced());
        assert_eq!(gaps[1].inserted, vec![4]);
        assert!(!gaps[1].is_balanced());
    }
}
