use rustc_hash::FxHashMap;

use crate::column_alignment::ShiftSpan;
use crate::diff::Change;

/// A modification-candidate row pair together with its localized shifts and
/// the changes a plain positional comparison produced for it.
#[derive(Debug, Clone)]
pub(super) struct PairedRow {
    pub(super) old_idx: usize,
    pub(super) new_idx: usize,
    pub(super) spans: Vec<ShiftSpan>,
    pub(super) buffered: Vec<Change>,
}

impl PairedRow {
    pub(super) fn votes_for(&self, span: ShiftSpan) -> bool {
        self.spans.contains(&span)
    }
}

/// Tallies shift spans across paired rows and returns the sheet-wide column
/// shift, if any.
///
/// Only rows with at least one localized shift take part. The most common
/// span wins when its share of those rows reaches `threshold`; a tie for first
/// place infers nothing.
pub(super) fn infer_column_shift(rows: &[PairedRow], threshold: f64) -> Option<ShiftSpan> {
    let mut votes: FxHashMap<ShiftSpan, usize> = FxHashMap::default();
    let mut shifted_rows = 0usize;

    for row in rows.iter().filter(|r| !r.spans.is_empty()) {
        shifted_rows += 1;
        let mut distinct = row.spans.clone();
        distinct.sort();
        distinct.dedup();
        for span in distinct {
            *votes.entry(span).or_insert(0) += 1;
        }
    }

    if shifted_rows == 0 {
        return None;
    }

    let mut ranked: Vec<(ShiftSpan, usize)> = votes.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let &(winner, count) = ranked.first()?;
    if ranked.get(1).is_some_and(|&(_, runner_up)| runner_up == count) {
        tracing::debug!("column inference: tie between shift signatures at {count} votes");
        return None;
    }

    let share = count as f64 / shifted_rows as f64;
    if share >= threshold {
        tracing::debug!(
            "column inference: {winner:?} wins with {count}/{shifted_rows} shifted rows"
        );
        Some(winner)
    } else {
        tracing::debug!(
            "column inference: best signature {winner:?} has {count}/{shifted_rows}, below threshold {threshold}"
        );
        None
    }
}
