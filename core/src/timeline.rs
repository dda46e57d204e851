//! Chronological resolution of changesets into per-cell lineages.
//!
//! The resolver walks changesets oldest to newest. Each lineage is keyed by
//! the cell's address in the most recent version seen so far; structural
//! changes re-key every open lineage so that, at the end, keys are final
//! addresses.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

use crate::addressing::CellKey;
use crate::diff::{Change, Changeset, RowChange, RowChangeKind, StructuralChange};
use crate::snapshot::SheetId;
use crate::transform::transform;

/// The outcome of folding a changeset sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedTimeline {
    /// Final address → every change that cell went through, oldest first.
    pub lineages: BTreeMap<CellKey, Vec<Change>>,
    /// Added and deleted rows in chronological order. Deleted rows carry the
    /// edits their cells had accumulated before the deletion.
    pub row_events: Vec<RowChange>,
    pub structural_changes: Vec<StructuralChange>,
    pub warnings: Vec<String>,
}

impl ResolvedTimeline {
    pub fn deleted_rows(&self) -> impl Iterator<Item = &RowChange> {
        self.row_events
            .iter()
            .filter(|r| r.kind == RowChangeKind::Deleted)
    }

    pub fn added_rows(&self) -> impl Iterator<Item = &RowChange> {
        self.row_events
            .iter()
            .filter(|r| r.kind == RowChangeKind::Added)
    }
}

#[derive(Debug, Default)]
struct FoldState {
    lineages: FxHashMap<CellKey, Vec<Change>>,
    row_events: Vec<RowChange>,
    structural_changes: Vec<StructuralChange>,
    warnings: Vec<String>,
}

impl FoldState {
    /// Applies one changeset. The order of the four phases is load-bearing:
    /// deleted rows are matched in source coordinates, so termination must
    /// precede re-keying, and new edits are keyed in destination coordinates,
    /// so they must follow it.
    fn step(mut self, changeset: &Changeset) -> FoldState {
        let deleted = self.terminate_deleted_rows(&changeset.deleted_rows);
        self.rekey(&changeset.structural_changes);

        for change in &changeset.modified_cells {
            self.lineages
                .entry(change.key())
                .or_default()
                .push(change.clone());
        }

        self.row_events.extend(deleted);
        self.row_events
            .extend(changeset.added_rows.iter().cloned());
        self.structural_changes
            .extend(changeset.structural_changes.iter().cloned());
        self.warnings.extend(changeset.warnings.iter().cloned());
        self
    }

    /// Closes every lineage that sits on a deleted row and hands its history to
    /// the deletion event, ordered by column.
    fn terminate_deleted_rows(&mut self, deleted_rows: &[RowChange]) -> Vec<RowChange> {
        let mut events: Vec<RowChange> = deleted_rows.to_vec();
        if events.is_empty() || self.lineages.is_empty() {
            return events;
        }

        let by_row: FxHashMap<(&SheetId, u32), usize> = deleted_rows
            .iter()
            .enumerate()
            .map(|(i, row)| ((&row.sheet, row.row_idx), i))
            .collect();

        let mut doomed: Vec<(usize, CellKey)> = self
            .lineages
            .keys()
            .filter_map(|key| {
                by_row
                    .get(&(&key.sheet, key.addr.row))
                    .map(|&i| (i, key.clone()))
            })
            .collect();
        doomed.sort();

        for (event_idx, key) in doomed {
            if let Some(history) = self.lineages.remove(&key) {
                events[event_idx].contained_changes.extend(history);
            }
        }
        events
    }

    fn rekey(&mut self, changes: &[StructuralChange]) {
        if changes.iter().all(StructuralChange::is_sheet_level) {
            return;
        }

        let mut next: FxHashMap<CellKey, Vec<Change>> =
            FxHashMap::with_capacity_and_hasher(self.lineages.len(), Default::default());
        for (key, history) in self.lineages.drain() {
            match transform(&key, changes) {
                Some(moved) => next.entry(moved).or_default().extend(history),
                None => tracing::debug!(
                    "lineage at {key} annihilated by a column deletion ({} changes dropped)",
                    history.len()
                ),
            }
        }
        self.lineages = next;
    }

    fn finish(self) -> ResolvedTimeline {
        ResolvedTimeline {
            lineages: self.lineages.into_iter().collect(),
            row_events: self.row_events,
            structural_changes: self.structural_changes,
            warnings: self.warnings,
        }
    }
}

/// Folds `changesets`, oldest first, into a [`ResolvedTimeline`].
///
/// An empty slice yields an empty timeline.
pub fn resolve_timeline(changesets: &[Changeset]) -> ResolvedTimeline {
    let state = changesets
        .iter()
        .fold(FoldState::default(), |state, changeset| state.step(changeset));
    let timeline = state.finish();
    tracing::debug!(
        "resolved {} changesets into {} lineages and {} row events",
        changesets.len(),
        timeline.lineages.len(),
        timeline.row_events.len()
    );
    timeline
}
