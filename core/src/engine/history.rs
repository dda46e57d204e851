use crate::config::DiffConfig;
use crate::diff::{Changeset, DiffError};
use crate::report::{DiffReport, SheetNames, consolidate};
use crate::snapshot::Snapshot;
use crate::timeline::resolve_timeline;

use super::changeset::diff_snapshots;

/// One changeset per adjacent pair of `snapshots`, in order.
///
/// With the `parallel` feature the pairs are diffed on the rayon pool; the
/// result is identical to the sequential path.
pub fn build_changesets(
    snapshots: &[Snapshot],
    config: &DiffConfig,
) -> Result<Vec<Changeset>, DiffError> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        snapshots
            .par_windows(2)
            .map(|pair| diff_snapshots(&pair[0], &pair[1], config))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        snapshots
            .windows(2)
            .map(|pair| diff_snapshots(&pair[0], &pair[1], config))
            .collect()
    }
}

/// Compares an inclusive, chronologically ordered range of versions.
///
/// A single snapshot (or a run of identical ones) yields an empty report.
pub fn compare_versions(
    snapshots: &[Snapshot],
    config: &DiffConfig,
) -> Result<DiffReport, DiffError> {
    if snapshots.is_empty() {
        return Err(DiffError::EmptyVersionRange);
    }
    config.validate()?;

    let changesets = build_changesets(snapshots, config)?;
    let timeline = resolve_timeline(&changesets);
    let names = SheetNames::from_snapshots(snapshots);
    let report = consolidate(&timeline, &names);

    tracing::debug!(
        "compared {} versions: {} combined changes, {} structural changes",
        snapshots.len(),
        report.combined_changes.len(),
        report.structural_changes.len()
    );
    Ok(report)
}

/// Like [`compare_versions`], but folds a failure into an incomplete report
/// instead of returning it.
pub fn compare_versions_lossy(snapshots: &[Snapshot], config: &DiffConfig) -> DiffReport {
    match compare_versions(snapshots, config) {
        Ok(report) => report,
        Err(e) => {
            let mut report = DiffReport::empty();
            report.add_warning(e.to_string());
            report
        }
    }
}
