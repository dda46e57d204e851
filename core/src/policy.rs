//! Host-side policy gates applied to a finished report.

use crate::report::DiffReport;

/// Cell-change budget for unlicensed or preview use.
pub const DEFAULT_CELL_LIMIT: usize = 50;

/// Keeps at most `limit` combined changes, recording how many were withheld.
///
/// The engine never calls this; it exists for hosts that gate the size of a
/// report. Row blocks and structural changes are left intact.
pub fn apply_cell_limit(report: &mut DiffReport, limit: usize) {
    let total = report.combined_changes.len();
    if total <= limit {
        return;
    }
    report.combined_changes.truncate(limit);
    report.partial = true;
    report.hidden_count += total - limit;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::CellAddress;
    use crate::diff::ChangeKind;
    use crate::report::CombinedChange;
    use crate::snapshot::SheetId;

    fn report_with(n: u32) -> DiffReport {
        let mut report = DiffReport::empty();
        report.combined_changes = (0..n)
            .map(|row| CombinedChange {
                sheet: SheetId::new("s1"),
                sheet_name: "Data".into(),
                address: CellAddress::from_indices(row, 0),
                kind: ChangeKind::Value,
                start_value: None,
                end_value: None,
                start_formula: String::new(),
                end_formula: String::new(),
                is_creation: true,
                history: Vec::new(),
                annotations: Vec::new(),
            })
            .collect();
        report
    }

    #[test]
    fn truncates_and_counts_hidden() {
        let mut report = report_with(5);
        apply_cell_limit(&mut report, 3);
        assert_eq!(report.combined_changes.len(), 3);
        assert!(report.partial);
        assert_eq!(report.hidden_count, 2);
        assert!(report.has_changes());
    }

    #[test]
    fn within_limit_is_untouched() {
        let mut report = report_with(2);
        apply_cell_limit(&mut report, DEFAULT_CELL_LIMIT);
        assert!(!report.partial);
        assert_eq!(report.hidden_count, 0);
    }
}
