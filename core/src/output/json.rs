use crate::diff::Changeset;
use crate::report::DiffReport;

pub fn serialize_diff_report(report: &DiffReport) -> serde_json::Result<String> {
    serde_json::to_string(report)
}

pub fn serialize_diff_report_pretty(report: &DiffReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn serialize_changeset(changeset: &Changeset) -> serde_json::Result<String> {
    serde_json::to_string(changeset)
}

pub fn serialize_changeset_pretty(changeset: &Changeset) -> serde_json::Result<String> {
    serde_json::to_string_pretty(changeset)
}
