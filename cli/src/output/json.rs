use anyhow::Result;
use std::io::Write;
use workbook_history::{
    Changeset, DiffReport, serialize_changeset_pretty, serialize_diff_report_pretty,
};

pub fn write_json_report<W: Write>(w: &mut W, report: &DiffReport) -> Result<()> {
    writeln!(w, "{}", serialize_diff_report_pretty(report)?)?;
    Ok(())
}

pub fn write_json_changeset<W: Write>(w: &mut W, changeset: &Changeset) -> Result<()> {
    writeln!(w, "{}", serialize_changeset_pretty(changeset)?)?;
    Ok(())
}
