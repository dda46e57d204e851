use crate::Verbosity;
use anyhow::Result;
use std::collections::BTreeMap;
use std::io::Write;
use workbook_history::{
    Change, ChangeAnnotation, ChangeKind, CombinedChange, DiffReport, NamedStructuralChange,
    RowBlock, StructuralChange, index_to_address,
};

#[derive(Default)]
struct SheetSection<'a> {
    structural: Vec<&'a StructuralChange>,
    deleted_rows: Vec<&'a RowBlock>,
    added_rows: Vec<&'a RowBlock>,
    cells: Vec<&'a CombinedChange>,
}

pub fn write_text_report<W: Write>(
    w: &mut W,
    report: &DiffReport,
    verbosity: Verbosity,
) -> Result<()> {
    if !report.has_changes() {
        writeln!(w, "No differences found.")?;
        write_summary(w, report, verbosity)?;
        return Ok(());
    }

    if verbosity != Verbosity::Quiet {
        for (sheet_name, section) in &partition_by_sheet(report) {
            writeln!(w, "Sheet \"{}\":", sheet_name)?;
            for change in &section.structural {
                writeln!(w, "  {}", render_structural(change))?;
            }
            for block in &section.deleted_rows {
                writeln!(w, "  {}", render_deleted_row(block))?;
            }
            for block in &section.added_rows {
                writeln!(w, "  Row {}: ADDED", block.row.row_idx + 1)?;
            }
            for change in &section.cells {
                for line in render_cell(change, verbosity) {
                    writeln!(w, "  {}", line)?;
                }
            }
            writeln!(w)?;
        }
    }

    write_summary(w, report, verbosity)?;
    Ok(())
}

fn partition_by_sheet(report: &DiffReport) -> BTreeMap<&str, SheetSection<'_>> {
    let mut sections: BTreeMap<&str, SheetSection<'_>> = BTreeMap::new();

    for NamedStructuralChange { sheet_name, change } in &report.structural_changes {
        sections.entry(sheet_name.as_str()).or_default().structural.push(change);
    }
    for block in &report.deleted_rows {
        sections.entry(block.sheet_name.as_str()).or_default().deleted_rows.push(block);
    }
    for block in &report.added_rows {
        sections.entry(block.sheet_name.as_str()).or_default().added_rows.push(block);
    }
    for change in &report.combined_changes {
        sections.entry(change.sheet_name.as_str()).or_default().cells.push(change);
    }

    sections
}

fn render_structural(change: &StructuralChange) -> String {
    match change {
        StructuralChange::RowInsertion { index, count, .. } => {
            format!("Rows {}: INSERTED", row_span(*index, *count))
        }
        StructuralChange::RowDeletion { index, count, .. } => {
            format!("Rows {}: DELETED", row_span(*index, *count))
        }
        StructuralChange::ColumnInsertion { index, count, .. } => {
            format!("Columns {}: INSERTED", col_span(*index, *count))
        }
        StructuralChange::ColumnDeletion { index, count, .. } => {
            format!("Columns {}: DELETED", col_span(*index, *count))
        }
        StructuralChange::SheetRename {
            old_name, new_name, ..
        } => format!("RENAMED from \"{}\" to \"{}\"", old_name, new_name),
        StructuralChange::SheetAddition { .. } => "Sheet ADDED".to_string(),
        StructuralChange::SheetDeletion { .. } => "Sheet REMOVED".to_string(),
    }
}

fn row_span(index: u32, count: u32) -> String {
    if count <= 1 {
        format!("{}", index + 1)
    } else {
        format!("{}-{}", index + 1, index + count)
    }
}

fn col_span(index: u32, count: u32) -> String {
    if count <= 1 {
        col_letter(index)
    } else {
        format!("{}-{}", col_letter(index), col_letter(index + count - 1))
    }
}

fn render_deleted_row(block: &RowBlock) -> String {
    let earlier = block.row.contained_changes.len();
    if earlier == 0 {
        format!("Row {}: DELETED", block.row.row_idx + 1)
    } else {
        format!(
            "Row {}: DELETED (after {} earlier edit{})",
            block.row.row_idx + 1,
            earlier,
            if earlier == 1 { "" } else { "s" }
        )
    }
}

fn render_cell(change: &CombinedChange, verbosity: Verbosity) -> Vec<String> {
    let mut header = format!(
        "Cell {}: {}",
        change.address,
        describe_transition(
            change.kind,
            &change.start_value_text(),
            &change.end_value_text(),
            &change.start_formula,
            &change.end_formula,
        )
    );
    if change.is_creation {
        header.push_str(" [new]");
    }
    if change.has(ChangeAnnotation::Consequential) {
        header.push_str(" [consequential]");
    }

    let mut lines = vec![header];
    if verbosity == Verbosity::Verbose && change.history.len() > 1 {
        for (i, step) in change.history.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, render_step(step)));
        }
    }
    lines
}

fn render_step(step: &Change) -> String {
    describe_transition(
        step.kind,
        &step.old_value_text(),
        &step.new_value_text(),
        &step.old_formula,
        &step.new_formula,
    )
}

fn describe_transition(
    kind: ChangeKind,
    old_value: &str,
    new_value: &str,
    old_formula: &str,
    new_formula: &str,
) -> String {
    let values = format!("\"{}\" -> \"{}\"", escape_string(old_value), escape_string(new_value));
    let formulas = format!(
        "{} -> {}",
        format_formula(old_formula),
        format_formula(new_formula)
    );
    match kind {
        ChangeKind::Value => values,
        ChangeKind::Formula => format!("formula {}", formulas),
        ChangeKind::Both => format!("{}, formula {}", values, formulas),
    }
}

fn format_formula(formula: &str) -> String {
    if formula.is_empty() {
        "<none>".to_string()
    } else {
        formula.to_string()
    }
}

fn col_letter(col: u32) -> String {
    index_to_address(0, col)
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .to_string()
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
        .replace('"', "\\\"")
}

fn write_summary<W: Write>(w: &mut W, report: &DiffReport, verbosity: Verbosity) -> Result<()> {
    if verbosity == Verbosity::Quiet && !report.has_changes() {
        return Ok(());
    }

    writeln!(w, "---")?;
    writeln!(w, "Summary:")?;
    writeln!(w, "  Cell changes: {}", report.combined_changes.len())?;
    if report.hidden_count > 0 {
        writeln!(w, "  Hidden cell changes: {}", report.hidden_count)?;
    }
    if !report.added_rows.is_empty() {
        writeln!(w, "  Rows added: {}", report.added_rows.len())?;
    }
    if !report.deleted_rows.is_empty() {
        writeln!(w, "  Rows deleted: {}", report.deleted_rows.len())?;
    }
    if !report.structural_changes.is_empty() {
        writeln!(w, "  Structural changes: {}", report.structural_changes.len())?;
    }

    if !report.complete {
        writeln!(w, "  Status: INCOMPLETE (see warnings)")?;
    } else if report.partial {
        writeln!(w, "  Status: partial (cell changes truncated)")?;
    } else {
        writeln!(w, "  Status: complete")?;
    }

    Ok(())
}
