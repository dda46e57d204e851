//! Snapshot data structures.
//!
//! A [`Snapshot`] is the immutable, fully materialized capture of a workbook at
//! one point in time, as handed to the engine by a snapshot provider:
//! - [`Snapshot`]: persistent sheet id → [`SheetSnapshot`]
//! - [`SheetSnapshot`]: display name, anchor, and ordered [`RowData`]
//! - [`RowData`]: a content hash plus ordered [`CellData`]
//!
//! The provider must emit rows top-to-bottom and cells left-to-right; row and
//! column alignment are meaningless otherwise.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::hashing::{RowHash, hash_row};

/// Persistent sheet identifier. Stable across renames; opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetId(String);

impl SheetId {
    pub fn new(id: impl Into<String>) -> SheetId {
        SheetId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SheetId {
    fn from(value: &str) -> Self {
        SheetId::new(value)
    }
}

/// A cell value as reported by the host spreadsheet.
///
/// Serialized untagged, so JSON numbers, strings, and booleans map directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Canonical string form used for hashing and comparison.
    ///
    /// Integral numbers render without a fractional part (`5`, not `5.0`) so
    /// that a value captured as `5` and one captured as `5.0` compare equal.
    pub fn render(&self) -> String {
        match self {
            CellValue::Number(n) => render_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn render_number(n: f64) -> String {
    if n == 0.0 {
        // Folds -0.0 into 0.
        return "0".to_string();
    }
    if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        return format!("{}", n as i64);
    }
    format!("{n}")
}

/// Renders an optional value; absent values render as the empty string.
pub fn render_value(value: Option<&CellValue>) -> String {
    value.map(CellValue::render).unwrap_or_default()
}

/// One cell in a captured row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CellData {
    /// A1 address as reported by the provider. Informational only: the engine
    /// derives positions from the sheet anchor and the cell's index in its row.
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub value: Option<CellValue>,
    /// Formula text including the leading `=`; empty when the cell has none.
    #[serde(default)]
    pub formula: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Sheet-qualified references this formula depends on, when the provider
    /// can supply them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precedents: Option<Vec<String>>,
}

impl CellData {
    pub fn new(value: Option<CellValue>, formula: impl Into<String>) -> CellData {
        CellData {
            address: String::new(),
            value,
            formula: formula.into(),
            format: None,
            precedents: None,
        }
    }

    pub fn value(value: impl Into<CellValue>) -> CellData {
        CellData::new(Some(value.into()), "")
    }

    pub fn formula(formula: impl Into<String>, value: impl Into<CellValue>) -> CellData {
        CellData::new(Some(value.into()), formula)
    }

    pub fn empty() -> CellData {
        CellData::default()
    }

    pub fn has_formula(&self) -> bool {
        !self.formula.is_empty()
    }

    /// True when both the rendered value and the formula are empty.
    pub fn is_blank(&self) -> bool {
        self.formula.is_empty() && render_value(self.value.as_ref()).is_empty()
    }

    /// Compares rendered value and formula text; format and precedents are
    /// ignored.
    pub fn content_eq(&self, other: &CellData) -> bool {
        self.formula == other.formula
            && render_value(self.value.as_ref()) == render_value(other.value.as_ref())
    }
}

/// One captured row: its content hash and cells in left-to-right order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowData {
    /// Provider-supplied hash. The differ recomputes it, so providers may omit
    /// it from serialized snapshots.
    #[serde(default)]
    pub hash: RowHash,
    pub cells: Vec<CellData>,
}

impl RowData {
    /// Builds a row, computing its hash with the same function the differ uses.
    pub fn new(cells: Vec<CellData>) -> RowData {
        RowData {
            hash: hash_row(&cells),
            cells,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellData::is_blank)
    }
}

/// A rectangular merged area, zero-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

/// The captured used range of one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSnapshot {
    pub name: String,
    /// Zero-based row of the used range's top-left cell.
    #[serde(default)]
    pub anchor_row: u32,
    /// Zero-based column of the used range's top-left cell.
    #[serde(default)]
    pub anchor_col: u32,
    #[serde(default)]
    pub rows: Vec<RowData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_ranges: Option<Vec<MergedRange>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_widths: Option<Vec<f64>>,
}

impl SheetSnapshot {
    pub fn new(name: impl Into<String>, rows: Vec<RowData>) -> SheetSnapshot {
        SheetSnapshot {
            name: name.into(),
            anchor_row: 0,
            anchor_col: 0,
            rows,
            merged_ranges: None,
            column_widths: None,
        }
    }

    pub fn with_anchor(mut self, row: u32, col: u32) -> SheetSnapshot {
        self.anchor_row = row;
        self.anchor_col = col;
        self
    }
}

/// An immutable capture of every sheet in a workbook.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Free-form version label (timestamp, revision id); used for logging only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub sheets: BTreeMap<SheetId, SheetSnapshot>,
}

impl Snapshot {
    pub fn new() -> Snapshot {
        Snapshot::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Snapshot {
        self.label = Some(label.into());
        self
    }

    pub fn with_sheet(mut self, id: impl Into<SheetId>, sheet: SheetSnapshot) -> Snapshot {
        self.sheets.insert(id.into(), sheet);
        self
    }

    pub fn sheet(&self, id: &SheetId) -> Option<&SheetSnapshot> {
        self.sheets.get(id)
    }

    pub fn describe(&self) -> &str {
        self.label.as_deref().unwrap_or("<unlabelled>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_render_without_trailing_fraction() {
        assert_eq!(CellValue::Number(5.0).render(), "5");
        assert_eq!(CellValue::Number(-0.0).render(), "0");
        assert_eq!(CellValue::Number(2.5).render(), "2.5");
        assert_eq!(CellValue::Bool(true).render(), "TRUE");
    }

    #[test]
    fn values_deserialize_untagged() {
        let cells: Vec<CellData> = serde_json::from_str(
            r#"[{"value": 5}, {"value": "x"}, {"value": true}, {"formula": "=A1"}]"#,
        )
        .expect("cells should parse");
        assert_eq!(cells[0].value, Some(CellValue::Number(5.0)));
        assert_eq!(cells[1].value, Some(CellValue::Text("x".into())));
        assert_eq!(cells[2].value, Some(CellValue::Bool(true)));
        assert_eq!(cells[3].value, None);
        assert!(cells[3].has_formula());
    }

    #[test]
    fn blank_cell_detection_uses_rendered_value() {
        assert!(CellData::empty().is_blank());
        assert!(CellData::value("").is_blank());
        assert!(!CellData::value(0.0).is_blank());
    }

    #[test]
    fn describe_falls_back_when_unlabelled() {
        assert_eq!(Snapshot::new().describe(), "<unlabelled>");
        assert_eq!(Snapshot::new().with_label("rev-7").describe(), "rev-7");
    }

    #[test]
    fn content_equality_ignores_format() {
        let mut a = CellData::value(1.0);
        let b = CellData::value(1.0);
        a.format = Some("0.00".into());
        assert!(a.content_eq(&b));
        assert!(!a.content_eq(&CellData::formula("=1", 1.0)));
    }
}
