//! Workbook History: a diff and history-synthesis engine for workbook snapshots.
//!
//! This crate provides functionality for:
//! - Computing sheet-level and cell-level differences between two snapshots
//! - Tracking each logical cell across row, column, and sheet edits
//! - Consolidating a range of versions into one before/after report
//! - Serializing changesets and reports to JSON
//!
//! The engine performs no I/O: snapshots arrive as plain in-memory data from a
//! snapshot provider, which must emit stable sheet ids, rows top-to-bottom,
//! and cells left-to-right.
//!
//! # Quick Start
//!
//! ```
//! use workbook_history::{
//!     CellData, DiffConfig, RowData, SheetSnapshot, Snapshot, compare_versions,
//! };
//!
//! let v1 = Snapshot::new().with_sheet(
//!     "sheet-1",
//!     SheetSnapshot::new("Budget", vec![RowData::new(vec![CellData::value(100.0)])]),
//! );
//! let v2 = Snapshot::new().with_sheet(
//!     "sheet-1",
//!     SheetSnapshot::new("Budget", vec![RowData::new(vec![CellData::value(120.0)])]),
//! );
//!
//! let report = compare_versions(&[v1, v2], &DiffConfig::default())?;
//! for change in &report.combined_changes {
//!     println!(
//!         "{}!{}: {} -> {}",
//!         change.sheet_name,
//!         change.address,
//!         change.start_value_text(),
//!         change.end_value_text()
//!     );
//! }
//! # Ok::<(), workbook_history::DiffError>(())
//! ```

mod addressing;
pub(crate) mod alignment;
pub(crate) mod column_alignment;
mod config;
mod diff;
mod engine;
pub mod error_codes;
mod filters;
pub(crate) mod hashing;
mod output;
pub mod policy;
mod report;
pub(crate) mod row_alignment;
mod snapshot;
mod timeline;
mod topology;
mod transform;

pub use addressing::{AddressParseError, CellAddress, CellKey, address_to_index, index_to_address};
pub use config::{ConfigError, DiffConfig, DiffConfigBuilder, LimitBehavior};
pub use diff::{
    Change, ChangeAnnotation, ChangeKind, Changeset, DiffError, RowChange, RowChangeKind,
    StructuralChange,
};
pub use engine::{build_changesets, compare_versions, compare_versions_lossy, diff_snapshots};
pub use filters::{FilterSet, SemanticFilter, UnknownFilter};
pub use hashing::{RowHash, hash_row};
pub use output::json::{
    serialize_changeset, serialize_changeset_pretty, serialize_diff_report,
    serialize_diff_report_pretty,
};
pub use report::{
    CombinedChange, DiffReport, NamedStructuralChange, RowBlock, SheetNames, consolidate,
};
pub use snapshot::{
    CellData, CellValue, MergedRange, RowData, SheetId, SheetSnapshot, Snapshot, render_value,
};
pub use timeline::{ResolvedTimeline, resolve_timeline};
pub use topology::{TopologyDiff, diff_topology};
pub use transform::{transform, transform_address};
