//! Core diffing engine for workbook history.
//!
//! Provides [`compare_versions`] for comparing an ordered range of snapshots
//! and [`diff_snapshots`] for a single adjacent pair.
//!
//! ## Module Structure
//!
//! - `changeset`: Snapshot-level orchestration, sheet enumeration, synthetic creations
//! - `sheet_diff`: Row alignment, cell comparison, and structural emission for one sheet
//! - `column_inference`: Sheet-wide column insertion/deletion voting
//! - `consequential`: `#REF!` breakage caused by sheet deletion
//! - `history`: Multi-version pipeline (changesets, timeline, consolidation)
//! - `context`: Shared types for diff context and emission

mod changeset;
mod column_inference;
mod consequential;
mod context;
mod history;
mod sheet_diff;

pub use changeset::diff_snapshots;
pub use history::{build_changesets, compare_versions, compare_versions_lossy};
