//! Detection of formula breakage caused by sheet deletion.

use crate::snapshot::CellData;

const REF_ERROR: &str = "#REF!";

/// True when `new` gained a `#REF!` that `old` did not have, and `old` pointed
/// at one of `deleted_sheets` through its formula text or its precedent list.
pub(crate) fn is_consequential(old: &CellData, new: &CellData, deleted_sheets: &[String]) -> bool {
    if deleted_sheets.is_empty()
        || !new.formula.contains(REF_ERROR)
        || old.formula.contains(REF_ERROR)
    {
        return false;
    }

    let precedents = old.precedents.as_deref().unwrap_or_default();
    deleted_sheets.iter().any(|name| {
        references_sheet(&old.formula, name) || precedents.iter().any(|p| references_sheet(p, name))
    })
}

/// Case-insensitive search for `name!` or `'name'!` in `text`.
///
/// The unquoted form must not be preceded by a name character, so `Sheet2`
/// does not match inside `MySheet2!A1`.
pub(crate) fn references_sheet(text: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }

    let haystack = text.to_lowercase();
    let name = name.to_lowercase();

    let quoted = format!("'{}'!", name.replace('\'', "''"));
    if haystack.contains(&quoted) {
        return true;
    }

    let bare = format!("{name}!");
    haystack.match_indices(&bare).any(|(pos, _)| {
        haystack[..pos]
            .chars()
            .next_back()
            .map_or(true, |c| !is_name_char(c))
    })
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == '\''
}
