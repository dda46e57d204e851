//! Semantic filters consulted before a cell is declared changed.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error_codes;
use crate::snapshot::{CellData, render_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticFilter {
    ValueIgnoreCase,
    ValueIgnoreWhitespace,
    FormulaIgnoreCase,
    FormulaIgnoreWhitespace,
}

impl SemanticFilter {
    pub const ALL: [SemanticFilter; 4] = [
        SemanticFilter::ValueIgnoreCase,
        SemanticFilter::ValueIgnoreWhitespace,
        SemanticFilter::FormulaIgnoreCase,
        SemanticFilter::FormulaIgnoreWhitespace,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SemanticFilter::ValueIgnoreCase => "value_ignore_case",
            SemanticFilter::ValueIgnoreWhitespace => "value_ignore_whitespace",
            SemanticFilter::FormulaIgnoreCase => "formula_ignore_case",
            SemanticFilter::FormulaIgnoreWhitespace => "formula_ignore_whitespace",
        }
    }
}

impl fmt::Display for SemanticFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] unknown semantic filter '{id}'", code = error_codes::FILTER_UNKNOWN)]
pub struct UnknownFilter {
    pub id: String,
}

impl UnknownFilter {
    pub fn code(&self) -> &'static str {
        error_codes::FILTER_UNKNOWN
    }
}

impl FromStr for SemanticFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticFilter::ALL
            .into_iter()
            .find(|f| f.id() == s)
            .ok_or_else(|| UnknownFilter { id: s.to_string() })
    }
}

/// The set of active filters for one comparison.
///
/// Serializes as a list of identifiers. Deserialization goes through
/// [`FilterSet::from_ids`], so unknown identifiers in a config file are
/// skipped rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeSet<SemanticFilter>);

impl<'de> Deserialize<'de> for FilterSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ids = Vec::<String>::deserialize(deserializer)?;
        Ok(FilterSet::from_ids(ids))
    }
}

impl FilterSet {
    pub fn new() -> FilterSet {
        FilterSet::default()
    }

    /// Builds a set from identifier strings. Unknown identifiers are skipped
    /// with a warning so a newer caller cannot abort an older engine.
    pub fn from_ids<I, S>(ids: I) -> FilterSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = FilterSet::new();
        for id in ids {
            match id.as_ref().parse::<SemanticFilter>() {
                Ok(filter) => {
                    set.0.insert(filter);
                }
                Err(e) => tracing::warn!("ignoring filter: {e}"),
            }
        }
        set
    }

    pub fn with(mut self, filter: SemanticFilter) -> FilterSet {
        self.0.insert(filter);
        self
    }

    pub fn insert(&mut self, filter: SemanticFilter) {
        self.0.insert(filter);
    }

    pub fn contains(&self, filter: SemanticFilter) -> bool {
        self.0.contains(&filter)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SemanticFilter> + '_ {
        self.0.iter().copied()
    }

    pub fn values_equal(&self, old: &CellData, new: &CellData) -> bool {
        let a = render_value(old.value.as_ref());
        let b = render_value(new.value.as_ref());
        normalized_eq(
            &a,
            &b,
            self.contains(SemanticFilter::ValueIgnoreCase),
            self.contains(SemanticFilter::ValueIgnoreWhitespace),
        )
    }

    pub fn formulas_equal(&self, old: &CellData, new: &CellData) -> bool {
        normalized_eq(
            &old.formula,
            &new.formula,
            self.contains(SemanticFilter::FormulaIgnoreCase),
            self.contains(SemanticFilter::FormulaIgnoreWhitespace),
        )
    }
}

fn normalized_eq(a: &str, b: &str, ignore_case: bool, ignore_whitespace: bool) -> bool {
    if a == b {
        return true;
    }
    if !ignore_case && !ignore_whitespace {
        return false;
    }
    let normalize = |s: &str| -> String {
        let s = if ignore_whitespace {
            s.chars().filter(|c| !c.is_whitespace()).collect::<String>()
        } else {
            s.to_string()
        };
        if ignore_case { s.to_lowercase() } else { s }
    };
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_ids_and_skips_unknown() {
        let set = FilterSet::from_ids(["value_ignore_case", "bogus", "formula_ignore_whitespace"]);
        assert!(set.contains(SemanticFilter::ValueIgnoreCase));
        assert!(set.contains(SemanticFilter::FormulaIgnoreWhitespace));
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn unknown_id_error_carries_code_and_id() {
        let err = "value_ignore_accents"
            .parse::<SemanticFilter>()
            .expect_err("id is not a known filter");
        assert_eq!(err.id, "value_ignore_accents");
        assert_eq!(err.code(), error_codes::FILTER_UNKNOWN);
        assert_eq!(
            err.to_string(),
            "[WBHIST_FILTER_001] unknown semantic filter 'value_ignore_accents'"
        );
    }

    #[test]
    fn ignore_case_applies_to_values_only() {
        let set = FilterSet::new().with(SemanticFilter::ValueIgnoreCase);
        assert!(set.values_equal(&CellData::value("Total"), &CellData::value("TOTAL")));
        assert!(!set.formulas_equal(
            &CellData::formula("=sum(A1)", 1.0),
            &CellData::formula("=SUM(A1)", 1.0)
        ));
    }

    #[test]
    fn ignore_whitespace_collapses_spacing() {
        let set = FilterSet::new().with(SemanticFilter::FormulaIgnoreWhitespace);
        assert!(set.formulas_equal(
            &CellData::formula("=A1 + B1", 3.0),
            &CellData::formula("=A1+B1", 3.0)
        ));
        assert!(!FilterSet::new().values_equal(&CellData::value("a b"), &CellData::value("ab")));
    }

    #[test]
    fn serializes_as_identifier_list() {
        let set = FilterSet::new().with(SemanticFilter::ValueIgnoreWhitespace);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["value_ignore_whitespace"]"#);
    }
}
