//! Configuration for the history engine.
//!
//! `DiffConfig` centralizes the alignment limits, the column-inference vote
//! threshold, and the active semantic filters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error_codes;
use crate::filters::{FilterSet, SemanticFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitBehavior {
    FallbackToPositional,
    ReturnError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Fraction of shifted rows that must agree on one column signature before
    /// a sheet-wide column insertion/deletion is inferred.
    #[serde(alias = "column_threshold")]
    pub column_vote_threshold: f64,
    /// Upper bound on `old_len * new_len` for one LCS table.
    pub lcs_work_limit: u64,
    pub on_limit_exceeded: LimitBehavior,
    pub filters: FilterSet,
    /// Emit creation changes for the non-empty cells of inserted rows.
    pub emit_row_creations: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            column_vote_threshold: 0.70,
            lcs_work_limit: 16_000_000,
            on_limit_exceeded: LimitBehavior::FallbackToPositional,
            filters: FilterSet::new(),
            emit_row_creations: true,
        }
    }
}

impl DiffConfig {
    /// Requires unanimous agreement before inferring a column change.
    pub fn strict() -> Self {
        Self {
            column_vote_threshold: 1.0,
            ..Default::default()
        }
    }

    /// Ignores case and whitespace differences in values and formulas.
    pub fn lenient() -> Self {
        let mut filters = FilterSet::new();
        for filter in SemanticFilter::ALL {
            filters.insert(filter);
        }
        Self {
            filters,
            ..Default::default()
        }
    }

    pub fn builder() -> DiffConfigBuilder {
        DiffConfigBuilder {
            inner: DiffConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.column_vote_threshold.is_finite()
            || self.column_vote_threshold <= 0.0
            || self.column_vote_threshold > 1.0
        {
            return Err(ConfigError::InvalidVoteThreshold {
                value: self.column_vote_threshold,
            });
        }

        if self.lcs_work_limit == 0 {
            return Err(ConfigError::NonPositiveLimit {
                field: "lcs_work_limit",
                value: 0,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("[{code}] column_vote_threshold must be in (0.0, 1.0] and finite (got {value})", code = error_codes::CONFIG_INVALID_THRESHOLD)]
    InvalidVoteThreshold { value: f64 },
    #[error("[{code}] {field} must be greater than zero (got {value})", code = error_codes::CONFIG_NON_POSITIVE_LIMIT)]
    NonPositiveLimit { field: &'static str, value: u64 },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidVoteThreshold { .. } => error_codes::CONFIG_INVALID_THRESHOLD,
            ConfigError::NonPositiveLimit { .. } => error_codes::CONFIG_NON_POSITIVE_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiffConfigBuilder {
    inner: DiffConfig,
}

impl Default for DiffConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffConfigBuilder {
    pub fn new() -> Self {
        DiffConfig::builder()
    }

    pub fn column_vote_threshold(mut self, value: f64) -> Self {
        self.inner.column_vote_threshold = value;
        self
    }

    pub fn lcs_work_limit(mut self, value: u64) -> Self {
        self.inner.lcs_work_limit = value;
        self
    }

    pub fn on_limit_exceeded(mut self, value: LimitBehavior) -> Self {
        self.inner.on_limit_exceeded = value;
        self
    }

    pub fn filter(mut self, value: SemanticFilter) -> Self {
        self.inner.filters.insert(value);
        self
    }

    pub fn filters(mut self, value: FilterSet) -> Self {
        self.inner.filters = value;
        self
    }

    pub fn emit_row_creations(mut self, value: bool) -> Self {
        self.inner.emit_row_creations = value;
        self
    }

    pub fn build(self) -> Result<DiffConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
