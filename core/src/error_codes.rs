//! Stable error codes surfaced in error messages and via `code()` accessors.

pub const ADDRESS_PARSE: &str = "WBHIST_ADDR_001";

pub const DIFF_EMPTY_VERSION_RANGE: &str = "WBHIST_DIFF_001";
pub const DIFF_LIMITS_EXCEEDED: &str = "WBHIST_DIFF_002";
pub const DIFF_INVALID_CONFIG: &str = "WBHIST_DIFF_003";

pub const CONFIG_INVALID_THRESHOLD: &str = "WBHIST_CFG_001";
pub const CONFIG_NON_POSITIVE_LIMIT: &str = "WBHIST_CFG_002";

pub const FILTER_UNKNOWN: &str = "WBHIST_FILTER_001";
