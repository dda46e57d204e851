//! A1-style addressing and sheet-qualified cell keys.
//!
//! Every address handled by the history engine is qualified by a persistent
//! [`SheetId`], never by a display name. Names only appear in the final report.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error_codes;
use crate::snapshot::SheetId;

/// Convert zero-based (row, col) indices to an Excel A1 address string.
pub fn index_to_address(row: u32, col: u32) -> String {
    let mut col_index = col;
    let mut col_label = String::new();

    loop {
        let rem = (col_index % 26) as u8;
        col_label.push((b'A' + rem) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }

    col_label.chars().rev().collect::<String>() + &(row + 1).to_string()
}

/// Parse an A1 address into zero-based (row, col) indices.
/// Returns `None` for malformed addresses. `$` absolute markers are accepted.
pub fn address_to_index(a1: &str) -> Option<(u32, u32)> {
    if a1.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_letter = false;
    let mut saw_digit = false;

    for ch in a1.chars() {
        if ch == '$' {
            if saw_digit {
                return None;
            }
            continue;
        }
        if ch.is_ascii_alphabetic() {
            saw_letter = true;
            if saw_digit {
                // Letters after digits are not allowed.
                return None;
            }
            let upper = ch.to_ascii_uppercase() as u8;
            col = col
                .checked_mul(26)?
                .checked_add((upper - b'A' + 1) as u32)?;
        } else if ch.is_ascii_digit() {
            saw_digit = true;
            row = row.checked_mul(10)?.checked_add((ch as u8 - b'0') as u32)?;
        } else {
            return None;
        }
    }

    if !saw_letter || !saw_digit || row == 0 || col == 0 {
        return None;
    }

    Some((row - 1, col - 1))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] invalid cell address '{input}'", code = error_codes::ADDRESS_PARSE)]
pub struct AddressParseError {
    pub input: String,
}

impl AddressParseError {
    pub fn code(&self) -> &'static str {
        error_codes::ADDRESS_PARSE
    }
}

/// A zero-based cell position within a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: u32,
    pub col: u32,
}

impl CellAddress {
    pub fn from_indices(row: u32, col: u32) -> CellAddress {
        CellAddress { row, col }
    }

    pub fn to_a1(&self) -> String {
        index_to_address(self.row, self.col)
    }
}

impl FromStr for CellAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = address_to_index(s).ok_or_else(|| AddressParseError {
            input: s.to_string(),
        })?;
        Ok(CellAddress { row, col })
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

impl Serialize for CellAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_a1())
    }
}

impl<'de> Deserialize<'de> for CellAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let a1 = String::deserialize(deserializer)?;
        CellAddress::from_str(&a1).map_err(|e| DeError::custom(e.to_string()))
    }
}

/// A cell address qualified by the persistent id of its sheet.
///
/// Ordering is by sheet id, then row, then column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub sheet: SheetId,
    pub addr: CellAddress,
}

impl CellKey {
    pub fn new(sheet: SheetId, addr: CellAddress) -> CellKey {
        CellKey { sheet, addr }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.sheet, self.addr)
    }
}

impl FromStr for CellKey {
    type Err = AddressParseError;

    /// Parses `sheetId!A1`. The split happens at the last `!`, so sheet ids may
    /// themselves contain `!`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AddressParseError {
            input: s.to_string(),
        };
        let (sheet, a1) = s.rsplit_once('!').ok_or_else(err)?;
        if sheet.is_empty() {
            return Err(err());
        }
        let addr = CellAddress::from_str(a1).map_err(|_| err())?;
        Ok(CellKey {
            sheet: SheetId::new(sheet),
            addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_to_address_examples() {
        assert_eq!(index_to_address(0, 0), "A1");
        assert_eq!(index_to_address(0, 25), "Z1");
        assert_eq!(index_to_address(0, 26), "AA1");
        assert_eq!(index_to_address(0, 27), "AB1");
        assert_eq!(index_to_address(0, 51), "AZ1");
        assert_eq!(index_to_address(0, 52), "BA1");
    }

    #[test]
    fn round_trip_addresses() {
        let addresses = [
            "A1", "B2", "Z10", "AA1", "AA10", "AB7", "AZ5", "BA1", "ZZ10", "AAA1",
        ];
        for addr in addresses {
            let (r, c) = address_to_index(addr).expect("address should parse");
            assert_eq!(index_to_address(r, c), addr);
        }
    }

    #[test]
    fn invalid_addresses_rejected() {
        let invalid = ["", "1A", "A0", "A", "AA0", "A-1", "A1A", "A1$"];
        for addr in invalid {
            assert!(address_to_index(addr).is_none(), "{addr} should be invalid");
        }
    }

    #[test]
    fn absolute_markers_are_ignored() {
        assert_eq!(address_to_index("$B$3"), Some((2, 1)));
    }

    #[test]
    fn cell_key_parses_at_last_bang() {
        let key: CellKey = "weird!id!C4".parse().expect("key should parse");
        assert_eq!(key.sheet.as_str(), "weird!id");
        assert_eq!(key.addr, CellAddress::from_indices(3, 2));
        assert_eq!(key.to_string(), "weird!id!C4");
    }

    #[test]
    fn cell_key_rejects_missing_sheet() {
        assert!("A1".parse::<CellKey>().is_err());
        assert!("!A1".parse::<CellKey>().is_err());
        assert!("s1!".parse::<CellKey>().is_err());
    }

    #[test]
    fn cell_address_serializes_as_a1() {
        let json = serde_json::to_string(&CellAddress::from_indices(9, 27)).unwrap();
        assert_eq!(json, "\"AB10\"");
        let back: CellAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CellAddress::from_indices(9, 27));
    }
}
