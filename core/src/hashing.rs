//! Row content fingerprints.
//!
//! Row hashes accelerate row alignment: two rows hash equal iff every cell's
//! rendered value and formula text are equal. Alignment treats hash equality
//! as row equality and never re-compares the raw cells, so capture time and
//! diff time must both go through [`hash_row`].

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::Hasher;
use xxhash_rust::xxh64::Xxh64;

use crate::snapshot::{CellData, render_value};

pub(crate) const XXH64_SEED: u64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RowHash(pub u64);

fn write_field(hasher: &mut Xxh64, text: &str) {
    // Length prefix keeps ("ab", "") distinct from ("a", "b").
    hasher.write_u64(text.len() as u64);
    hasher.write(text.as_bytes());
}

/// Hashes one row's cells in order.
pub fn hash_row(cells: &[CellData]) -> RowHash {
    let mut hasher = Xxh64::new(XXH64_SEED);
    hasher.write_u64(cells.len() as u64);
    for cell in cells {
        write_field(&mut hasher, &render_value(cell.value.as_ref()));
        write_field(&mut hasher, &cell.formula);
    }
    RowHash(hasher.finish())
}

impl Serialize for RowHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:016x}", self.0))
    }
}

impl<'de> Deserialize<'de> for RowHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        u64::from_str_radix(&s, 16)
            .map(RowHash)
            .map_err(|e| DeError::custom(format!("invalid hex hash: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::CellValue;

    #[test]
    fn equal_content_hashes_equal() {
        let a = vec![CellData::value(1.0), CellData::formula("=A1", 2.0)];
        let b = vec![CellData::value(1.0), CellData::formula("=A1", 2.0)];
        assert_eq!(hash_row(&a), hash_row(&b));
    }

    #[test]
    fn number_and_text_with_same_rendering_hash_equal() {
        let a = vec![CellData::value(5.0)];
        let b = vec![CellData::new(Some(CellValue::Text("5".into())), "")];
        assert_eq!(hash_row(&a), hash_row(&b));
    }

    #[test]
    fn field_boundaries_are_unambiguous() {
        let a = vec![CellData::value("ab"), CellData::empty()];
        let b = vec![CellData::value("a"), CellData::value("b")];
        assert_ne!(hash_row(&a), hash_row(&b));

        let c = vec![CellData::value("x")];
        let d = vec![CellData::new(None, "x")];
        assert_ne!(hash_row(&c), hash_row(&d));
    }

    #[test]
    fn trailing_empty_cell_changes_hash() {
        let a = vec![CellData::value(1.0)];
        let b = vec![CellData::value(1.0), CellData::empty()];
        assert_ne!(hash_row(&a), hash_row(&b));
    }

    #[test]
    fn hash_serializes_as_hex() {
        let json = serde_json::to_string(&RowHash(0xabc)).unwrap();
        assert_eq!(json, "\"0000000000000abc\"");
        let back: RowHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RowHash(0xabc));
    }
}
