use std::collections::HashMap;

use crate::model::{CellValue, Table};
use crate::normalize::normalize_key;
use crate::schema::ReferenceSource;

/// Normalized key → value of one reference column.
pub type LookupMap = HashMap<String, CellValue>;

/// Map each normalized key in `key_col` to its `value_col` cell.
///
/// Blank keys are skipped. On duplicate keys the later row wins.
/// Returns an empty map if either column is absent.
pub fn build_lookup(table: &Table, key_col: &str, value_col: &str) -> LookupMap {
    let (Some(key_idx), Some(value_idx)) = (table.column_index(key_col), table.column_index(value_col))
    else {
        log::warn!(
            "{}: lookup {key_col:?} -> {value_col:?} skipped, column absent",
            table.name()
        );
        return LookupMap::new();
    };

    let mut map = LookupMap::new();
    let mut duplicates = 0usize;
    for row in table.rows() {
        let key = normalize_key(&row[key_idx]);
        if key.is_empty() {
            continue;
        }
        if map.insert(key, row[value_idx].clone()).is_some() {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        log::debug!(
            "{}: {duplicates} duplicate key(s) in {key_col:?}, last occurrence kept",
            table.name()
        );
    }
    map
}

/// Date and remarks lookups of one reference export.
#[derive(Debug, Clone, Default)]
pub struct ReferenceLookups {
    pub date: LookupMap,
    pub remarks: LookupMap,
}

impl ReferenceLookups {
    pub fn build(table: &Table, source: &ReferenceSource) -> Self {
        Self {
            date: build_lookup(table, source.key, source.date),
            remarks: build_lookup(table, source.key, source.remarks),
        }
    }

    /// `(date, remarks)` for a normalized key. Unmatched keys and blank
    /// reference cells both give empty text, never `Empty`.
    pub fn resolve(&self, key: &str) -> (CellValue, CellValue) {
        (value_or_empty_text(&self.date, key), value_or_empty_text(&self.remarks, key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.date.contains_key(key) || self.remarks.contains_key(key)
    }
}

fn value_or_empty_text(map: &LookupMap, key: &str) -> CellValue {
    match map.get(key) {
        Some(value) if !value.is_blank() => value.clone(),
        _ => CellValue::text(""),
    }
}
