//! Canonical join keys.
//!
//! Every join in the linker compares keys produced here, on both sides.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::CellValue;

static SLASH_SPACING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*/\s*").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a cell into a join key. Blank cells give `""`.
pub fn normalize_key(value: &CellValue) -> String {
    if value.is_blank() {
        return String::new();
    }
    normalize_str(&value.to_string())
}

/// Uppercase, trim, drop whitespace around `/`, collapse whitespace runs.
pub fn normalize_str(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let slashed = SLASH_SPACING.replace_all(&upper, "/");
    WHITESPACE_RUN.replace_all(&slashed, " ").into_owned()
}
