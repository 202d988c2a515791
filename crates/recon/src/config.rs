use std::path::Path;

use serde::Deserialize;

use crate::error::LinkError;
use crate::project::MissingColumnPolicy;
use crate::schema::{SourceKind, LEDGER_HEADER_ROW, REFERENCE_HEADER_ROW};

/// Excel's sheet-name length limit.
const MAX_SHEET_NAME_LEN: usize = 31;

const SHEET_NAME_FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Optional run settings. Every field has a default, so an empty file is a
/// valid config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkConfig {
    #[serde(default)]
    pub headers: HeaderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// 1-based physical rows holding each export's header.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderConfig {
    #[serde(default = "default_ledger_row")]
    pub ledger_row: usize,
    #[serde(default = "default_reference_row")]
    pub reference_row: usize,
}

fn default_ledger_row() -> usize {
    LEDGER_HEADER_ROW
}

fn default_reference_row() -> usize {
    REFERENCE_HEADER_ROW
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            ledger_row: LEDGER_HEADER_ROW,
            reference_row: REFERENCE_HEADER_ROW,
        }
    }
}

impl HeaderConfig {
    pub fn row_for(&self, source: SourceKind) -> usize {
        if source.is_reference() {
            self.reference_row
        } else {
            self.ledger_row
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_file")]
    pub file: String,
    #[serde(default = "default_summary_sheet")]
    pub summary_sheet: String,
    #[serde(default = "default_raw_sheet")]
    pub raw_sheet: String,
    #[serde(default)]
    pub missing_columns: MissingColumnPolicy,
}

fn default_file() -> String {
    "Stock_Ledger_Final.xlsx".into()
}

fn default_summary_sheet() -> String {
    "Summary".into()
}

fn default_raw_sheet() -> String {
    "RAW_Data".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: default_file(),
            summary_sheet: default_summary_sheet(),
            raw_sheet: default_raw_sheet(),
            missing_columns: MissingColumnPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl LinkConfig {
    pub fn from_toml(input: &str) -> Result<Self, LinkError> {
        let config: LinkConfig =
            toml::from_str(input).map_err(|e| LinkError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, LinkError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| LinkError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    pub fn validate(&self) -> Result<(), LinkError> {
        if self.headers.ledger_row == 0 || self.headers.reference_row == 0 {
            return Err(LinkError::ConfigValidation(
                "header rows are 1-based and must be at least 1".into(),
            ));
        }

        if self.output.file.trim().is_empty() {
            return Err(LinkError::ConfigValidation("output file must not be empty".into()));
        }

        validate_sheet_name("summary_sheet", &self.output.summary_sheet)?;
        validate_sheet_name("raw_sheet", &self.output.raw_sheet)?;

        // Excel compares sheet names case-insensitively
        if self.output.summary_sheet.to_lowercase() == self.output.raw_sheet.to_lowercase() {
            return Err(LinkError::ConfigValidation(format!(
                "summary_sheet and raw_sheet must differ, both are '{}'",
                self.output.summary_sheet
            )));
        }

        Ok(())
    }
}

fn validate_sheet_name(field: &str, name: &str) -> Result<(), LinkError> {
    if name.trim().is_empty() {
        return Err(LinkError::ConfigValidation(format!("{field} must not be empty")));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(LinkError::ConfigValidation(format!(
            "{field} '{name}' is longer than {MAX_SHEET_NAME_LEN} characters"
        )));
    }
    if let Some(c) = name.chars().find(|c| SHEET_NAME_FORBIDDEN.contains(c)) {
        return Err(LinkError::ConfigValidation(format!(
            "{field} '{name}' contains forbidden character '{c}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
