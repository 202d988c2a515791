use std::fmt;

use crate::schema::SourceKind;
use crate::validate::ValidationReport;

#[derive(Debug)]
pub enum LinkError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad header row, sheet name, etc.).
    ConfigValidation(String),
    /// One or more of the four inputs was not supplied.
    MissingInput(Vec<SourceKind>),
    /// Required columns absent. Carries the report for all checked tables.
    MissingColumns(ValidationReport),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingInput(sources) => {
                let names: Vec<&str> = sources.iter().map(|s| s.label()).collect();
                write!(f, "all 4 files are required; missing: {}", names.join(", "))
            }
            Self::MissingColumns(report) => {
                let parts: Vec<String> = report
                    .missing()
                    .into_iter()
                    .map(|(source, cols)| format!("{}: {}", source.label(), cols.join(", ")))
                    .collect();
                write!(f, "missing columns: {}", parts.join("; "))
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for LinkError {}
