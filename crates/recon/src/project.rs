use serde::Deserialize;

use crate::error::LinkError;
use crate::model::{CellValue, Table};
use crate::schema::SourceKind;
use crate::validate::{ColumnReport, ValidationReport};

/// What to do when a declared output column is absent from the source table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingColumnPolicy {
    /// Synthesize the column filled with empty text.
    #[default]
    FillEmpty,
    /// Fail with [`LinkError::MissingColumns`].
    Reject,
}

/// Select exactly `columns`, in that order, from `table`.
///
/// Source columns not listed are dropped. Rows keep their order.
pub fn project(table: &Table, columns: &[&str], policy: MissingColumnPolicy) -> Result<Table, LinkError> {
    let indices: Vec<Option<usize>> = columns.iter().map(|c| table.column_index(c)).collect();

    let absent: Vec<String> = columns
        .iter()
        .zip(&indices)
        .filter(|(_, idx)| idx.is_none())
        .map(|(c, _)| c.to_string())
        .collect();

    if !absent.is_empty() {
        match policy {
            MissingColumnPolicy::FillEmpty => {
                log::debug!("{}: filling absent output columns {:?}", table.name(), absent);
            }
            MissingColumnPolicy::Reject => {
                let mut report = ValidationReport::default();
                report.push(ColumnReport {
                    source: SourceKind::Ledger,
                    required: columns.iter().map(|c| c.to_string()).collect(),
                    found: table.headers().to_vec(),
                    missing: absent,
                });
                return Err(LinkError::MissingColumns(report));
            }
        }
    }

    let rows = table
        .rows()
        .iter()
        .map(|row| {
            indices
                .iter()
                .map(|idx| match idx {
                    Some(i) => row[*i].clone(),
                    None => CellValue::text(""),
                })
                .collect()
        })
        .collect();

    Ok(Table::from_rows(
        table.name(),
        columns.iter().map(|c| c.to_string()).collect(),
        rows,
    ))
}
