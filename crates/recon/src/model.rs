use std::collections::HashSet;
use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::schema::SourceKind;
use crate::validate::ValidationReport;

// ---------------------------------------------------------------------------
// Cell values
// ---------------------------------------------------------------------------

/// A single scalar read from a spreadsheet, a CSV field, or synthesized by
/// the linker.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// True for `Empty`, blank text, and NaN / infinite numbers.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(n) => !n.is_finite(),
            Self::Bool(_) | Self::Date(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => {
                if !n.is_finite() {
                    Ok(())
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    // Integers without decimals
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Self::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Self::Date(dt) => {
                if dt.time() == NaiveTime::MIN {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Header list plus rows, every row exactly as wide as the header.
///
/// Header names are unique. Blank headers become `Unnamed: {i}` and repeats
/// are suffixed `.1`, `.2`, ... in the order they appear.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers: unique_headers(headers),
            rows: Vec::new(),
        }
    }

    pub fn from_rows(
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        let mut table = Self::new(name, headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Values of one column in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&CellValue>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Append a row, padding with `Empty` or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.headers.len(), CellValue::Empty);
        self.rows.push(row);
    }

    /// Overwrite the named column, or append it when absent.
    ///
    /// `values` is matched to rows by position; missing trailing values are `Empty`.
    pub fn set_column(&mut self, name: &str, values: Vec<CellValue>) {
        let mut values = values.into_iter();
        match self.column_index(name) {
            Some(col) => {
                for row in &mut self.rows {
                    row[col] = values.next().unwrap_or_default();
                }
            }
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(values.next().unwrap_or_default());
                }
            }
        }
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Vec<CellValue>> {
        let col = self.column_index(name)?;
        self.headers.remove(col);
        Some(self.rows.iter_mut().map(|r| r.remove(col)).collect())
    }

    /// Rename a column. An existing column already named `to` is replaced.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if from == to || !self.has_column(from) {
            return false;
        }
        self.remove_column(to);
        if let Some(col) = self.column_index(from) {
            self.headers[col] = to.to_string();
        }
        true
    }
}

fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());

    for (i, header) in raw.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            header
        };

        let mut name = base.clone();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{base}.{n}");
            n += 1;
        }
        seen.insert(name.clone());
        out.push(name);
    }

    out
}

// ---------------------------------------------------------------------------
// Typed ledger view
// ---------------------------------------------------------------------------

/// Join keys and issue figures of one ledger row.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRecord {
    pub row: usize,
    pub po_key: String,
    pub grn_key: String,
    pub gin_key: String,
    pub issued_qty: f64,
    pub issued_amt: f64,
}

// ---------------------------------------------------------------------------
// Pipeline input / output
// ---------------------------------------------------------------------------

/// The four loaded tables. Any of them may be absent.
#[derive(Debug, Clone, Default)]
pub struct LinkInputs {
    pub ledger: Option<Table>,
    pub purchase_orders: Option<Table>,
    pub goods_receipts: Option<Table>,
    pub goods_issues: Option<Table>,
}

impl LinkInputs {
    pub fn new(ledger: Table, purchase_orders: Table, goods_receipts: Table, goods_issues: Table) -> Self {
        Self {
            ledger: Some(ledger),
            purchase_orders: Some(purchase_orders),
            goods_receipts: Some(goods_receipts),
            goods_issues: Some(goods_issues),
        }
    }

    pub fn get(&self, kind: SourceKind) -> Option<&Table> {
        match kind {
            SourceKind::Ledger => self.ledger.as_ref(),
            SourceKind::PurchaseOrder => self.purchase_orders.as_ref(),
            SourceKind::GoodsReceipt => self.goods_receipts.as_ref(),
            SourceKind::GoodsIssue => self.goods_issues.as_ref(),
        }
    }

    pub fn set(&mut self, kind: SourceKind, table: Table) {
        let slot = match kind {
            SourceKind::Ledger => &mut self.ledger,
            SourceKind::PurchaseOrder => &mut self.purchase_orders,
            SourceKind::GoodsReceipt => &mut self.goods_receipts,
            SourceKind::GoodsIssue => &mut self.goods_issues,
        };
        *slot = Some(table);
    }

    /// Sources with no table, in canonical order.
    pub fn missing(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_none())
            .collect()
    }
}

/// Match counters produced by the enricher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichStats {
    pub rows: usize,
    pub po_matched: usize,
    pub grn_matched: usize,
    pub gin_matched: usize,
    pub grn_groups: usize,
}

#[derive(Debug, Clone)]
pub struct LinkOutput {
    pub report: ValidationReport,
    /// Projected onto the output schema, ledger row order.
    pub table: Table,
    pub stats: EnrichStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkSummary {
    pub engine_version: String,
    pub columns: usize,
    pub stats: EnrichStats,
    pub validation: ValidationReport,
}

impl LinkOutput {
    pub fn summary(&self) -> LinkSummary {
        LinkSummary {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            columns: self.table.headers().len(),
            stats: self.stats.clone(),
            validation: self.report.clone(),
        }
    }
}
