use std::collections::HashMap;

use crate::model::{CellValue, LedgerRecord, Table};
use crate::normalize::normalize_key;
use crate::schema::ledger;

/// Issued quantity / amount totals per normalized GRN key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueTotals {
    pub qty: HashMap<String, f64>,
    pub amt: HashMap<String, f64>,
}

impl IssueTotals {
    /// `(qty, amt)` for a GRN key, zero when the key has no group.
    pub fn get(&self, grn_key: &str) -> (f64, f64) {
        (
            self.qty.get(grn_key).copied().unwrap_or(0.0),
            self.amt.get(grn_key).copied().unwrap_or(0.0),
        )
    }

    pub fn groups(&self) -> usize {
        self.qty.len()
    }
}

/// Numeric value of a cell; missing, non-numeric and non-finite give 0.
pub fn coerce_number(value: &CellValue) -> f64 {
    let n = match value {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        CellValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        CellValue::Empty | CellValue::Date(_) => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Extract the typed join view of every ledger row.
///
/// The PO key comes from `P.O. No`, or `P.O. No.` when only that spelling
/// exists. Absent columns give empty keys and zero figures.
pub fn ledger_records(table: &Table) -> Vec<LedgerRecord> {
    let po_col = table
        .column_index(ledger::PO_NO)
        .or_else(|| table.column_index(ledger::PO_NO_ALT));
    let grn_col = table.column_index(ledger::GRN_NO);
    let gin_col = table.column_index(ledger::VOUCHER_NO);
    let qty_col = table.column_index(ledger::ISSUED_QTY);
    let amt_col = table.column_index(ledger::ISSUED_AMT);

    let key = |row: &[CellValue], col: Option<usize>| {
        col.map(|c| normalize_key(&row[c])).unwrap_or_default()
    };
    let num = |row: &[CellValue], col: Option<usize>| col.map(|c| coerce_number(&row[c])).unwrap_or(0.0);

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let row = row.as_slice();
            LedgerRecord {
                row: i,
                po_key: key(row, po_col),
                grn_key: key(row, grn_col),
                gin_key: key(row, gin_col),
                issued_qty: num(row, qty_col),
                issued_amt: num(row, amt_col),
            }
        })
        .collect()
}

/// Sum issued qty and amount per GRN key.
///
/// Rows with a blank GRN key are grouped together under `""`.
pub fn aggregate_issues(records: &[LedgerRecord]) -> IssueTotals {
    let mut totals = IssueTotals::default();
    for r in records {
        *totals.qty.entry(r.grn_key.clone()).or_insert(0.0) += r.issued_qty;
        *totals.amt.entry(r.grn_key.clone()).or_insert(0.0) += r.issued_amt;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(grn: &str, qty: f64, amt: f64) -> LedgerRecord {
        LedgerRecord {
            row: 0,
            po_key: String::new(),
            grn_key: grn.into(),
            gin_key: String::new(),
            issued_qty: qty,
            issued_amt: amt,
        }
    }

    #[test]
    fn sums_per_grn_key() {
        let records = vec![record("G1", 5.0, 50.0), record("G1", 3.0, 30.0), record("G2", 10.0, 7.5)];
        let totals = aggregate_issues(&records);
        assert_eq!(totals.groups(), 2);
        assert_eq!(totals.get("G1"), (8.0, 80.0));
        assert_eq!(totals.get("G2"), (10.0, 7.5));
        assert_eq!(totals.get("G3"), (0.0, 0.0));
    }

    #[test]
    fn blank_grn_rows_form_their_own_group() {
        let records = vec![record("", 1.0, 1.0), record("", 2.0, 2.0), record("G1", 4.0, 4.0)];
        let totals = aggregate_issues(&records);
        assert_eq!(totals.get(""), (3.0, 3.0));
    }

    #[test]
    fn coerce_handles_non_numeric() {
        assert_eq!(coerce_number(&CellValue::Number(2.5)), 2.5);
        assert_eq!(coerce_number(&CellValue::text(" 12 ")), 12.0);
        assert_eq!(coerce_number(&CellValue::text("n/a")), 0.0);
        assert_eq!(coerce_number(&CellValue::text("")), 0.0);
        assert_eq!(coerce_number(&CellValue::text("NaN")), 0.0);
        assert_eq!(coerce_number(&CellValue::Empty), 0.0);
        assert_eq!(coerce_number(&CellValue::Number(f64::INFINITY)), 0.0);
        assert_eq!(coerce_number(&CellValue::Bool(true)), 1.0);
    }

    #[test]
    fn ledger_records_normalize_keys() {
        let t = Table::from_rows(
            "ledger",
            vec!["P.O. No".into(), "G.R. No".into(), "Voucher No".into(), "Issued Qty".into()],
            vec![vec!["po 001".into(), "gr-5".into(), "gin / 9".into(), "4".into()]],
        );
        let records = ledger_records(&t);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].po_key, "PO 001");
        assert_eq!(records[0].grn_key, "GR-5");
        assert_eq!(records[0].gin_key, "GIN/9");
        assert_eq!(records[0].issued_qty, 4.0);
        assert_eq!(records[0].issued_amt, 0.0);
    }

    #[test]
    fn ledger_po_key_falls_back_to_dotted_spelling() {
        let t = Table::from_rows(
            "ledger",
            vec!["P.O. No.".into()],
            vec![vec!["po-7".into()]],
        );
        assert_eq!(ledger_records(&t)[0].po_key, "PO-7");
    }
}
