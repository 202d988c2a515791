//! Left-join of the reference lookups and GRN totals onto the ledger.

use crate::aggregate::{aggregate_issues, ledger_records, IssueTotals};
use crate::lookup::ReferenceLookups;
use crate::model::{CellValue, EnrichStats, Table};
use crate::schema::{ledger, output};

/// Lookups for the three reference exports.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    pub purchase_orders: ReferenceLookups,
    pub goods_receipts: ReferenceLookups,
    pub goods_issues: ReferenceLookups,
}

/// Annotate every ledger row with PO, GRN and GIN details and GRN totals.
///
/// Row count and order are preserved. Unmatched keys give empty text for
/// dates and remarks and `0` for totals. `Issued Qty` / `Issued Amt` are
/// replaced by their numeric values and `Voucher No` is renamed `GIN No`.
pub fn enrich(mut table: Table, lookups: &Lookups) -> (Table, EnrichStats) {
    let records = ledger_records(&table);
    let totals: IssueTotals = aggregate_issues(&records);

    let n = records.len();
    let mut po_date = Vec::with_capacity(n);
    let mut po_remarks = Vec::with_capacity(n);
    let mut grn_date = Vec::with_capacity(n);
    let mut grn_remarks = Vec::with_capacity(n);
    let mut issue_date = Vec::with_capacity(n);
    let mut gin_remarks = Vec::with_capacity(n);
    let mut grn_qty = Vec::with_capacity(n);
    let mut grn_amt = Vec::with_capacity(n);

    let mut stats = EnrichStats {
        rows: n,
        grn_groups: totals.groups(),
        ..Default::default()
    };

    for r in &records {
        if lookups.purchase_orders.contains(&r.po_key) {
            stats.po_matched += 1;
        }
        if lookups.goods_receipts.contains(&r.grn_key) {
            stats.grn_matched += 1;
        }
        if lookups.goods_issues.contains(&r.gin_key) {
            stats.gin_matched += 1;
        }

        let (d, rem) = lookups.purchase_orders.resolve(&r.po_key);
        po_date.push(d);
        po_remarks.push(rem);

        let (d, rem) = lookups.goods_receipts.resolve(&r.grn_key);
        grn_date.push(d);
        grn_remarks.push(rem);

        let (d, rem) = lookups.goods_issues.resolve(&r.gin_key);
        issue_date.push(d);
        gin_remarks.push(rem);

        let (qty, amt) = totals.get(&r.grn_key);
        grn_qty.push(CellValue::Number(qty));
        grn_amt.push(CellValue::Number(amt));
    }

    table.set_column(output::PO_DATE, po_date);
    table.set_column(output::PO_REMARKS, po_remarks);
    table.set_column(output::GRN_DATE, grn_date);
    table.set_column(output::GRN_REMARKS, grn_remarks);
    table.set_column(output::ISSUE_DATE, issue_date);
    table.set_column(output::GIN_REMARKS, gin_remarks);

    table.rename_column(ledger::VOUCHER_NO, output::GIN_NO);

    table.set_column(
        ledger::ISSUED_QTY,
        records.iter().map(|r| CellValue::Number(r.issued_qty)).collect(),
    );
    table.set_column(
        ledger::ISSUED_AMT,
        records.iter().map(|r| CellValue::Number(r.issued_amt)).collect(),
    );

    table.set_column(output::GRN_ISSUED_QTY, grn_qty);
    table.set_column(output::GRN_ISSUED_AMT, grn_amt);

    log::info!(
        "enriched {} ledger rows: {} PO, {} GRN, {} GIN matches across {} GRN groups",
        stats.rows,
        stats.po_matched,
        stats.grn_matched,
        stats.gin_matched,
        stats.grn_groups,
    );

    (table, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupMap;

    fn ledger(rows: &[(&str, &str, &str, f64)]) -> Table {
        Table::from_rows(
            "ledger",
            vec![
                "Item Desc".into(),
                "P.O. No".into(),
                "G.R. No".into(),
                "Voucher No".into(),
                "Issued Qty".into(),
            ],
            rows.iter()
                .enumerate()
                .map(|(i, (po, grn, gin, qty))| {
                    vec![
                        CellValue::text(format!("item {i}")),
                        CellValue::text(*po),
                        CellValue::text(*grn),
                        CellValue::text(*gin),
                        CellValue::Number(*qty),
                    ]
                })
                .collect(),
        )
    }

    fn single(key: &str, value: &str) -> LookupMap {
        let mut m = LookupMap::new();
        m.insert(key.into(), CellValue::text(value));
        m
    }

    #[test]
    fn unmatched_rows_are_kept_with_empty_values() {
        let (t, stats) = enrich(ledger(&[("po 9", "", "", 1.0)]), &Lookups::default());
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(0, "P.O. Date"), Some(&CellValue::text("")));
        assert_eq!(t.get(0, "PO_Remarks"), Some(&CellValue::text("")));
        assert_eq!(t.get(0, "GIN_Remarks"), Some(&CellValue::text("")));
        assert_eq!(stats.po_matched, 0);
    }

    #[test]
    fn matches_by_normalized_key() {
        let lookups = Lookups {
            purchase_orders: ReferenceLookups {
                date: single("PO 001", "2024-01-01"),
                remarks: single("PO 001", "urgent"),
            },
            goods_issues: ReferenceLookups {
                date: single("GIN/9", "2024-03-03"),
                remarks: LookupMap::new(),
            },
            ..Default::default()
        };
        let (t, stats) = enrich(ledger(&[("po 001", "gr-5", "gin / 9", 2.0)]), &lookups);
        assert_eq!(t.get(0, "P.O. Date"), Some(&CellValue::text("2024-01-01")));
        assert_eq!(t.get(0, "PO_Remarks"), Some(&CellValue::text("urgent")));
        assert_eq!(t.get(0, "Issue Date"), Some(&CellValue::text("2024-03-03")));
        assert_eq!(t.get(0, "GIN_Remarks"), Some(&CellValue::text("")));
        assert_eq!(stats.po_matched, 1);
        assert_eq!(stats.gin_matched, 1);
        assert_eq!(stats.grn_matched, 0);
    }

    #[test]
    fn grn_totals_are_broadcast_to_each_row() {
        let (t, stats) = enrich(
            ledger(&[("", "G1", "", 5.0), ("", "g1", "", 3.0), ("", "G2", "", 10.0)]),
            &Lookups::default(),
        );
        assert_eq!(t.len(), 3);
        assert_eq!(t.get(0, "GRN_Issued_Qty"), Some(&CellValue::Number(8.0)));
        assert_eq!(t.get(1, "GRN_Issued_Qty"), Some(&CellValue::Number(8.0)));
        assert_eq!(t.get(2, "GRN_Issued_Qty"), Some(&CellValue::Number(10.0)));
        assert_eq!(t.get(0, "GRN_Issued_Amt"), Some(&CellValue::Number(0.0)));
        assert_eq!(stats.grn_groups, 2);
    }

    #[test]
    fn voucher_is_renamed_and_issue_figures_coerced() {
        let mut table = ledger(&[("", "", "V-1", 0.0)]);
        table.set_column("Issued Qty", vec![CellValue::text("abc")]);
        let (t, _) = enrich(table, &Lookups::default());
        assert!(!t.has_column("Voucher No"));
        assert_eq!(t.get(0, "GIN No"), Some(&CellValue::text("V-1")));
        assert_eq!(t.get(0, "Issued Qty"), Some(&CellValue::Number(0.0)));
        assert_eq!(t.get(0, "Issued Amt"), Some(&CellValue::Number(0.0)));
    }

    #[test]
    fn row_order_is_preserved() {
        let (t, _) = enrich(
            ledger(&[("a", "", "", 0.0), ("b", "", "", 0.0), ("c", "", "", 0.0)]),
            &Lookups::default(),
        );
        let items: Vec<String> = t.column("Item Desc").unwrap().iter().map(|v| v.to_string()).collect();
        assert_eq!(items, vec!["item 0", "item 1", "item 2"]);
    }
}
