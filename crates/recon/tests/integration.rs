use stocklink_recon::schema::{goods_issue, goods_receipt, ledger, output, purchase_order};
use stocklink_recon::{run, CellValue, LinkConfig, LinkError, LinkInputs, SourceKind, Table};

// -------------------------------------------------------------------------
// Fixtures
// -------------------------------------------------------------------------

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Ledger row with every required column; keys and issue figures as given.
fn ledger_row(item: &str, po: &str, grn: &str, voucher: &str, qty: f64, amt: f64) -> Vec<CellValue> {
    ledger::REQUIRED
        .iter()
        .map(|col| match *col {
            ledger::PO_NO => CellValue::text(po),
            ledger::GRN_NO => CellValue::text(grn),
            ledger::VOUCHER_NO => CellValue::text(voucher),
            ledger::ISSUED_QTY => CellValue::Number(qty),
            ledger::ISSUED_AMT => CellValue::Number(amt),
            ledger::ITEM_DESC => CellValue::text(item),
            ledger::COMPANY => CellValue::text("Sangini Infra"),
            _ => CellValue::Empty,
        })
        .collect()
}

fn ledger_table(rows: Vec<Vec<CellValue>>) -> Table {
    Table::from_rows("ledger", headers(&ledger::REQUIRED), rows)
}

fn reference(name: &str, required: &[&str], rows: &[(&str, &str, &str)]) -> Table {
    Table::from_rows(
        name,
        headers(required),
        rows.iter()
            .map(|(k, d, r)| vec![CellValue::text(*k), CellValue::text(*d), CellValue::text(*r)])
            .collect(),
    )
}

fn inputs(ledger_rows: Vec<Vec<CellValue>>) -> LinkInputs {
    LinkInputs::new(
        ledger_table(ledger_rows),
        reference(
            "po",
            &purchase_order::REQUIRED,
            &[("PO 001", "2024-01-01", "urgent"), ("PO 002", "2024-01-05", "routine")],
        ),
        reference("grn", &goods_receipt::REQUIRED, &[("GR-5", "2024-01-10", "partial")]),
        reference("gin", &goods_issue::REQUIRED, &[("GIN/9", "2024-02-01", "site A")]),
    )
}

fn text(t: &Table, row: usize, col: &str) -> String {
    t.get(row, col).map(|v| v.to_string()).unwrap_or_default()
}

// -------------------------------------------------------------------------
// End-to-end
// -------------------------------------------------------------------------

#[test]
fn end_to_end_links_po_grn_and_gin() {
    let out = run(
        inputs(vec![ledger_row("cement", "po 001", "gr-5", "gin/9", 5.0, 500.0)]),
        &LinkConfig::default(),
    )
    .unwrap();

    let t = &out.table;
    assert_eq!(t.len(), 1);
    assert_eq!(text(t, 0, "P.O. Date"), "2024-01-01");
    assert_eq!(text(t, 0, "PO_Remarks"), "urgent");
    assert_eq!(text(t, 0, "GRN Date"), "2024-01-10");
    assert_eq!(text(t, 0, "GRN_Remarks"), "partial");
    assert_eq!(text(t, 0, "GIN No"), "gin/9");
    assert_eq!(text(t, 0, "Issue Date"), "2024-02-01");
    assert_eq!(text(t, 0, "GIN_Remarks"), "site A");
    assert_eq!(t.get(0, "GRN_Issued_Qty"), Some(&CellValue::Number(5.0)));
    assert_eq!(t.get(0, "GRN_Issued_Amt"), Some(&CellValue::Number(500.0)));
    assert_eq!(text(t, 0, "Name of Company"), "Sangini Infra");

    assert!(out.report.is_ok());
    assert_eq!(out.stats.rows, 1);
    assert_eq!(out.stats.po_matched, 1);
    assert_eq!(out.stats.grn_matched, 1);
    assert_eq!(out.stats.gin_matched, 1);
}

#[test]
fn output_has_exactly_the_declared_columns() {
    let mut input = inputs(vec![ledger_row("a", "", "", "", 0.0, 0.0)]);
    // Extra ledger columns never reach the output
    let mut ledger = input.ledger.take().unwrap();
    ledger.set_column("Internal Ref", vec![CellValue::text("zzz")]);
    input.ledger = Some(ledger);

    let out = run(input, &LinkConfig::default()).unwrap();
    assert_eq!(out.table.headers(), &output::COLUMNS);
    assert!(!out.table.has_column("Internal Ref"));
    assert!(!out.table.has_column("Voucher No"));
}

#[test]
fn unmatched_rows_are_kept_with_empty_strings() {
    let out = run(
        inputs(vec![
            ledger_row("a", "po 404", "gr-404", "gin/404", 1.0, 1.0),
            ledger_row("b", "po 002", "", "", 2.0, 2.0),
        ]),
        &LinkConfig::default(),
    )
    .unwrap();

    let t = &out.table;
    assert_eq!(t.len(), 2);
    assert_eq!(t.get(0, "P.O. Date"), Some(&CellValue::text("")));
    assert_eq!(t.get(0, "PO_Remarks"), Some(&CellValue::text("")));
    assert_eq!(t.get(0, "GRN Date"), Some(&CellValue::text("")));
    assert_eq!(t.get(0, "Issue Date"), Some(&CellValue::text("")));
    assert_eq!(text(t, 1, "PO_Remarks"), "routine");
    assert_eq!(out.stats.po_matched, 1);
}

#[test]
fn grn_totals_broadcast_across_rows() {
    let out = run(
        inputs(vec![
            ledger_row("a", "", "G1", "", 5.0, 50.0),
            ledger_row("b", "", "g1", "", 3.0, 30.0),
            ledger_row("c", "", "G2", "", 10.0, 100.0),
        ]),
        &LinkConfig::default(),
    )
    .unwrap();

    let qty: Vec<f64> = out
        .table
        .column("GRN_Issued_Qty")
        .unwrap()
        .iter()
        .map(|v| v.as_number().unwrap())
        .collect();
    assert_eq!(qty, vec![8.0, 8.0, 10.0]);
    assert_eq!(out.table.get(1, "GRN_Issued_Amt"), Some(&CellValue::Number(80.0)));
    // Per-row figures are untouched
    assert_eq!(out.table.get(1, "Issued Qty"), Some(&CellValue::Number(3.0)));
}

#[test]
fn later_reference_duplicate_wins() {
    let mut input = inputs(vec![ledger_row("a", "PO-7", "", "", 0.0, 0.0)]);
    input.purchase_orders = Some(reference(
        "po",
        &purchase_order::REQUIRED,
        &[("po-7", "2024-01-01", "old"), ("PO - 7", "2024-06-01", "new")],
    ));
    // "PO - 7" normalizes to "PO - 7", not "PO-7": only the first row matches.
    let out = run(input, &LinkConfig::default()).unwrap();
    assert_eq!(text(&out.table, 0, "PO_Remarks"), "old");

    let mut input = inputs(vec![ledger_row("a", "PO-7", "", "", 0.0, 0.0)]);
    input.purchase_orders = Some(reference(
        "po",
        &purchase_order::REQUIRED,
        &[("po-7", "2024-01-01", "old"), (" PO-7 ", "2024-06-01", "new")],
    ));
    let out = run(input, &LinkConfig::default()).unwrap();
    assert_eq!(text(&out.table, 0, "PO_Remarks"), "new");
    assert_eq!(text(&out.table, 0, "P.O. Date"), "2024-06-01");
}

// -------------------------------------------------------------------------
// Failures
// -------------------------------------------------------------------------

#[test]
fn missing_inputs_are_reported_together() {
    let mut input = inputs(vec![]);
    input.purchase_orders = None;
    input.goods_issues = None;

    match run(input, &LinkConfig::default()) {
        Err(LinkError::MissingInput(sources)) => {
            assert_eq!(sources, vec![SourceKind::PurchaseOrder, SourceKind::GoodsIssue]);
        }
        other => panic!("expected MissingInput, got {other:?}"),
    }
}

#[test]
fn missing_columns_reported_for_every_table() {
    let mut input = inputs(vec![ledger_row("a", "", "", "", 0.0, 0.0)]);
    input.goods_receipts = Some(reference("grn", &["G.R. No", "GRN Date", "Remark"], &[]));
    input.goods_issues = Some(reference("gin", &["GIN No", "Issue Date", "Remarks"], &[]));

    match run(input, &LinkConfig::default()) {
        Err(LinkError::MissingColumns(report)) => {
            assert_eq!(report.tables.len(), 4);
            let missing = report.missing();
            assert_eq!(missing.len(), 2);
            assert_eq!(missing[0].0, SourceKind::GoodsReceipt);
            assert_eq!(missing[0].1, ["Remarks".to_string()]);
            assert_eq!(missing[1].0, SourceKind::GoodsIssue);
            assert_eq!(missing[1].1, [goods_issue::KEY.to_string()]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn summary_serializes_stats_and_validation() {
    let out = run(
        inputs(vec![ledger_row("a", "po 001", "", "", 0.0, 0.0)]),
        &LinkConfig::default(),
    )
    .unwrap();
    let json = serde_json::to_value(out.summary()).unwrap();
    assert_eq!(json["columns"], 27);
    assert_eq!(json["stats"]["po_matched"], 1);
    assert_eq!(json["validation"]["tables"][1]["source"], "purchase_order");
}
