use crate::config::LinkConfig;
use crate::enrich::{enrich, Lookups};
use crate::error::LinkError;
use crate::lookup::ReferenceLookups;
use crate::model::{LinkInputs, LinkOutput, Table};
use crate::project::project;
use crate::schema::{output, SourceKind};
use crate::validate::{check_columns, ValidationReport};

/// Validate all four tables and report column presence. Absent tables are skipped.
pub fn validate_inputs(inputs: &LinkInputs) -> ValidationReport {
    let mut report = ValidationReport::default();
    for kind in SourceKind::ALL {
        if let Some(table) = inputs.get(kind) {
            report.push(check_columns(kind, table, kind.required_columns()));
        }
    }
    report
}

/// Run the linker: check inputs, validate every table, join, project.
///
/// Nothing is joined unless all four tables are present and every required
/// column exists. Column problems are reported for all tables at once.
pub fn run(inputs: LinkInputs, config: &LinkConfig) -> Result<LinkOutput, LinkError> {
    let missing = inputs.missing();
    if !missing.is_empty() {
        return Err(LinkError::MissingInput(missing));
    }

    let report = validate_inputs(&inputs);
    if !report.is_ok() {
        return Err(LinkError::MissingColumns(report));
    }
    log::debug!("all headers present, linking");

    let LinkInputs {
        ledger: Some(ledger),
        purchase_orders: Some(purchase_orders),
        goods_receipts: Some(goods_receipts),
        goods_issues: Some(goods_issues),
    } = inputs
    else {
        return Err(LinkError::MissingInput(SourceKind::ALL.to_vec()));
    };

    let lookups = Lookups {
        purchase_orders: reference_lookups(&purchase_orders, SourceKind::PurchaseOrder),
        goods_receipts: reference_lookups(&goods_receipts, SourceKind::GoodsReceipt),
        goods_issues: reference_lookups(&goods_issues, SourceKind::GoodsIssue),
    };

    let (enriched, stats) = enrich(ledger, &lookups);
    let table = project(&enriched, &output::COLUMNS, config.output.missing_columns)?;

    Ok(LinkOutput { report, table, stats })
}

fn reference_lookups(table: &Table, kind: SourceKind) -> ReferenceLookups {
    match kind.reference() {
        Some(source) => {
            let lookups = ReferenceLookups::build(table, &source);
            log::debug!(
                "{}: {} dated keys, {} remark keys",
                kind.label(),
                lookups.date.len(),
                lookups.remarks.len()
            );
            lookups
        }
        None => ReferenceLookups::default(),
    }
}
