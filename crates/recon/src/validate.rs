use serde::Serialize;

use crate::model::Table;
use crate::schema::SourceKind;

/// Number of found headers listed in a rendered report before eliding.
pub const FOUND_PREVIEW_LIMIT: usize = 30;

/// Column presence for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReport {
    pub source: SourceKind,
    pub required: Vec<String>,
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

impl ColumnReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn render(&self) -> String {
        let status = if self.is_ok() { "OK" } else { "MISSING" };
        let mut out = format!("{} [{status}]\n", self.source.label());

        out.push_str("  required:\n");
        for col in &self.required {
            let mark = if self.missing.contains(col) { "x" } else { "+" };
            out.push_str(&format!("    {mark} {col}\n"));
        }

        out.push_str(&format!("  found ({}):\n", self.found.len()));
        for col in self.found.iter().take(FOUND_PREVIEW_LIMIT) {
            out.push_str(&format!("      {col}\n"));
        }
        if self.found.len() > FOUND_PREVIEW_LIMIT {
            out.push_str("      …\n");
        }

        if !self.is_ok() {
            out.push_str(&format!(
                "  missing columns in {}: {}\n",
                self.source.label(),
                self.missing.join(", ")
            ));
        }
        out
    }
}

/// Report which required columns are absent from `table`. Never mutates it.
pub fn check_columns(source: SourceKind, table: &Table, required: &[&str]) -> ColumnReport {
    let missing: Vec<String> = required
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        log::info!("{}: all {} required columns present", source.label(), required.len());
    } else {
        log::warn!("{}: missing columns {:?}", source.label(), missing);
    }

    ColumnReport {
        source,
        required: required.iter().map(|c| c.to_string()).collect(),
        found: table.headers().to_vec(),
        missing,
    }
}

/// Presence reports for every table that was checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub tables: Vec<ColumnReport>,
}

impl ValidationReport {
    pub fn push(&mut self, report: ColumnReport) {
        self.tables.push(report);
    }

    pub fn is_ok(&self) -> bool {
        self.tables.iter().all(ColumnReport::is_ok)
    }

    /// `(source, missing columns)` for each failing table.
    pub fn missing(&self) -> Vec<(SourceKind, &[String])> {
        self.tables
            .iter()
            .filter(|r| !r.is_ok())
            .map(|r| (r.source, r.missing.as_slice()))
            .collect()
    }

    pub fn get(&self, source: SourceKind) -> Option<&ColumnReport> {
        self.tables.iter().find(|r| r.source == source)
    }

    pub fn render(&self) -> String {
        self.tables
            .iter()
            .map(ColumnReport::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::purchase_order;

    fn table(headers: &[&str]) -> Table {
        Table::new("t", headers.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn reports_missing_columns_in_required_order() {
        let t = table(&["Remarks", "Extra"]);
        let report = check_columns(SourceKind::PurchaseOrder, &t, &purchase_order::REQUIRED);
        assert!(!report.is_ok());
        assert_eq!(report.missing, vec!["P.O. No.", "P.O. Date"]);
        assert_eq!(report.found, vec!["Remarks", "Extra"]);
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let t = table(&["p.o. no.", "P.O. Date", "Remarks"]);
        let report = check_columns(SourceKind::PurchaseOrder, &t, &purchase_order::REQUIRED);
        assert_eq!(report.missing, vec!["P.O. No."]);
    }

    #[test]
    fn check_does_not_mutate_table() {
        let t = table(&["a"]);
        let before = t.clone();
        let _ = check_columns(SourceKind::Ledger, &t, &["a", "b"]);
        assert_eq!(t, before);
    }

    #[test]
    fn render_elides_long_found_lists() {
        let headers: Vec<String> = (0..35).map(|i| format!("col{i}")).collect();
        let t = Table::new("t", headers);
        let report = check_columns(SourceKind::GoodsIssue, &t, &["col0"]);
        let text = report.render();
        assert!(text.contains("col29"));
        assert!(!text.contains("col30"));
        assert!(text.contains('…'));
        assert!(text.contains("[OK]"));
    }

    #[test]
    fn aggregate_report() {
        let mut report = ValidationReport::default();
        report.push(check_columns(SourceKind::Ledger, &table(&["a"]), &["a"]));
        report.push(check_columns(SourceKind::GoodsReceipt, &table(&["a"]), &["a", "b"]));
        assert!(!report.is_ok());
        let missing = report.missing();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].0, SourceKind::GoodsReceipt);
        assert_eq!(missing[0].1, ["b".to_string()]);
        assert!(report.render().contains("missing columns in GRN Export: b"));
    }
}
