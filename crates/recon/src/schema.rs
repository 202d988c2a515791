//! Column names of the four exports and of the output workbook.
//!
//! Names are matched exactly and case-sensitively.

use serde::Serialize;

/// Physical row (1-based) holding the ledger header.
pub const LEDGER_HEADER_ROW: usize = 1;

/// Physical row (1-based) holding the header of the PO, GRN and GIN exports.
/// The ERP writes six rows of report banner above it.
pub const REFERENCE_HEADER_ROW: usize = 7;

pub mod ledger {
    pub const DATE: &str = "Date";
    pub const COMPANY: &str = "Name of Company";
    pub const PROJECT: &str = "Project Name";
    pub const SUB_PROJECT: &str = "Sub Project";
    pub const LEVEL: &str = "Level";
    pub const ACTIVITY_CODE: &str = "Activity Code";
    pub const ACTIVITY_NAME: &str = "Activity Name";
    pub const GODOWN: &str = "Godown Name";
    pub const PO_NO: &str = "P.O. No";
    /// Spelling used by the PO export; accepted as a ledger fallback.
    pub const PO_NO_ALT: &str = "P.O. No.";
    pub const GRN_NO: &str = "G.R. No";
    pub const VOUCHER_NO: &str = "Voucher No";
    pub const FROM_VOUCHER: &str = "From Voucher";
    pub const CONTRACTOR: &str = "Contractor / Service Provider Name";
    pub const ITEM_GROUP: &str = "Item Group";
    pub const ITEM_DESC: &str = "Item Desc";
    pub const RECEIVED_QTY: &str = "Received Qty";
    pub const RECEIVED_AMT: &str = "Received Amt";
    pub const ISSUED_QTY: &str = "Issued Qty";
    pub const ISSUED_AMT: &str = "Issued Amt";

    pub const REQUIRED: [&str; 19] = [
        DATE, COMPANY, PROJECT, SUB_PROJECT,
        LEVEL, ACTIVITY_CODE, ACTIVITY_NAME, GODOWN,
        PO_NO, GRN_NO, VOUCHER_NO, FROM_VOUCHER,
        CONTRACTOR,
        ITEM_GROUP, ITEM_DESC, RECEIVED_QTY, RECEIVED_AMT, ISSUED_QTY, ISSUED_AMT,
    ];
}

pub mod purchase_order {
    pub const KEY: &str = "P.O. No.";
    pub const DATE: &str = "P.O. Date";
    pub const REMARKS: &str = "Remarks";

    pub const REQUIRED: [&str; 3] = [KEY, DATE, REMARKS];
}

pub mod goods_receipt {
    pub const KEY: &str = "G.R. No";
    pub const DATE: &str = "GRN Date";
    pub const REMARKS: &str = "Remarks";

    pub const REQUIRED: [&str; 3] = [KEY, DATE, REMARKS];
}

pub mod goods_issue {
    pub const KEY: &str = "G.I.N. Sr No@S/GIN/S/Y/S/5";
    pub const DATE: &str = "Issue Date";
    pub const REMARKS: &str = "Remarks";

    pub const REQUIRED: [&str; 3] = [KEY, DATE, REMARKS];
}

pub mod output {
    use super::ledger;

    pub const PO_DATE: &str = "P.O. Date";
    pub const PO_REMARKS: &str = "PO_Remarks";
    pub const GRN_DATE: &str = "GRN Date";
    pub const GRN_REMARKS: &str = "GRN_Remarks";
    /// Display name of the ledger's `Voucher No`.
    pub const GIN_NO: &str = "GIN No";
    pub const ISSUE_DATE: &str = "Issue Date";
    pub const GIN_REMARKS: &str = "GIN_Remarks";
    pub const GRN_ISSUED_QTY: &str = "GRN_Issued_Qty";
    pub const GRN_ISSUED_AMT: &str = "GRN_Issued_Amt";

    /// Output schema, in sheet order.
    pub const COLUMNS: [&str; 27] = [
        ledger::DATE, ledger::COMPANY, ledger::PROJECT, ledger::SUB_PROJECT,
        ledger::LEVEL, ledger::ACTIVITY_CODE, ledger::ACTIVITY_NAME, ledger::GODOWN,
        ledger::PO_NO, PO_DATE, PO_REMARKS,
        ledger::GRN_NO, GRN_DATE, GRN_REMARKS,
        ledger::ITEM_GROUP, ledger::ITEM_DESC,
        GIN_NO, ISSUE_DATE, GIN_REMARKS,
        ledger::RECEIVED_QTY, ledger::RECEIVED_AMT, ledger::ISSUED_QTY, ledger::ISSUED_AMT,
        GRN_ISSUED_QTY, GRN_ISSUED_AMT,
        ledger::FROM_VOUCHER, ledger::CONTRACTOR,
    ];
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Ledger,
    PurchaseOrder,
    GoodsReceipt,
    GoodsIssue,
}

/// Key, date and remarks columns of a reference export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceSource {
    pub key: &'static str,
    pub date: &'static str,
    pub remarks: &'static str,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        Self::Ledger,
        Self::PurchaseOrder,
        Self::GoodsReceipt,
        Self::GoodsIssue,
    ];

    /// Human label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ledger => "Stock Ledger",
            Self::PurchaseOrder => "PO Export",
            Self::GoodsReceipt => "GRN Export",
            Self::GoodsIssue => "GIN Export",
        }
    }

    /// Short name; also the CLI flag that supplies the file.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Ledger => "ledger",
            Self::PurchaseOrder => "po",
            Self::GoodsReceipt => "grn",
            Self::GoodsIssue => "gin",
        }
    }

    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Ledger => &ledger::REQUIRED,
            Self::PurchaseOrder => &purchase_order::REQUIRED,
            Self::GoodsReceipt => &goods_receipt::REQUIRED,
            Self::GoodsIssue => &goods_issue::REQUIRED,
        }
    }

    /// `None` for the ledger, which is the left side of every join.
    pub fn reference(&self) -> Option<ReferenceSource> {
        match self {
            Self::Ledger => None,
            Self::PurchaseOrder => Some(ReferenceSource {
                key: purchase_order::KEY,
                date: purchase_order::DATE,
                remarks: purchase_order::REMARKS,
            }),
            Self::GoodsReceipt => Some(ReferenceSource {
                key: goods_receipt::KEY,
                date: goods_receipt::DATE,
                remarks: goods_receipt::REMARKS,
            }),
            Self::GoodsIssue => Some(ReferenceSource {
                key: goods_issue::KEY,
                date: goods_issue::DATE,
                remarks: goods_issue::REMARKS,
            }),
        }
    }

    pub fn is_reference(&self) -> bool {
        !matches!(self, Self::Ledger)
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
