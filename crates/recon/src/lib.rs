//! `stocklink-recon`: links a stock ledger to its PO, GRN and GIN exports.
//!
//! Pure engine crate: receives pre-loaded tables, returns the enriched,
//! projected ledger. No CLI or IO dependencies.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod lookup;
pub mod model;
pub mod normalize;
pub mod project;
pub mod schema;
pub mod validate;

pub use config::LinkConfig;
pub use engine::{run, validate_inputs};
pub use error::LinkError;
pub use model::{CellValue, LinkInputs, LinkOutput, LinkSummary, Table};
pub use normalize::{normalize_key, normalize_str};
pub use project::MissingColumnPolicy;
pub use schema::SourceKind;
pub use validate::ValidationReport;
