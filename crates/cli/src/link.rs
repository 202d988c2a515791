//! `stocklink run`, `validate` and `columns`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use stocklink_io::WorkbookLayout;
use stocklink_recon::{LinkConfig, LinkError, LinkInputs, LinkSummary, SourceKind};

use crate::{CliError, InputArgs};

/// JSON document printed by `run --json`.
#[derive(Serialize)]
struct RunReport {
    output: String,
    #[serde(flatten)]
    summary: LinkSummary,
}

#[derive(Serialize)]
struct ColumnsReport<'a> {
    file: String,
    header_row: usize,
    columns: &'a [String],
}

pub fn cmd_run(
    inputs: InputArgs,
    output: Option<PathBuf>,
    json_output: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(inputs.config.as_deref())?;
    let tables = load_inputs(&inputs, &config)?;

    let result = stocklink_recon::run(tables, &config).map_err(|e| {
        if let (true, LinkError::MissingColumns(report)) = (json_output, &e) {
            print_json(report);
        }
        CliError::from(e)
    })?;

    let out_path = output.unwrap_or_else(|| PathBuf::from(&config.output.file));
    let layout = WorkbookLayout::from_config(&config.output);
    stocklink_io::write_output(&result.table, &out_path, &layout)
        .map_err(|e| CliError::write(format!("{}: {e}", out_path.display())))?;

    let s = &result.stats;
    if json_output {
        let report = RunReport {
            output: out_path.display().to_string(),
            summary: result.summary(),
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json}");
    } else if !quiet {
        eprintln!(
            "linked {} ledger rows: {} PO, {} GRN, {} GIN matches across {} GRN groups",
            s.rows, s.po_matched, s.grn_matched, s.gin_matched, s.grn_groups,
        );
        eprintln!("wrote {}", out_path.display());
    }

    Ok(())
}

pub fn cmd_validate(inputs: InputArgs, json_output: bool) -> Result<(), CliError> {
    let config = load_config(inputs.config.as_deref())?;
    let tables = load_inputs(&inputs, &config)?;
    let report = stocklink_recon::validate_inputs(&tables);

    if json_output {
        print_json(&report);
    } else {
        eprint!("{}", report.render());
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(LinkError::MissingColumns(report).into())
    }
}

pub fn cmd_columns(file: PathBuf, header_row: usize, json_output: bool) -> Result<(), CliError> {
    if header_row == 0 {
        return Err(CliError::args("--header-row is 1-based").with_hint("the first row is --header-row 1"));
    }
    require_file(&file)?;

    let table = stocklink_io::load_table(&file, header_row, "columns")
        .map_err(|e| CliError::read(format!("{}: {e}", file.display())))?;

    if json_output {
        print_json(&ColumnsReport {
            file: file.display().to_string(),
            header_row,
            columns: table.headers(),
        });
    } else {
        for header in table.headers() {
            println!("{header}");
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<LinkConfig, CliError> {
    match path {
        None => Ok(LinkConfig::default()),
        Some(path) => {
            log::info!("loading config from {}", path.display());
            LinkConfig::from_file(path).map_err(|e| CliError::config(e.to_string()))
        }
    }
}

/// Load every supplied export. Absent flags are collected and reported together.
fn load_inputs(args: &InputArgs, config: &LinkConfig) -> Result<LinkInputs, CliError> {
    let paths = [
        (SourceKind::Ledger, args.ledger.as_deref()),
        (SourceKind::PurchaseOrder, args.po.as_deref()),
        (SourceKind::GoodsReceipt, args.grn.as_deref()),
        (SourceKind::GoodsIssue, args.gin.as_deref()),
    ];

    let missing: Vec<SourceKind> = paths
        .iter()
        .filter(|(_, path)| path.is_none())
        .map(|(kind, _)| *kind)
        .collect();
    if !missing.is_empty() {
        let flags: Vec<String> = missing.iter().map(|k| format!("--{}", k.short_name())).collect();
        return Err(CliError::from(LinkError::MissingInput(missing))
            .with_hint(format!("pass {}", flags.join(", "))));
    }

    let mut inputs = LinkInputs::default();
    for (kind, path) in paths {
        let Some(path) = path else { continue };
        require_file(path)?;
        let table = stocklink_io::load_source(path, kind, &config.headers)
            .map_err(|e| CliError::read(format!("{} ({}): {e}", kind.label(), path.display())))?;
        log::info!("{}: {} rows, {} columns", kind.label(), table.len(), table.headers().len());
        inputs.set(kind, table);
    }
    Ok(inputs)
}

fn require_file(path: &Path) -> Result<(), CliError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::missing_input(format!("file not found: {}", path.display())))
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("JSON serialization error: {e}"),
    }
}
