// CSV/TSV import

use std::io::Read;
use std::path::Path;

use stocklink_recon::{CellValue, Table};

/// Import a delimited file whose header sits on physical line `header_row` (1-based).
pub fn import(path: &Path, header_row: usize, name: &str) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    import_from_string(&content, header_row, name)
}

pub fn import_from_string(content: &str, header_row: usize, name: &str) -> Result<Table, String> {
    if header_row == 0 {
        return Err("header row is 1-based".to_string());
    }

    // Banner lines above the header usually have a single field, so sniff
    // from the header onwards.
    let from_header: String = content
        .lines()
        .skip(header_row - 1)
        .take(10)
        .collect::<Vec<_>>()
        .join("\n");
    let delimiter = sniff_delimiter(&from_header);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        // Physical line of the record start, so blank banner lines still count
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        if line < header_row {
            continue;
        }

        match headers {
            None => {
                headers = Some(record.iter().map(str::to_string).collect());
            }
            Some(_) => {
                let row: Vec<CellValue> = record.iter().map(parse_field).collect();
                if row.iter().all(CellValue::is_blank) {
                    continue;
                }
                rows.push(row);
            }
        }
    }

    let headers = headers.ok_or_else(|| format!("no header found on row {header_row}"))?;
    Ok(Table::from_rows(name, headers, rows))
}

/// Significant digits an `f64` holds without loss.
const MAX_SIGNIFICANT_DIGITS: usize = 15;

/// Plain decimals ("12", "-3.5") become `Number`. Everything else stays text,
/// including exponent forms ("12E4"), leading zeros ("007") and anything
/// longer than an `f64` holds exactly, so identifiers survive unchanged.
fn parse_field(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }

    if is_plain_decimal(trimmed) {
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return CellValue::Number(n);
            }
        }
    }

    CellValue::text(field)
}

fn is_plain_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if int.is_empty() || !all_digits(int) || !all_digits(frac) {
        return false;
    }
    if unsigned.ends_with('.') {
        return false;
    }
    if int.len() > 1 && int.starts_with('0') {
        return false;
    }

    let significant = int.trim_start_matches('0').len()
        + if int.trim_start_matches('0').is_empty() {
            frac.trim_start_matches('0').len()
        } else {
            frac.len()
        };
    significant <= MAX_SIGNIFICANT_DIGITS
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (number of lines with same field count as line 1) * field_count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s.trim_start_matches('\u{feff}').to_string()),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}
