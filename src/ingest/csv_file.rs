// src/ingest/csv_file.rs
use anyhow::{Context, Result};
use csv::ReaderBuilder;

use super::COMMENT_COLUMNS;

/// Pick the comment column: first preferred name present (exact,
/// case-sensitive), else the first column. `None` when there are no columns.
pub fn comment_column<'a, I>(headers: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let headers: Vec<&str> = headers.into_iter().collect();
    if headers.is_empty() {
        return None;
    }
    COMMENT_COLUMNS
        .iter()
        .find_map(|want| headers.iter().position(|h| h == want))
        .or(Some(0))
}

/// Read the comment column of a delimited file with a header row.
/// Empty cells and short rows are skipped.
pub fn parse(bytes: &[u8]) -> Result<Vec<String>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = rdr.headers().context("reading CSV header")?.clone();
    // spreadsheet exports often start with a UTF-8 BOM
    let names = headers
        .iter()
        .enumerate()
        .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}') } else { h });
    let col = comment_column(names).ok_or_else(|| anyhow::anyhow!("CSV has no columns"))?;

    let mut out = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("reading CSV record {}", i + 1))?;
        match rec.get(col) {
            Some(cell) if !cell.is_empty() => out.push(cell.to_string()),
            _ => {}
        }
    }
    Ok(out)
}
