// src/ingest/spreadsheet.rs
//! Excel workbooks (`.xlsx`, `.xls`): the first worksheet, header row first,
//! same column choice as CSV.

use std::io::Cursor;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::csv_file::comment_column;

pub fn parse(bytes: &[u8]) -> Result<Vec<String>> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook has no worksheets"))?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| anyhow!("worksheet is empty"))?
        .iter()
        .map(|cell| cell.to_string())
        .collect();
    let col = comment_column(header.iter().map(String::as_str))
        .ok_or_else(|| anyhow!("worksheet has no columns"))?;

    let mut out = Vec::new();
    for row in rows {
        match row.get(col) {
            None | Some(Data::Empty) => {}
            Some(cell) => {
                let text = cell.to_string();
                if !text.is_empty() {
                    out.push(text);
                }
            }
        }
    }
    Ok(out)
}
