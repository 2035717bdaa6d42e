//! Minimal CSV reader and writer
//!
//! Reader: quoted fields may contain commas and newlines, `""` is an escaped
//! quote, the first non-blank line is the header, blank lines are skipped,
//! short rows are padded with empty cells.

use crate::errors::{Result, ShieldError};
use crate::types::RawRow;

/// Split CSV text into records of cells, honoring quotes.
///
/// Returns the records together with the 1-based line each one starts on.
fn split_records(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut records = Vec::new();
    let mut cells: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut record_start = 1usize;
    let mut quote_opened_at = 0usize;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    cell.push('\n');
                }
                _ => cell.push(ch),
            }
            continue;
        }

        match ch {
            '"' => {
                in_quotes = true;
                quote_opened_at = line;
            }
            ',' => cells.push(std::mem::take(&mut cell)),
            '\n' => {
                cells.push(std::mem::take(&mut cell));
                records.push((record_start, std::mem::take(&mut cells)));
                line += 1;
                record_start = line;
            }
            _ => cell.push(ch),
        }
    }

    if in_quotes {
        return Err(ShieldError::Parse {
            line: quote_opened_at,
            reason: "unterminated quoted field".to_string(),
        });
    }
    if !cell.is_empty() || !cells.is_empty() {
        cells.push(cell);
        records.push((record_start, cells));
    }

    Ok(records)
}

fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|c| c.trim().is_empty())
}

/// Parse CSV text into header-keyed rows
pub fn parse_csv(text: &str) -> Result<Vec<RawRow>> {
    let records = split_records(text)?;
    let mut iter = records.into_iter().skip_while(|(_, cells)| is_blank(cells));

    let header: Vec<String> = match iter.next() {
        Some((_, cells)) => cells
            .into_iter()
            .enumerate()
            .map(|(j, name)| {
                let name = name.trim();
                if name.is_empty() {
                    format!("col{}", j)
                } else {
                    name.to_string()
                }
            })
            .collect(),
        None => return Ok(Vec::new()),
    };

    let rows = iter
        .filter(|(_, cells)| !is_blank(cells))
        .map(|(_, cells)| {
            header
                .iter()
                .enumerate()
                .map(|(j, key)| (key.clone(), cells.get(j).cloned().unwrap_or_default()))
                .collect::<RawRow>()
        })
        .collect();

    Ok(rows)
}

/// Quote a cell when it contains a quote, comma, or newline
pub fn escape_cell(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render a header and rows; each row yields values in header order
pub fn write_csv<R, C>(header: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = String>,
{
    let mut lines = vec![header.join(",")];
    for row in rows {
        let cells: Vec<String> = row.into_iter().map(|c| escape_cell(&c)).collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}
