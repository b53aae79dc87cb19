//! Roster sheet I/O.
//!
//! The roster lives in a CSV file; a TOML sidecar names the columns the
//! pipeline cares about, one-based the way a spreadsheet user counts them.
//! Link columns (assessment, scans) encode their cells as `text|url`.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use trackline_grid::DynamicGrid;

use crate::error::{AppError, Result};
use crate::student::Cell;

/// Named column positions for a roster sheet, one-based.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetColumns {
    pub columns: BTreeMap<String, usize>,
    #[serde(default)]
    pub link_columns: BTreeMap<String, usize>,
}

impl SheetColumns {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// All `(field, one-based column)` pairs, plain and link columns alike.
    pub fn header_pairs(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .chain(self.link_columns.iter())
            .map(|(field, &index)| (field.clone(), index))
            .collect()
    }

    fn link_indexes(&self) -> HashSet<usize> {
        self.link_columns
            .values()
            .filter(|&&index| index > 0)
            .map(|&index| index - 1)
            .collect()
    }
}

/// Read a roster CSV into a grid. Short rows are padded out to the sheet
/// width, as a spreadsheet read would be; construction invariants (header
/// bounds, injectivity) are enforced by the grid itself.
pub fn read_sheet(path: &Path, columns: &SheetColumns) -> Result<DynamicGrid<Cell>> {
    let content = fs::read_to_string(path)?;
    let links = columns.link_indexes();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for line in content.lines() {
        let cells = parse_csv_line(line)
            .into_iter()
            .enumerate()
            .map(|(index, field)| parse_cell(&field, links.contains(&index)))
            .collect();
        rows.push(cells);
    }
    if rows.is_empty() {
        return Err(AppError::EmptySheet(path.to_path_buf()));
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        while row.len() < width {
            row.push(Cell::blank());
        }
    }

    Ok(DynamicGrid::from_one_based(rows, columns.header_pairs())?)
}

/// Write a grid back out as roster CSV.
pub fn write_sheet(grid: &DynamicGrid<Cell>, path: &Path) -> Result<()> {
    let mut lines = Vec::with_capacity(grid.row_count());
    for row in grid.values() {
        let fields: Vec<String> = row.iter().map(|cell| escape_csv(&encode_cell(cell))).collect();
        lines.push(fields.join(","));
    }
    fs::write(path, lines.join("\n") + "\n")?;
    Ok(())
}

fn parse_cell(field: &str, is_link: bool) -> Cell {
    if !is_link {
        return Cell::text(field);
    }
    match field.split_once('|') {
        Some((text, url)) if !url.is_empty() => Cell::link(text, Some(url.to_string())),
        Some((text, _)) => Cell::link(text, None),
        None => Cell::link(field, None),
    }
}

fn encode_cell(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => text.clone(),
        Cell::Link { text, url: Some(url) } => format!("{}|{}", text, url),
        Cell::Link { text, url: None } => text.clone(),
    }
}

/// Parse a single CSV line, handling quoted fields.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    field_was_quoted = true;
                }
                ',' => {
                    if field_was_quoted {
                        fields.push(current.clone());
                    } else {
                        fields.push(current.trim().to_string());
                    }
                    current = String::new();
                    field_was_quoted = false;
                }
                _ => current.push(c),
            }
        }
    }
    if field_was_quoted {
        fields.push(current);
    } else {
        fields.push(current.trim().to_string());
    }
    fields
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
