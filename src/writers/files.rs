//! The file-link pass: match cached scans back to students by name.

use std::collections::HashSet;

use regex::Regex;
use trackline_core::DocumentCache;
use trackline_grid::{DynamicGrid, Row};

use crate::error::Result;
use crate::student::{Cell, fields};

/// Link each student's row to the cached scan whose text mentions their
/// name. Rows already linked keep their link, and a region is never handed
/// to two students: every assigned url joins the exclusion set as the pass
/// walks the grid.
pub fn update_sheet_file_data(
    grid: &DynamicGrid<Cell>,
    cache: &DocumentCache,
    column: &str,
) -> Result<DynamicGrid<Cell>> {
    let mut assigned: HashSet<String> = grid
        .lookup_col(column)?
        .iter()
        .filter_map(|cell| cell.url().map(str::to_string))
        .collect();

    let updated = grid.update_col(
        column,
        |row| {
            let current = row
                .get(column)
                .cloned()
                .unwrap_or_else(Cell::blank);
            if current.has_url() {
                return current;
            }
            let first = row.get(fields::FIRST_NAME).map(Cell::as_text).unwrap_or("");
            let last = row.get(fields::LAST_NAME).map(Cell::as_text).unwrap_or("");
            if first.is_empty() || last.is_empty() {
                return current;
            }
            match cache.get_range_containing(&student_name_regex(first, last), &assigned) {
                Some(region) => {
                    let url = region.key().to_string();
                    assigned.insert(url.clone());
                    Cell::link("LINK", Some(url))
                }
                None => current,
            }
        },
        |_| true,
    )?;
    Ok(updated)
}

/// Matches "first ... last" or "last ... first", case-insensitively.
fn student_name_regex(first: &str, last: &str) -> Regex {
    let first = regex::escape(first);
    let last = regex::escape(last);
    Regex::new(&format!("(?i)({first}.*{last})|({last}.*{first})")).unwrap()
}
