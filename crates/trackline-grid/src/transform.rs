//! Free-standing grid transformations over raw row arrays.
//!
//! These operate on plain `Vec<Vec<_>>` grids before a [`DynamicGrid`]
//! (and its validated header mapping) exists: sheet-shaped data where the
//! first row carries the field names, and structural merges of two grids.
//!
//! [`DynamicGrid`]: crate::grid::DynamicGrid

use std::collections::HashMap;

use crate::error::{GridError, Result};

/// Read a sheet whose first row is field names into a field -> column-values
/// map. Fails on an empty grid (no header row) or ragged body rows.
pub fn headers_as_keys(rows: &[Vec<String>]) -> Result<HashMap<String, Vec<String>>> {
    let (headers, body) = split_header_row(rows)?;
    Ok(headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let column = body.iter().map(|row| row[index].clone()).collect();
            (header.clone(), column)
        })
        .collect())
}

/// Read a sheet whose first row is field names into one record per body row,
/// in row order.
pub fn stub_values(rows: &[Vec<String>]) -> Result<Vec<HashMap<String, String>>> {
    let (headers, body) = split_header_row(rows)?;
    Ok(body
        .iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(index, header)| (header.clone(), row[index].clone()))
                .collect()
        })
        .collect())
}

/// Conditional merge of two equal-shape grids: wherever `predicate` accepts
/// the original cell, take the paired cell from `new` instead. Shape
/// mismatches are caller contract violations and fail immediately.
pub fn update_grid<T, P>(original: &[Vec<T>], new: &[Vec<T>], mut predicate: P) -> Result<Vec<Vec<T>>>
where
    T: Clone,
    P: FnMut(&T) -> bool,
{
    if original.len() != new.len() {
        return Err(GridError::RowCountMismatch {
            left: original.len(),
            right: new.len(),
        });
    }
    original
        .iter()
        .zip(new.iter())
        .enumerate()
        .map(|(row, (original_row, new_row))| {
            if original_row.len() != new_row.len() {
                return Err(GridError::RowLengthMismatch {
                    row,
                    left: original_row.len(),
                    right: new_row.len(),
                });
            }
            Ok(original_row
                .iter()
                .zip(new_row.iter())
                .map(|(value, new_value)| {
                    if predicate(value) {
                        new_value.clone()
                    } else {
                        value.clone()
                    }
                })
                .collect())
        })
        .collect()
}

/// Append extra columns to every row. Fails unless both grids have the same
/// number of rows.
pub fn append_columns<T: Clone>(grid: &[Vec<T>], extra: &[Vec<T>]) -> Result<Vec<Vec<T>>> {
    if grid.len() != extra.len() {
        return Err(GridError::RowCountMismatch {
            left: grid.len(),
            right: extra.len(),
        });
    }
    Ok(grid
        .iter()
        .zip(extra.iter())
        .map(|(row, additional)| {
            let mut merged = row.clone();
            merged.extend(additional.iter().cloned());
            merged
        })
        .collect())
}

fn split_header_row(rows: &[Vec<String>]) -> Result<(&Vec<String>, &[Vec<String>])> {
    let Some((headers, body)) = rows.split_first() else {
        return Err(GridError::EmptyGrid);
    };
    for (index, row) in body.iter().enumerate() {
        if row.len() != headers.len() {
            return Err(GridError::RaggedRows {
                row: index + 1,
                found: row.len(),
                expected: headers.len(),
            });
        }
    }
    Ok((headers, body))
}
