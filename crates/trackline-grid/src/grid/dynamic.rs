use std::sync::Arc;

use crate::error::{GridError, Result};

use super::headers::Headers;
use super::row::{Row, RowPatch};

/// A field value handed to [`DynamicGrid::from_object`]: either one scalar
/// (broadcast to a single row) or a whole column.
#[derive(Clone, Debug)]
pub enum FieldValue<T> {
    One(T),
    Many(Vec<T>),
}

/// A rectangular table of cells with a validated header mapping.
///
/// The grid is a persistent value: `update_col` and `update_row` return a new
/// grid sharing the same header mapping and never touch the original.
#[derive(Clone, Debug)]
pub struct DynamicGrid<T> {
    rows: Vec<Vec<T>>,
    headers: Arc<Headers>,
}

impl<T: Clone> DynamicGrid<T> {
    /// Create a grid from rows and a zero-based header mapping.
    ///
    /// Rejects ragged rows, out-of-bounds or duplicate header indexes, more
    /// fields than columns, and an empty mapping. The error names the rule
    /// that failed; inputs are never coerced.
    pub fn of(rows: Vec<Vec<T>>, headers: Headers) -> Result<Self> {
        let width = match rows.first() {
            Some(row) => row.len(),
            None => return Err(GridError::EmptyGrid),
        };
        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::RaggedRows {
                    row: index,
                    found: row.len(),
                    expected: width,
                });
            }
        }
        headers.validate(width)?;
        Ok(DynamicGrid {
            rows,
            headers: Arc::new(headers),
        })
    }

    /// Create a grid from rows and one-based `(field, column)` pairs.
    pub fn from_one_based<S>(
        rows: Vec<Vec<T>>,
        pairs: impl IntoIterator<Item = (S, usize)>,
    ) -> Result<Self>
    where
        S: Into<String>,
    {
        DynamicGrid::of(rows, Headers::from_one_based(pairs)?)
    }

    /// Pivot a keyed record into a grid: each `Many` field becomes a column
    /// (all columns must be the same length), each `One` field a single-row
    /// cell. Mixing the two shapes across fields is a construction error.
    /// Field order becomes column order.
    pub fn from_object<S>(fields: impl IntoIterator<Item = (S, FieldValue<T>)>) -> Result<Self>
    where
        S: Into<String>,
    {
        let fields: Vec<(String, FieldValue<T>)> = fields
            .into_iter()
            .map(|(field, value)| (field.into(), value))
            .collect();

        let all_columns = fields
            .iter()
            .all(|(_, value)| matches!(value, FieldValue::Many(_)));

        let rows = if all_columns && !fields.is_empty() {
            let expected = match &fields[0].1 {
                FieldValue::Many(column) => column.len(),
                FieldValue::One(_) => unreachable!(),
            };
            let mut rows: Vec<Vec<T>> = vec![Vec::with_capacity(fields.len()); expected];
            for (field, value) in &fields {
                let FieldValue::Many(column) = value else {
                    unreachable!()
                };
                if column.len() != expected {
                    return Err(GridError::ColumnLengthMismatch {
                        field: field.clone(),
                        len: column.len(),
                        expected,
                    });
                }
                for (row, cell) in rows.iter_mut().zip(column.iter()) {
                    row.push(cell.clone());
                }
            }
            rows
        } else {
            let mut row = Vec::with_capacity(fields.len());
            for (field, value) in &fields {
                match value {
                    FieldValue::One(cell) => row.push(cell.clone()),
                    FieldValue::Many(_) => {
                        return Err(GridError::MixedFieldShapes {
                            field: field.clone(),
                        });
                    }
                }
            }
            vec![row]
        };

        let headers = Headers::new(
            fields
                .iter()
                .enumerate()
                .map(|(index, (field, _))| (field.clone(), index)),
        )?;
        DynamicGrid::of(rows, headers)
    }

    /// A defensive copy of the current rows. Mutating the returned value has
    /// no effect on the grid.
    pub fn values(&self) -> Vec<Vec<T>> {
        self.rows.clone()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Iterate rows as named projections.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_, T>> {
        self.rows.iter().map(|cells| Row::new(&self.headers, cells))
    }

    /// All values of one field's column, in row order.
    pub fn lookup_col(&self, field: &str) -> Result<Vec<T>> {
        let column = self.column_index(field)?;
        Ok(self.rows.iter().map(|row| row[column].clone()).collect())
    }

    /// Replace cells in one column: for each row where `predicate` accepts
    /// the current cell, the cell becomes `transform(row)`. The transform
    /// sees the whole current row by name; no other column is ever changed.
    pub fn update_col<F, P>(&self, field: &str, mut transform: F, mut predicate: P) -> Result<Self>
    where
        F: FnMut(Row<'_, T>) -> T,
        P: FnMut(&T) -> bool,
    {
        let column = self.column_index(field)?;
        let rows = self
            .rows
            .iter()
            .map(|cells| {
                let mut updated = cells.clone();
                if predicate(&cells[column]) {
                    updated[column] = transform(Row::new(&self.headers, cells));
                }
                updated
            })
            .collect();
        Ok(self.derive(rows))
    }

    /// Replace cells across several columns of each row from one computed
    /// patch. `transform` runs at most once per row - lazily, only when some
    /// listed field's `predicate(cell, row)` fires - so transforms that call
    /// out to slow lookups are never re-invoked per field. Fields not listed
    /// are never touched, even if present in the patch.
    pub fn update_row<F, P>(
        &self,
        fields: &[&str],
        mut transform: F,
        mut predicate: P,
    ) -> Result<Self>
    where
        F: FnMut(Row<'_, T>) -> RowPatch<T>,
        P: FnMut(&T, Row<'_, T>) -> bool,
    {
        let mut columns = Vec::with_capacity(fields.len());
        for &field in fields {
            columns.push((field, self.column_index(field)?));
        }
        let rows = self
            .rows
            .iter()
            .map(|cells| {
                let row = Row::new(&self.headers, cells);
                let mut patch: Option<RowPatch<T>> = None;
                let mut updated = cells.clone();
                for &(field, column) in &columns {
                    if !predicate(&cells[column], row) {
                        continue;
                    }
                    let patch = patch.get_or_insert_with(|| transform(row));
                    if let Some(value) = patch.get(field) {
                        updated[column] = value.clone();
                    }
                }
                updated
            })
            .collect();
        Ok(self.derive(rows))
    }

    fn column_index(&self, field: &str) -> Result<usize> {
        self.headers
            .column(field)
            .ok_or_else(|| GridError::UnknownField(field.to_string()))
    }

    fn derive(&self, rows: Vec<Vec<T>>) -> Self {
        DynamicGrid {
            rows,
            headers: Arc::clone(&self.headers),
        }
    }
}
