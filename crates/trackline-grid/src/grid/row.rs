use std::collections::HashMap;

use super::headers::Headers;

/// Partial record of new values produced by an
/// [`update_row`](super::DynamicGrid::update_row) transform. Fields absent
/// from the patch leave the corresponding cells untouched.
pub type RowPatch<T> = HashMap<String, T>;

/// Borrowed projection of one grid row as a named record.
///
/// Projection is exact in both directions: reading every mapped field out of
/// a row and writing the same values back reproduces the backing array.
pub struct Row<'a, T> {
    headers: &'a Headers,
    cells: &'a [T],
}

// `Row` only holds shared references, so it is `Copy` regardless of `T`.
// Hand-written to avoid the spurious `T: Copy`/`T: Clone` bound a derive adds.
impl<'a, T> Clone for Row<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Row<'a, T> {}

impl<'a, T> Row<'a, T> {
    pub(crate) fn new(headers: &'a Headers, cells: &'a [T]) -> Self {
        Row { headers, cells }
    }

    /// Cell value for a mapped field. `None` for unmapped fields.
    pub fn get(&self, field: &str) -> Option<&'a T> {
        self.headers.column(field).and_then(|index| self.cells.get(index))
    }

    pub fn headers(&self) -> &'a Headers {
        self.headers
    }

    /// The raw cell array backing this row.
    pub fn cells(&self) -> &'a [T] {
        self.cells
    }
}

impl<'a, T: Clone> Row<'a, T> {
    /// Project every mapped field into an owned patch record.
    pub fn to_patch(&self) -> RowPatch<T> {
        self.headers
            .iter()
            .filter_map(|(field, index)| {
                self.cells.get(index).map(|cell| (field.to_string(), cell.clone()))
            })
            .collect()
    }

    /// Write a patch back over this row's cells, returning the merged array.
    /// Fields absent from the patch keep their current value.
    pub fn apply(&self, patch: &RowPatch<T>) -> Vec<T> {
        let mut cells: Vec<T> = self.cells.to_vec();
        for (field, index) in self.headers.iter() {
            if let Some(value) = patch.get(field) {
                cells[index] = value.clone();
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Headers {
        Headers::new([("a", 0), ("c", 2)]).unwrap()
    }

    #[test]
    fn test_get_by_field() {
        let headers = headers();
        let cells = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        let row = Row::new(&headers, &cells);
        assert_eq!(row.get("a"), Some(&"x".to_string()));
        assert_eq!(row.get("c"), Some(&"z".to_string()));
        assert_eq!(row.get("b"), None);
    }

    #[test]
    fn test_project_and_apply_round_trip() {
        let headers = headers();
        let cells = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        let row = Row::new(&headers, &cells);
        let patch = row.to_patch();
        assert_eq!(row.apply(&patch), cells);
    }

    #[test]
    fn test_apply_leaves_unlisted_fields_alone() {
        let headers = headers();
        let cells = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        let row = Row::new(&headers, &cells);
        let mut patch = RowPatch::new();
        patch.insert("c".to_string(), "Z".to_string());
        assert_eq!(row.apply(&patch), vec!["x", "y", "Z"]);
    }
}
