use std::collections::HashMap;

use crate::error::{GridError, Result};

/// Mapping from field names to zero-based column positions.
///
/// Insertion order is preserved; it becomes the column order when a grid is
/// built from a keyed record. Injectivity and bounds are enforced against a
/// concrete row width when a [`DynamicGrid`](super::DynamicGrid) is
/// constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, usize)>,
    by_name: HashMap<String, usize>,
}

impl Headers {
    /// Build a header mapping from `(field, zero-based column)` pairs.
    ///
    /// Duplicate field names are rejected here; duplicate column indexes are
    /// rejected at grid construction, where the row width is known.
    pub fn new<S>(pairs: impl IntoIterator<Item = (S, usize)>) -> Result<Self>
    where
        S: Into<String>,
    {
        let mut fields = Vec::new();
        let mut by_name = HashMap::new();
        for (field, index) in pairs {
            let field = field.into();
            if by_name.insert(field.clone(), index).is_some() {
                return Err(GridError::DuplicateField(field));
            }
            fields.push((field, index));
        }
        Ok(Headers { fields, by_name })
    }

    /// Build a header mapping from one-based column positions (the way a
    /// spreadsheet user counts them). Every index is shifted down by one.
    pub fn from_one_based<S>(pairs: impl IntoIterator<Item = (S, usize)>) -> Result<Self>
    where
        S: Into<String>,
    {
        let mut shifted = Vec::new();
        for (field, index) in pairs {
            let field = field.into();
            if index == 0 {
                return Err(GridError::OneBasedIndexZero { field });
            }
            shifted.push((field, index - 1));
        }
        Headers::new(shifted)
    }

    /// Column index for a field, if mapped.
    pub fn column(&self, field: &str) -> Option<usize> {
        self.by_name.get(field).copied()
    }

    /// Field mapped to a column index, if any.
    pub fn field_at(&self, column: usize) -> Option<&str> {
        self.fields
            .iter()
            .find(|(_, index)| *index == column)
            .map(|(field, _)| field.as_str())
    }

    /// `(field, column)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.fields.iter().map(|(field, index)| (field.as_str(), *index))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check the mapping against a concrete row width: indexes in bounds, no
    /// more fields than columns, at least one field, all indexes distinct.
    pub(crate) fn validate(&self, width: usize) -> Result<()> {
        for (field, index) in &self.fields {
            if *index >= width {
                return Err(GridError::HeaderOutOfBounds {
                    field: field.clone(),
                    index: *index,
                    width,
                });
            }
        }
        if self.fields.len() > width {
            return Err(GridError::TooManyHeaders {
                fields: self.fields.len(),
                width,
            });
        }
        if self.fields.is_empty() {
            return Err(GridError::NoHeaders);
        }
        let mut seen: HashMap<usize, &str> = HashMap::new();
        for (field, index) in &self.fields {
            if let Some(first) = seen.insert(*index, field) {
                return Err(GridError::DuplicateHeaderIndex {
                    first: first.to_string(),
                    second: field.clone(),
                    index: *index,
                });
            }
        }
        Ok(())
    }
}
