//! Grid data structures.
//!
//! - [`Headers`] - field name to column index mapping, injective and bounds-checked
//! - [`DynamicGrid`] - a rectangular table with persistent (copy-on-write) updates
//! - [`Row`] / [`RowPatch`] - named projections of a single row

mod dynamic;
mod headers;
mod row;

pub use dynamic::{DynamicGrid, FieldValue};
pub use headers::Headers;
pub use row::{Row, RowPatch};
