//! trackline-grid - header-indexed grid engine.
//!
//! A [`DynamicGrid`] is a rectangular table of cells paired with a [`Headers`]
//! mapping from field names to column positions. Every update returns a new
//! grid; the original is never mutated.

pub mod error;
pub mod grid;
pub mod transform;

pub use error::{GridError, Result};
pub use grid::{DynamicGrid, FieldValue, Headers, Row, RowPatch};
